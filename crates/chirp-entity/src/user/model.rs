//! User entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// A registered identity.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// Unique user identifier.
    pub id: Uuid,
    /// Unique handle.
    pub username: String,
    /// Display name.
    pub full_name: String,
    /// Unique email address.
    pub email: String,
    /// Argon2 password hash. Never serialized.
    #[serde(skip_serializing, default)]
    pub password_hash: String,
    /// Free-form biography.
    pub bio: Option<String>,
    /// Personal link.
    pub link: Option<String>,
    /// Hosted avatar URL.
    pub profile_img: Option<String>,
    /// Hosted cover image URL.
    pub cover_img: Option<String>,
    /// Users following this user.
    pub followers: Vec<Uuid>,
    /// Users this user follows.
    pub following: Vec<Uuid>,
    /// Posts this user has liked.
    pub liked_posts: Vec<Uuid>,
    /// When the user signed up.
    pub created_at: DateTime<Utc>,
    /// When the user was last updated.
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Build a fresh user record from signup data.
    pub fn from_create(data: &CreateUser) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            username: data.username.clone(),
            full_name: data.full_name.clone(),
            email: data.email.clone(),
            password_hash: data.password_hash.clone(),
            bio: None,
            link: None,
            profile_img: None,
            cover_img: None,
            followers: Vec::new(),
            following: Vec::new(),
            liked_posts: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Return the user with the password hash removed.
    pub fn redacted(mut self) -> Self {
        self.password_hash.clear();
        self
    }

    /// Whether this user follows `other`.
    pub fn is_following(&self, other: Uuid) -> bool {
        self.following.contains(&other)
    }

    /// Compact author representation embedded in posts and comments.
    pub fn summary(&self) -> UserSummary {
        UserSummary {
            id: self.id,
            username: self.username.clone(),
            full_name: self.full_name.clone(),
            profile_img: self.profile_img.clone(),
        }
    }
}

/// Data required to create a new user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateUser {
    /// Desired handle.
    pub username: String,
    /// Display name.
    pub full_name: String,
    /// Email address.
    pub email: String,
    /// Pre-hashed password.
    pub password_hash: String,
}

/// Author information embedded in post and comment views.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserSummary {
    /// User ID.
    pub id: Uuid,
    /// Handle.
    pub username: String,
    /// Display name.
    pub full_name: String,
    /// Avatar URL.
    pub profile_img: Option<String>,
}
