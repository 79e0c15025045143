//! Post entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// A post row. Comments live in their own table.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    /// Unique post identifier.
    pub id: Uuid,
    /// Owner of the post.
    pub user_id: Uuid,
    /// Optional text body.
    pub text: Option<String>,
    /// Optional hosted image URL.
    pub img: Option<String>,
    /// Users who liked the post.
    pub likes: Vec<Uuid>,
    /// When the post was created.
    pub created_at: DateTime<Utc>,
    /// When the post was last updated.
    pub updated_at: DateTime<Utc>,
}

impl Post {
    /// Build a fresh post record.
    pub fn from_create(data: &CreatePost) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            user_id: data.user_id,
            text: data.text.clone(),
            img: data.img.clone(),
            likes: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Whether `user_id` owns this post.
    pub fn is_owned_by(&self, user_id: Uuid) -> bool {
        self.user_id == user_id
    }

    /// Whether `user_id` has liked this post.
    pub fn is_liked_by(&self, user_id: Uuid) -> bool {
        self.likes.contains(&user_id)
    }
}

/// Data required to create a post.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatePost {
    /// Owner.
    pub user_id: Uuid,
    /// Text body, `None` when absent.
    pub text: Option<String>,
    /// Hosted image URL, `None` when absent.
    pub img: Option<String>,
}
