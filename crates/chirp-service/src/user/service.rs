//! User self-service operations: profile viewing, suggestions and updates.

use std::sync::Arc;

use tracing::{debug, info, warn};

use chirp_auth::SessionManager;
use chirp_auth::email::is_valid_email;
use chirp_core::error::AppError;
use chirp_core::result::AppResult;
use chirp_core::traits::ImageHost;
use chirp_database::UserStore;
use chirp_entity::user::User;

use crate::context::RequestContext;

/// How many random users are drawn before filtering out followed ones.
const SUGGESTION_SAMPLE: usize = 10;
/// How many suggestions are returned.
const SUGGESTION_LIMIT: usize = 4;

/// Fields a user may change on their own profile. Absent or empty values
/// leave the stored field unchanged.
#[derive(Debug, Clone, Default)]
pub struct UpdateProfile {
    pub full_name: Option<String>,
    pub email: Option<String>,
    pub username: Option<String>,
    pub bio: Option<String>,
    pub link: Option<String>,
    /// Image payload for a new avatar.
    pub profile_img: Option<String>,
    /// Image payload for a new cover image.
    pub cover_img: Option<String>,
    pub current_password: Option<String>,
    pub new_password: Option<String>,
}

/// Handles user profile operations.
#[derive(Clone)]
pub struct UserService {
    users: Arc<dyn UserStore>,
    sessions: Arc<SessionManager>,
    images: Arc<dyn ImageHost>,
}

impl std::fmt::Debug for UserService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UserService")
            .field("images", &self.images)
            .finish()
    }
}

/// Treat an empty string like an absent field.
pub(crate) fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

impl UserService {
    pub fn new(
        users: Arc<dyn UserStore>,
        sessions: Arc<SessionManager>,
        images: Arc<dyn ImageHost>,
    ) -> Self {
        Self {
            users,
            sessions,
            images,
        }
    }

    /// Public profile of `username`, password hash removed.
    pub async fn get_profile(&self, username: &str) -> AppResult<User> {
        self.users
            .find_by_username(username)
            .await?
            .map(User::redacted)
            .ok_or_else(|| AppError::not_found("User not found"))
    }

    /// Up to four random users the caller does not follow yet.
    pub async fn suggested(&self, ctx: &RequestContext) -> AppResult<Vec<User>> {
        let sample = self
            .users
            .sample_excluding(ctx.user_id(), SUGGESTION_SAMPLE)
            .await?;

        Ok(sample
            .into_iter()
            .filter(|u| !ctx.user.is_following(u.id))
            .take(SUGGESTION_LIMIT)
            .map(User::redacted)
            .collect())
    }

    /// Apply a profile update for the caller.
    ///
    /// Every check, including image payload decoding, runs before anything
    /// is uploaded. Replaced images are released only after the new profile
    /// is stored; fresh uploads are released again if storing fails.
    pub async fn update_profile(
        &self,
        ctx: &RequestContext,
        req: UpdateProfile,
    ) -> AppResult<User> {
        let mut user = self
            .users
            .find_by_id(ctx.user_id())
            .await?
            .ok_or_else(|| AppError::not_found("User not found"))?;

        match (non_empty(req.current_password), non_empty(req.new_password)) {
            (Some(current), Some(new)) => {
                if !self.sessions.verify_password(&user, &current)? {
                    return Err(AppError::validation("Current password is incorrect"));
                }
                user.password_hash = self.sessions.hash_new_password(&new)?;
            }
            (None, None) => {}
            _ => {
                return Err(AppError::validation(
                    "Please provide both current password and new password",
                ));
            }
        }

        if let Some(email) = non_empty(req.email).filter(|e| *e != user.email) {
            if !is_valid_email(&email) {
                return Err(AppError::validation("Invalid email format"));
            }
            if self.users.find_by_email(&email).await?.is_some() {
                return Err(AppError::conflict("Email is already taken"));
            }
            user.email = email;
        }

        if let Some(username) = non_empty(req.username).filter(|u| *u != user.username) {
            if self.users.find_by_username(&username).await?.is_some() {
                return Err(AppError::conflict("Username is already taken"));
            }
            user.username = username;
        }

        if let Some(full_name) = non_empty(req.full_name) {
            user.full_name = full_name;
        }
        if let Some(bio) = non_empty(req.bio) {
            user.bio = Some(bio);
        }
        if let Some(link) = non_empty(req.link) {
            user.link = Some(link);
        }

        let profile_payload = non_empty(req.profile_img);
        let cover_payload = non_empty(req.cover_img);
        for payload in profile_payload.iter().chain(cover_payload.iter()) {
            self.images.validate(payload)?;
        }

        let mut uploaded = Vec::new();
        let mut replaced = Vec::new();
        for (payload, slot) in [
            (profile_payload, &mut user.profile_img),
            (cover_payload, &mut user.cover_img),
        ] {
            let Some(payload) = payload else { continue };
            match self.images.upload(&payload).await {
                Ok(url) => {
                    uploaded.push(url.clone());
                    replaced.extend(slot.replace(url));
                }
                Err(e) => {
                    self.release(&uploaded).await;
                    return Err(e);
                }
            }
        }

        let updated = match self.users.update_profile(&user).await {
            Ok(updated) => updated,
            Err(e) => {
                self.release(&uploaded).await;
                return Err(e);
            }
        };
        self.release(&replaced).await;

        info!(user_id = %updated.id, "Profile updated");
        Ok(updated.redacted())
    }

    /// Release hosted images; the profile no longer references them.
    async fn release(&self, urls: &[String]) {
        for url in urls {
            match self.images.destroy_url(url).await {
                Ok(()) => debug!(url, "Released image"),
                Err(e) => warn!(url, error = %e, "Failed to release image"),
            }
        }
    }
}
