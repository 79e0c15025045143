//! Request DTOs with validation.

use serde::{Deserialize, Serialize};
use validator::Validate;

use chirp_auth::NewIdentity;
use chirp_service::UpdateProfile;

/// Signup request body.
///
/// Only presence is checked here; format, uniqueness and password policy are
/// enforced by the session manager in their fixed order.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct SignupRequest {
    #[validate(length(min = 1, message = "Username is required"))]
    pub username: String,
    #[validate(length(min = 1, message = "Full name is required"))]
    pub full_name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

impl From<SignupRequest> for NewIdentity {
    fn from(req: SignupRequest) -> Self {
        Self {
            username: req.username,
            full_name: req.full_name,
            email: req.email,
            password: req.password,
        }
    }
}

/// Login request body.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(length(min = 1, message = "Username is required"))]
    pub username: String,
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

/// Profile update body. Every field is optional; empty strings are ignored.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProfileRequest {
    pub full_name: Option<String>,
    pub email: Option<String>,
    pub username: Option<String>,
    pub bio: Option<String>,
    #[validate(length(max = 2048, message = "Link is too long"))]
    pub link: Option<String>,
    /// Data-URL image payload for a new avatar.
    pub profile_img: Option<String>,
    /// Data-URL image payload for a new cover image.
    pub cover_img: Option<String>,
    pub current_password: Option<String>,
    pub new_password: Option<String>,
}

impl From<UpdateProfileRequest> for UpdateProfile {
    fn from(req: UpdateProfileRequest) -> Self {
        Self {
            full_name: req.full_name,
            email: req.email,
            username: req.username,
            bio: req.bio,
            link: req.link,
            profile_img: req.profile_img,
            cover_img: req.cover_img,
            current_password: req.current_password,
            new_password: req.new_password,
        }
    }
}

/// New post body.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct CreatePostRequest {
    pub text: Option<String>,
    /// Data-URL image payload.
    pub img: Option<String>,
}

/// Comment body.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct CommentRequest {
    pub text: Option<String>,
}
