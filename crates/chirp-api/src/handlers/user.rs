//! User handlers: profile, suggestions, follow toggle, profile update.

use axum::Json;
use axum::extract::{Path, State};

use chirp_entity::user::User;

use crate::dto::request::UpdateProfileRequest;
use crate::dto::response::MessageResponse;
use crate::error::ApiResult;
use crate::extractors::{AuthUser, IdPath, ValidJson};
use crate::state::AppState;

/// GET /api/users/profile/{username}
pub async fn get_profile(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(username): Path<String>,
) -> ApiResult<Json<User>> {
    let user = state.user_service.get_profile(&username).await?;
    Ok(Json(user))
}

/// GET /api/users/suggested
pub async fn suggested(
    State(state): State<AppState>,
    auth: AuthUser,
) -> ApiResult<Json<Vec<User>>> {
    let users = state.user_service.suggested(&auth).await?;
    Ok(Json(users))
}

/// POST /api/users/follow/{id}
pub async fn follow(
    State(state): State<AppState>,
    auth: AuthUser,
    IdPath(target): IdPath,
) -> ApiResult<Json<MessageResponse>> {
    let action = state.social_service.toggle_follow(&auth, target).await?;
    Ok(Json(MessageResponse::new(action.message())))
}

/// POST /api/users/update
pub async fn update_profile(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidJson(req): ValidJson<UpdateProfileRequest>,
) -> ApiResult<Json<User>> {
    let user = state.user_service.update_profile(&auth, req.into()).await?;
    Ok(Json(user))
}
