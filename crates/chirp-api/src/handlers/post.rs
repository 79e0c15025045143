//! Post handlers: listings, create, like, comment, delete.

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use uuid::Uuid;

use chirp_entity::post::PostView;

use crate::dto::request::{CommentRequest, CreatePostRequest};
use crate::dto::response::MessageResponse;
use crate::error::ApiResult;
use crate::extractors::{AuthUser, IdPath, ValidJson};
use crate::state::AppState;

/// GET /api/posts/all
pub async fn list_all(
    State(state): State<AppState>,
    _auth: AuthUser,
) -> ApiResult<Json<Vec<PostView>>> {
    Ok(Json(state.post_service.list_all().await?))
}

/// GET /api/posts/following
pub async fn list_following(
    State(state): State<AppState>,
    auth: AuthUser,
) -> ApiResult<Json<Vec<PostView>>> {
    Ok(Json(state.post_service.list_following(&auth).await?))
}

/// GET /api/posts/user/{username}
pub async fn list_by_user(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(username): Path<String>,
) -> ApiResult<Json<Vec<PostView>>> {
    Ok(Json(state.post_service.list_by_username(&username).await?))
}

/// GET /api/posts/likes/{id}
pub async fn list_liked(
    State(state): State<AppState>,
    _auth: AuthUser,
    IdPath(user_id): IdPath,
) -> ApiResult<Json<Vec<PostView>>> {
    Ok(Json(state.post_service.list_liked(user_id).await?))
}

/// POST /api/posts/create
pub async fn create(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidJson(req): ValidJson<CreatePostRequest>,
) -> ApiResult<(StatusCode, Json<PostView>)> {
    let post = state.post_service.create(&auth, req.text, req.img).await?;
    Ok((StatusCode::CREATED, Json(post)))
}

/// POST /api/posts/like/{id}
///
/// Responds with the post's resulting `likes` array.
pub async fn like(
    State(state): State<AppState>,
    auth: AuthUser,
    IdPath(post_id): IdPath,
) -> ApiResult<Json<Vec<Uuid>>> {
    let result = state.social_service.toggle_like(&auth, post_id).await?;
    Ok(Json(result.likes))
}

/// POST /api/posts/comment/{id}
pub async fn comment(
    State(state): State<AppState>,
    auth: AuthUser,
    IdPath(post_id): IdPath,
    ValidJson(req): ValidJson<CommentRequest>,
) -> ApiResult<Json<PostView>> {
    let post = state.post_service.comment(&auth, post_id, req.text).await?;
    Ok(Json(post))
}

/// DELETE /api/posts/{id}
pub async fn delete(
    State(state): State<AppState>,
    auth: AuthUser,
    IdPath(post_id): IdPath,
) -> ApiResult<Json<MessageResponse>> {
    state.post_service.delete(&auth, post_id).await?;
    Ok(Json(MessageResponse::new("Post deleted successfully")))
}
