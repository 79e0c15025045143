//! Notification handlers.

use axum::Json;
use axum::extract::State;

use chirp_entity::notification::NotificationView;

use crate::dto::response::MessageResponse;
use crate::error::ApiResult;
use crate::extractors::AuthUser;
use crate::state::AppState;

/// GET /api/notifications
///
/// Returns the list as it was, then leaves every entry marked read.
pub async fn list(
    State(state): State<AppState>,
    auth: AuthUser,
) -> ApiResult<Json<Vec<NotificationView>>> {
    Ok(Json(state.notification_service.fetch(&auth).await?))
}

/// DELETE /api/notifications
pub async fn delete_all(
    State(state): State<AppState>,
    auth: AuthUser,
) -> ApiResult<Json<MessageResponse>> {
    state.notification_service.delete_all(&auth).await?;
    Ok(Json(MessageResponse::new(
        "Notifications deleted successfully",
    )))
}
