//! Health check handler.

use axum::Json;
use axum::extract::State;

use chirp_core::result::AppResult;

use crate::dto::response::HealthResponse;
use crate::state::AppState;

/// GET /api/health
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    let store_ok = probe("store", state.stores.health_check().await);
    let images_ok = probe("images", state.images.health_check().await);

    Json(HealthResponse {
        status: if store_ok && images_ok { "ok" } else { "degraded" }.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        database: state.stores.provider_type().to_string(),
        images: state.images.provider_type().to_string(),
    })
}

fn probe(component: &str, result: AppResult<bool>) -> bool {
    result.unwrap_or_else(|e| {
        tracing::warn!(component, error = %e, "Health check failed");
        false
    })
}
