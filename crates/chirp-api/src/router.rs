//! Route definitions for the Chirp HTTP API.
//!
//! All API routes are organized by domain and mounted under `/api`. Hosted
//! images and, when configured, the single-page client are served beside them.

use std::path::Path;

use axum::{
    Router,
    extract::DefaultBodyLimit,
    middleware as axum_middleware,
    routing::{delete, get, post},
};
use tower_http::compression::CompressionLayer;
use tower_http::services::{ServeDir, ServeFile};
use tower_http::trace::TraceLayer;

use chirp_core::error::AppError;

use crate::error::ApiError;
use crate::handlers;
use crate::middleware;
use crate::state::AppState;

/// Build the complete Axum router with all routes and middleware.
pub fn build_router(state: AppState) -> Router {
    let config = state.config.clone();

    let api_routes = Router::new()
        .merge(auth_routes())
        .merge(user_routes())
        .merge(post_routes())
        .merge(notification_routes())
        .merge(health_routes())
        .fallback(api_not_found);

    let mut router = Router::new().nest("/api", api_routes);

    // Images are only served here when the local host hands out local paths.
    let images_url = config.images.public_base_url.trim_end_matches('/');
    if images_url.starts_with('/') && images_url.len() > 1 {
        router = router.nest_service(images_url, ServeDir::new(&config.images.root_path));
    }

    if let Some(dir) = &config.server.static_dir {
        let index = Path::new(dir).join("index.html");
        router = router.fallback_service(ServeDir::new(dir).fallback(ServeFile::new(index)));
    }

    router
        .layer(DefaultBodyLimit::max(config.server.max_body_bytes))
        .layer(CompressionLayer::new())
        .layer(middleware::cors::build_cors_layer(&config.server.cors))
        .layer(axum_middleware::from_fn(middleware::logging::request_logging))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Signup, login, logout, me
fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/signup", post(handlers::auth::signup))
        .route("/auth/login", post(handlers::auth::login))
        .route("/auth/logout", post(handlers::auth::logout))
        .route("/auth/me", get(handlers::auth::me))
}

/// Profiles, suggestions, follow toggle, profile update
fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/users/profile/{username}", get(handlers::user::get_profile))
        .route("/users/suggested", get(handlers::user::suggested))
        .route("/users/follow/{id}", post(handlers::user::follow))
        .route("/users/update", post(handlers::user::update_profile))
}

/// Feeds, create, like, comment, delete
fn post_routes() -> Router<AppState> {
    Router::new()
        .route("/posts/all", get(handlers::post::list_all))
        .route("/posts/following", get(handlers::post::list_following))
        .route("/posts/user/{username}", get(handlers::post::list_by_user))
        .route("/posts/likes/{id}", get(handlers::post::list_liked))
        .route("/posts/create", post(handlers::post::create))
        .route("/posts/like/{id}", post(handlers::post::like))
        .route("/posts/comment/{id}", post(handlers::post::comment))
        .route("/posts/{id}", delete(handlers::post::delete))
}

/// Fetch-and-mark-read, purge
fn notification_routes() -> Router<AppState> {
    Router::new().route(
        "/notifications",
        get(handlers::notification::list).delete(handlers::notification::delete_all),
    )
}

fn health_routes() -> Router<AppState> {
    Router::new().route("/health", get(handlers::health::health))
}

async fn api_not_found() -> ApiError {
    AppError::not_found("Route not found").into()
}
