//! Shared application state passed to all handlers via Axum's `State` extractor.

use std::sync::Arc;

use chirp_auth::SessionManager;
use chirp_core::config::AppConfig;
use chirp_core::traits::ImageHost;
use chirp_database::Stores;
use chirp_service::{NotificationService, PostService, SocialGraphService, UserService};

/// Application state shared across all request handlers.
///
/// Every field is cheap to clone (`Arc` handles), so Axum can hand a copy to
/// each request.
#[derive(Debug, Clone)]
pub struct AppState {
    // ── Configuration ────────────────────────────────────────────
    pub config: Arc<AppConfig>,

    // ── Infrastructure ───────────────────────────────────────────
    pub stores: Stores,
    pub images: Arc<dyn ImageHost>,

    // ── Auth ─────────────────────────────────────────────────────
    pub sessions: Arc<SessionManager>,

    // ── Services ─────────────────────────────────────────────────
    pub user_service: Arc<UserService>,
    pub post_service: Arc<PostService>,
    pub social_service: Arc<SocialGraphService>,
    pub notification_service: Arc<NotificationService>,
}
