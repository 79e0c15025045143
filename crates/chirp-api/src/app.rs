//! Application builder: wires stores, auth, services and the router, and runs the server.

use std::sync::Arc;

use axum::Router;

use chirp_auth::SessionManager;
use chirp_core::config::AppConfig;
use chirp_core::error::AppError;
use chirp_core::result::AppResult;
use chirp_core::traits::ImageHost;
use chirp_database::Stores;
use chirp_service::{NotificationService, PostService, SocialGraphService, UserService};
use chirp_storage::LocalImageHost;

use crate::router::build_router;
use crate::state::AppState;

/// Builds the complete Axum application from an assembled state.
pub fn build_app(state: AppState) -> Router {
    build_router(state)
}

/// Open the store and image host named by `config` and wire every service.
pub async fn build_state(config: AppConfig) -> AppResult<AppState> {
    tracing::info!(provider = ?config.database.provider, "Opening store...");
    let stores = Stores::connect(&config.database).await?;

    let images: Arc<dyn ImageHost> = Arc::new(LocalImageHost::new(&config.images).await?);
    tracing::info!(root = %config.images.root_path, "Image host ready");

    assemble(config, stores, images)
}

/// Wire services over already-open infrastructure.
pub fn assemble(
    config: AppConfig,
    stores: Stores,
    images: Arc<dyn ImageHost>,
) -> AppResult<AppState> {
    let sessions = Arc::new(SessionManager::new(stores.users.clone(), &config.auth)?);

    let user_service = Arc::new(UserService::new(
        stores.users.clone(),
        Arc::clone(&sessions),
        Arc::clone(&images),
    ));
    let post_service = Arc::new(PostService::new(
        stores.posts.clone(),
        stores.users.clone(),
        Arc::clone(&images),
    ));
    let social_service = Arc::new(SocialGraphService::new(stores.graph.clone()));
    let notification_service = Arc::new(NotificationService::new(stores.notifications.clone()));

    Ok(AppState {
        config: Arc::new(config),
        stores,
        images,
        sessions,
        user_service,
        post_service,
        social_service,
        notification_service,
    })
}

/// Runs the Chirp server until Ctrl+C or SIGTERM.
pub async fn run_server(config: AppConfig) -> Result<(), AppError> {
    tracing::info!("Starting Chirp v{}", env!("CARGO_PKG_VERSION"));

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let state = build_state(config).await?;
    let stores = state.stores.clone();
    let app = build_app(state);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| AppError::internal(format!("Failed to bind {}: {}", addr, e)))?;

    tracing::info!("Chirp server listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| AppError::internal(format!("Server error: {}", e)))?;

    stores.close().await;
    tracing::info!("Chirp server shut down gracefully");
    Ok(())
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM)
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    tracing::info!("Shutdown signal received, starting graceful shutdown...");
}
