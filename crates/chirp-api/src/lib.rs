//! # chirp-api
//!
//! HTTP API layer for Chirp built on Axum.
//!
//! Provides the router, request handlers, DTOs, the cookie-session
//! extractor, and middleware. Handlers are thin: they extract input, call a
//! service from `chirp-service`, and serialize the result.

pub mod app;
pub mod cookie;
pub mod dto;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod middleware;
pub mod router;
pub mod state;

pub use app::{assemble, build_app, build_state, run_server};
pub use error::{ApiError, ApiResult};
pub use state::AppState;
