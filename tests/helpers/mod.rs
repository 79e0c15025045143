//! Shared test helpers for integration tests.
//!
//! Every `TestApp` runs the full router over a fresh in-memory store and a
//! temporary image directory, so no external services are needed.

#![allow(dead_code)]

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use http::{Request, StatusCode, header};
use serde_json::Value;
use tower::ServiceExt;

use chirp_api::AppState;
use chirp_core::config::{AppConfig, DatabaseProvider, ImageConfig};
use chirp_database::{MemoryStore, Stores};
use chirp_storage::LocalImageHost;

pub const PASSWORD: &str = "secret1";

/// Test application context
pub struct TestApp {
    /// The Axum router for making test requests
    pub router: Router,
    /// Assembled state, for reaching services directly
    pub state: AppState,
    /// Holds uploaded images for the lifetime of the test
    pub images_dir: tempfile::TempDir,
}

impl TestApp {
    /// Create a new test application
    pub async fn new() -> Self {
        let images_dir = tempfile::tempdir().expect("Failed to create temp dir");

        let mut config = AppConfig::default();
        config.database.provider = DatabaseProvider::Memory;
        config.images = ImageConfig {
            root_path: images_dir.path().to_string_lossy().into_owned(),
            ..ImageConfig::default()
        };

        let images = Arc::new(
            LocalImageHost::new(&config.images)
                .await
                .expect("Failed to init image host"),
        );
        let state = chirp_api::assemble(config, Stores::memory(MemoryStore::new()), images)
            .expect("Failed to assemble state");

        Self {
            router: chirp_api::build_app(state.clone()),
            state,
            images_dir,
        }
    }

    /// Sign up `name` (email `{name}@example.com`, password [`PASSWORD`]) and
    /// return the session token and the created user body.
    pub async fn signup(&self, name: &str) -> (String, Value) {
        let response = self
            .request(
                "POST",
                "/api/auth/signup",
                Some(serde_json::json!({
                    "username": name,
                    "fullName": name.to_uppercase(),
                    "email": format!("{name}@example.com"),
                    "password": PASSWORD,
                })),
                None,
            )
            .await;
        assert_eq!(
            response.status,
            StatusCode::CREATED,
            "Signup failed: {:?}",
            response.body
        );
        let token = response.session_token().expect("No session cookie on signup");
        (token, response.body)
    }

    /// Make an HTTP request to the test app, sending `token` as the session cookie.
    pub async fn request(
        &self,
        method: &str,
        path: &str,
        body: Option<Value>,
        token: Option<&str>,
    ) -> TestResponse {
        let body_str = body
            .map(|b| serde_json::to_string(&b).expect("Failed to serialize body"))
            .unwrap_or_default();

        let mut req = Request::builder()
            .method(method)
            .uri(path)
            .header(header::CONTENT_TYPE, "application/json");

        if let Some(token) = token {
            req = req.header(header::COOKIE, format!("jwt={token}"));
        }

        let req = req
            .body(Body::from(body_str))
            .expect("Failed to build request");

        let response = self
            .router
            .clone()
            .oneshot(req)
            .await
            .expect("Failed to send request");

        let status = response.status();
        let set_cookies = response
            .headers()
            .get_all(header::SET_COOKIE)
            .iter()
            .filter_map(|v| v.to_str().ok())
            .map(String::from)
            .collect();

        let body_bytes = axum::body::to_bytes(response.into_body(), 1024 * 1024)
            .await
            .expect("Failed to read body");
        let body: Value = serde_json::from_slice(&body_bytes).unwrap_or(Value::Null);

        TestResponse {
            status,
            body,
            set_cookies,
        }
    }

    /// Whether the file behind a hosted image URL still exists.
    pub fn image_exists(&self, url: &str) -> bool {
        let file_name = url.rsplit('/').next().expect("image url has no file name");
        self.images_dir.path().join(file_name).exists()
    }
}

/// Response from a test request
#[derive(Debug)]
pub struct TestResponse {
    /// HTTP status code
    pub status: StatusCode,
    /// Parsed JSON body
    pub body: Value,
    /// Raw `Set-Cookie` header values
    pub set_cookies: Vec<String>,
}

impl TestResponse {
    /// The `Set-Cookie` header for the session cookie, if one was sent.
    pub fn session_cookie(&self) -> Option<&str> {
        self.set_cookies
            .iter()
            .map(String::as_str)
            .find(|c| c.starts_with("jwt="))
    }

    /// The session token carried by the `Set-Cookie` header, if any.
    pub fn session_token(&self) -> Option<String> {
        let cookie = self.session_cookie()?;
        let value = cookie.trim_start_matches("jwt=").split(';').next()?;
        (!value.is_empty()).then(|| value.to_string())
    }

    /// The `error` code of an error body.
    pub fn error_code(&self) -> &str {
        self.body["error"].as_str().unwrap_or_default()
    }

    /// The `message` of a message or error body.
    pub fn message(&self) -> &str {
        self.body["message"].as_str().unwrap_or_default()
    }
}

/// A tiny PNG image as a data URL.
pub fn png_payload() -> String {
    // 1x1 transparent PNG.
    "data:image/png;base64,iVBORw0KGgoAAAANSUhEUgAAAAEAAAABCAQAAAC1HAwCAAAAC0lEQVR42mNkYAAAAAYAAjCB0C8AAAAASUVORK5CYII="
        .to_string()
}
