//! Authentication configuration.

use serde::{Deserialize, Serialize};

/// Session token and credential policy configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// Secret key for JWT signing (HMAC-SHA256).
    #[serde(default = "default_jwt_secret")]
    pub jwt_secret: String,
    /// Session token lifetime in days.
    #[serde(default = "default_session_ttl")]
    pub session_ttl_days: u64,
    /// Name of the cookie carrying the session token.
    #[serde(default = "default_cookie_name")]
    pub cookie_name: String,
    /// Minimum password length.
    #[serde(default = "default_password_min")]
    pub password_min_length: usize,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt_secret: default_jwt_secret(),
            session_ttl_days: default_session_ttl(),
            cookie_name: default_cookie_name(),
            password_min_length: default_password_min(),
        }
    }
}

/// Placeholder signing secret; only accepted in development.
pub const DEFAULT_JWT_SECRET: &str = "CHANGE_ME_IN_PRODUCTION";

/// Longest accepted session lifetime.
pub const MAX_SESSION_TTL_DAYS: u64 = 3650;

fn default_jwt_secret() -> String {
    DEFAULT_JWT_SECRET.to_string()
}

fn default_session_ttl() -> u64 {
    15
}

fn default_cookie_name() -> String {
    "jwt".to_string()
}

fn default_password_min() -> usize {
    6
}
