//! Application configuration schemas.
//!
//! All configuration structs are deserialized via the `config` crate from
//! TOML files and `CHIRP_`-prefixed environment variables. Each sub-module
//! represents a logical configuration section.

pub mod app;
pub mod auth;
pub mod database;
pub mod images;
pub mod logging;

use serde::{Deserialize, Serialize};

pub use self::app::{CorsConfig, ServerConfig};
pub use self::auth::AuthConfig;
pub use self::database::{DatabaseConfig, DatabaseProvider};
pub use self::images::ImageConfig;
pub use self::logging::LoggingConfig;

use crate::error::AppError;

/// Name of the environment in which cookies may travel over plain HTTP.
pub const DEVELOPMENT_ENV: &str = "development";

/// Root application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Deployment environment name (`development`, `production`, ...).
    #[serde(default = "default_environment")]
    pub environment: String,
    /// HTTP server settings.
    #[serde(default)]
    pub server: ServerConfig,
    /// Persistence settings.
    #[serde(default)]
    pub database: DatabaseConfig,
    /// Session and credential settings.
    #[serde(default)]
    pub auth: AuthConfig,
    /// Image hosting settings.
    #[serde(default)]
    pub images: ImageConfig,
    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load configuration for the named environment.
    ///
    /// Merges `config/default.toml`, `config/{env}.toml` and environment
    /// variables prefixed with `CHIRP_` (nested keys separated by `__`).
    pub fn load(env: &str) -> Result<Self, AppError> {
        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{env}")).required(false))
            .add_source(
                config::Environment::with_prefix("CHIRP")
                    .separator("__")
                    .try_parsing(true),
            )
            .set_override("environment", env)?
            .build()
            .map_err(|e| AppError::configuration(format!("Failed to build config: {e}")))?;

        let config: Self = config
            .try_deserialize()
            .map_err(|e| AppError::configuration(format!("Failed to deserialize config: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    /// Reject settings the server must not start with.
    pub fn validate(&self) -> Result<(), AppError> {
        if !self.is_development() && self.auth.jwt_secret == auth::DEFAULT_JWT_SECRET {
            return Err(AppError::configuration(
                "auth.jwt_secret must be set (CHIRP_AUTH__JWT_SECRET) outside development",
            ));
        }
        if self.auth.jwt_secret.is_empty() {
            return Err(AppError::configuration("auth.jwt_secret must not be empty"));
        }
        if self.auth.session_ttl_days == 0 || self.auth.session_ttl_days > auth::MAX_SESSION_TTL_DAYS {
            return Err(AppError::configuration(format!(
                "auth.session_ttl_days must be between 1 and {}",
                auth::MAX_SESSION_TTL_DAYS
            )));
        }
        Ok(())
    }

    /// Whether the application runs in local development mode.
    pub fn is_development(&self) -> bool {
        self.environment == DEVELOPMENT_ENV
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            environment: default_environment(),
            server: ServerConfig::default(),
            database: DatabaseConfig::default(),
            auth: AuthConfig::default(),
            images: ImageConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

fn default_environment() -> String {
    DEVELOPMENT_ENV.to_string()
}
