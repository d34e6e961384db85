//! Application configuration module
//!
//! Type-safe configuration loaded from environment variables using the
//! `config` and `dotenvy` crates. Variables carry the `GROUP_TRIPS` prefix and
//! nested values are separated by double underscores.
//!
//! # Example
//!
//! ```no_run
//! use group_trips::config::AppConfig;
//!
//! let config = AppConfig::load().expect("Failed to load configuration");
//! config.validate().expect("Invalid configuration");
//! ```

mod auth;
mod database;
mod error;
mod server;
mod trips;

pub use auth::{AuthConfig, MIN_JWT_SECRET_BYTES};
pub use database::DatabaseConfig;
pub use error::{ConfigError, ValidationError};
pub use server::{Environment, ServerConfig};
pub use trips::{StorageBackend, TripsConfig, MAX_INVITE_CODE_ATTEMPTS};

use serde::Deserialize;

use crate::adapters::auth::JwtConfig;
use crate::adapters::http::RouterOptions;

/// Root application configuration
///
/// Load using [`AppConfig::load()`] which reads from environment variables.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Server configuration (host, port, environment)
    #[serde(default)]
    pub server: ServerConfig,

    /// Database configuration; only consulted with the Postgres backend
    #[serde(default)]
    pub database: DatabaseConfig,

    /// Authentication configuration (shared-secret JWT)
    pub auth: AuthConfig,

    /// Trip service settings
    #[serde(default)]
    pub trips: TripsConfig,
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// # Environment Variable Format
    ///
    /// - `GROUP_TRIPS__SERVER__PORT=8080` -> `server.port = 8080`
    /// - `GROUP_TRIPS__DATABASE__URL=...` -> `database.url = ...`
    /// - `GROUP_TRIPS__TRIPS__STORAGE=memory` -> `trips.storage = Memory`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or values
    /// cannot be parsed into the expected types.
    pub fn load() -> Result<Self, ConfigError> {
        // Load .env file if present (development)
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(
                config::Environment::default()
                    .prefix("GROUP_TRIPS")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    /// Validate all configuration values
    ///
    /// The database section is checked only when Postgres backs the store.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.server.validate()?;
        if self.trips.storage == StorageBackend::Postgres {
            self.database.validate()?;
        }
        self.auth.validate(&self.server.environment)?;
        self.trips.validate()?;
        Ok(())
    }

    /// Check if running in production environment
    pub fn is_production(&self) -> bool {
        self.server.is_production()
    }

    pub fn jwt_config(&self) -> JwtConfig {
        JwtConfig::new(
            self.auth.jwt_secret.clone(),
            self.auth.issuer.clone(),
            self.auth.audience.clone(),
        )
        .with_leeway(self.auth.leeway_secs)
    }

    pub fn router_options(&self) -> RouterOptions {
        RouterOptions {
            request_timeout: self.server.request_timeout(),
            cors_origins: self.server.cors_origins_list(),
        }
    }
}
