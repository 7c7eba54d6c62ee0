//! Application configuration
//!
//! Split into focused sub-modules by domain:
//! - `server`: HTTP server settings
//! - `database`: SQLite database settings
//! - `upstream`: Open-Meteo endpoints
//! - `resilience`: Retry policy for upstream calls
//! - `refresh`: Background refresh scheduler

mod database;
mod refresh;
mod resilience;
mod server;
mod upstream;

use serde::{Deserialize, Serialize};

pub use database::DatabaseConfig;
pub use refresh::RefreshAppConfig;
pub use resilience::RetryAppConfig;
pub use server::ServerConfig;
pub use upstream::UpstreamConfig;

/// Shared default for boolean `true` fields across config structs
pub(crate) const fn default_true() -> bool {
    true
}

/// Main application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Server configuration
    #[serde(default)]
    pub server: ServerConfig,

    /// Database configuration
    #[serde(default)]
    pub database: DatabaseConfig,

    /// Open-Meteo upstream configuration
    #[serde(default)]
    pub upstream: UpstreamConfig,

    /// Retry configuration for upstream calls
    #[serde(default)]
    pub retry: RetryAppConfig,

    /// Background refresh configuration
    #[serde(default)]
    pub refresh: RefreshAppConfig,
}

impl AppConfig {
    /// Load configuration from environment and optional file
    ///
    /// # Errors
    ///
    /// Returns an error when the file or environment contains values that do
    /// not deserialize into the expected types.
    pub fn load() -> Result<Self, config::ConfigError> {
        let builder = config::Config::builder()
            // Start with defaults
            .set_default("server.host", "127.0.0.1")?
            .set_default("server.port", 3000)?
            .set_default("database.path", "stratus.db")?
            // Load from file if exists
            .add_source(config::File::with_name("config").required(false))
            // Override with environment variables (e.g., STRATUS_SERVER_PORT)
            .add_source(
                config::Environment::with_prefix("STRATUS")
                    .separator("_")
                    .try_parsing(true),
            );

        let config = builder.build()?;
        config.try_deserialize()
    }
}
