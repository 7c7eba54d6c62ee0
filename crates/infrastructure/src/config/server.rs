//! HTTP listener configuration.

use serde::{Deserialize, Serialize};

use super::default_true;

/// Settings for the HTTP listener and its middleware
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Interface to bind
    #[serde(default = "default_host")]
    pub host: String,

    /// TCP port to listen on
    #[serde(default = "default_port")]
    pub port: u16,

    /// Attach a CORS layer to the router
    #[serde(default = "default_true")]
    pub cors_enabled: bool,

    /// Origins the CORS layer accepts; empty means any origin
    #[serde(default)]
    pub allowed_origins: Vec<String>,

    /// How long to wait for in-flight requests on shutdown, in seconds
    #[serde(default)]
    pub shutdown_timeout_secs: Option<u64>,

    /// Log format: "json" for structured JSON logs, "text" for human-readable
    #[serde(default = "default_log_format")]
    pub log_format: String,

    /// Maximum body size for JSON requests in bytes (default: 64KB)
    #[serde(default = "default_max_body_json")]
    pub max_body_size_json_bytes: usize,

    /// Include internal error detail in API responses
    ///
    /// Production deployments switch this off so storage paths and upstream
    /// URLs never leak to clients.
    #[serde(default = "default_true")]
    pub expose_internal_errors: bool,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

const fn default_port() -> u16 {
    3000
}

fn default_log_format() -> String {
    "text".to_string()
}

const fn default_max_body_json() -> usize {
    64 * 1024 // 64KB
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            cors_enabled: true,
            allowed_origins: Vec::new(),
            shutdown_timeout_secs: Some(30),
            log_format: default_log_format(),
            max_body_size_json_bytes: default_max_body_json(),
            expose_internal_errors: true,
        }
    }
}
