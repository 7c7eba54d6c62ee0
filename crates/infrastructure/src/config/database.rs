//! SQLite storage configuration.

use serde::{Deserialize, Serialize};

use super::default_true;

/// Settings for the SQLite connection pool
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// Database file location, or `:memory:` for an ephemeral database
    #[serde(default = "default_db_path")]
    pub path: String,

    /// Upper bound on pooled connections
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,

    /// Apply pending schema migrations when the pool is created
    #[serde(default = "default_true")]
    pub run_migrations: bool,
}

fn default_db_path() -> String {
    "stratus.db".to_string()
}

const fn default_max_connections() -> u32 {
    5
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_db_path(),
            max_connections: default_max_connections(),
            // A fresh database is useless without the schema
            run_migrations: true,
        }
    }
}
