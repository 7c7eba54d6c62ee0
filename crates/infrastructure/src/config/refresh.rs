//! Background refresh scheduler configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::default_true;

/// Background refresh configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RefreshAppConfig {
    /// Whether the background refresh loop runs at all (default: true)
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Pause between refresh cycles in seconds, measured from the end of the
    /// previous cycle (default: 900s = 15 minutes)
    #[serde(default = "default_interval_secs")]
    pub interval_secs: u64,

    /// Maximum number of concurrent upstream fetches per cycle (default: 4)
    #[serde(default = "default_max_concurrency")]
    pub max_concurrency: usize,
}

const fn default_interval_secs() -> u64 {
    900
}

const fn default_max_concurrency() -> usize {
    4
}

impl Default for RefreshAppConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            interval_secs: default_interval_secs(),
            max_concurrency: default_max_concurrency(),
        }
    }
}

impl RefreshAppConfig {
    /// Convert to the application-layer refresh configuration
    #[must_use]
    pub const fn to_refresh_config(&self) -> application::RefreshConfig {
        application::RefreshConfig {
            interval: Duration::from_secs(self.interval_secs),
            max_concurrency: self.max_concurrency,
        }
    }
}
