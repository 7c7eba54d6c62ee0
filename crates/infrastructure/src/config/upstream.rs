//! Upstream weather provider (Open-Meteo) configuration.

use serde::{Deserialize, Serialize};

/// Open-Meteo upstream configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpstreamConfig {
    /// Forecast API base URL
    #[serde(default = "default_forecast_base_url")]
    pub forecast_base_url: String,

    /// Geocoding API base URL
    #[serde(default = "default_geocoding_base_url")]
    pub geocoding_base_url: String,

    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Number of forecast days to request (1-16)
    #[serde(default = "default_forecast_days")]
    pub forecast_days: u8,

    /// Language for geocoding results
    #[serde(default = "default_language")]
    pub language: String,
}

fn default_forecast_base_url() -> String {
    "https://api.open-meteo.com".to_string()
}

fn default_geocoding_base_url() -> String {
    "https://geocoding-api.open-meteo.com".to_string()
}

const fn default_timeout_secs() -> u64 {
    10
}

const fn default_forecast_days() -> u8 {
    1
}

fn default_language() -> String {
    "en".to_string()
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            forecast_base_url: default_forecast_base_url(),
            geocoding_base_url: default_geocoding_base_url(),
            timeout_secs: default_timeout_secs(),
            forecast_days: default_forecast_days(),
            language: default_language(),
        }
    }
}

impl UpstreamConfig {
    /// Convert to the wire client configuration
    #[must_use]
    pub fn to_client_config(&self) -> integration_weather::OpenMeteoConfig {
        integration_weather::OpenMeteoConfig {
            forecast_base_url: self.forecast_base_url.clone(),
            geocoding_base_url: self.geocoding_base_url.clone(),
            timeout_secs: self.timeout_secs,
            forecast_days: self.forecast_days,
            language: self.language.clone(),
        }
    }
}
