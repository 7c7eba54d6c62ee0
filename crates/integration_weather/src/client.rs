//! Open-Meteo forecast client
//!
//! HTTP client for the Open-Meteo Weather Forecast API.

use async_trait::async_trait;
use domain::{GeoLocation, HourlySeries};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, instrument};

use crate::models::ForecastResponse;

/// Hourly series requested from the forecast endpoint.
///
/// Covers every metric the service can project plus wind direction, which is
/// stored alongside the rest of the payload.
pub const HOURLY_SERIES: &str =
    "temperature_2m,pressure_msl,precipitation,relative_humidity_2m,wind_speed_10m,wind_direction_10m";

/// Errors reported by the Open-Meteo clients
#[derive(Debug, Error)]
pub enum WeatherError {
    /// Connection to the upstream service failed
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    /// The upstream service did not answer within the configured timeout
    #[error("Request timed out")]
    Timeout,

    /// The upstream service answered with a non-success status
    #[error("Request failed: HTTP {status}")]
    RequestFailed {
        /// HTTP status code returned by the upstream service
        status: u16,
    },

    /// The upstream response body could not be decoded
    #[error("Parse error: {0}")]
    ParseError(String),

    /// Geocoding returned no candidate for the place name
    #[error("Place not found: {0}")]
    PlaceNotFound(String),
}

/// Open-Meteo endpoint configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OpenMeteoConfig {
    /// Forecast API base URL (default: <https://api.open-meteo.com>)
    #[serde(default = "default_forecast_base_url")]
    pub forecast_base_url: String,

    /// Geocoding API base URL (default: <https://geocoding-api.open-meteo.com>)
    #[serde(default = "default_geocoding_base_url")]
    pub geocoding_base_url: String,

    /// Connection timeout in seconds (default: 10)
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,

    /// Number of forecast days to request (default: 1, the current day)
    #[serde(default = "default_forecast_days")]
    pub forecast_days: u8,

    /// Language for geocoding results (default: "en")
    #[serde(default = "default_language")]
    pub language: String,
}

fn default_forecast_base_url() -> String {
    "https://api.open-meteo.com".to_string()
}

fn default_geocoding_base_url() -> String {
    "https://geocoding-api.open-meteo.com".to_string()
}

const fn default_timeout() -> u64 {
    10
}

const fn default_forecast_days() -> u8 {
    1
}

fn default_language() -> String {
    "en".to_string()
}

impl Default for OpenMeteoConfig {
    fn default() -> Self {
        Self {
            forecast_base_url: default_forecast_base_url(),
            geocoding_base_url: default_geocoding_base_url(),
            timeout_secs: default_timeout(),
            forecast_days: default_forecast_days(),
            language: default_language(),
        }
    }
}

impl OpenMeteoConfig {
    /// Configuration pointing both endpoints at a single host, for tests
    /// against a local mock server
    pub fn for_testing(base_url: &str) -> Self {
        Self {
            forecast_base_url: base_url.to_string(),
            geocoding_base_url: base_url.to_string(),
            timeout_secs: 5,
            ..Self::default()
        }
    }
}

/// Client trait for fetching hourly forecasts
#[async_trait]
pub trait ForecastClient: Send + Sync {
    /// Fetch the hourly forecast for the given coordinates
    async fn fetch_hourly(&self, coordinates: &GeoLocation) -> Result<HourlySeries, WeatherError>;
}

/// Open-Meteo HTTP client implementation
#[derive(Debug, Clone)]
pub struct OpenMeteoClient {
    client: Client,
    config: OpenMeteoConfig,
}

impl OpenMeteoClient {
    /// Client talking to the endpoints named in `config`
    ///
    /// # Errors
    ///
    /// Fails when the underlying HTTP client cannot be built, which reqwest
    /// treats as a connection-level problem.
    pub fn new(config: OpenMeteoConfig) -> Result<Self, WeatherError> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| WeatherError::ConnectionFailed(e.to_string()))?;

        Ok(Self { client, config })
    }

    /// Client against the public Open-Meteo endpoints
    ///
    /// # Errors
    ///
    /// Fails when the underlying HTTP client cannot be built.
    pub fn with_defaults() -> Result<Self, WeatherError> {
        Self::new(OpenMeteoConfig::default())
    }

    /// Build the API URL for a forecast request
    fn build_forecast_url(&self, coordinates: &GeoLocation) -> String {
        format!(
            "{}/v1/forecast?latitude={}&longitude={}&hourly={}&forecast_days={}&timezone=auto",
            self.config.forecast_base_url,
            coordinates.latitude(),
            coordinates.longitude(),
            HOURLY_SERIES,
            self.config.forecast_days,
        )
    }
}

#[async_trait]
impl ForecastClient for OpenMeteoClient {
    #[instrument(skip(self), fields(lat = coordinates.latitude(), lon = coordinates.longitude()))]
    async fn fetch_hourly(&self, coordinates: &GeoLocation) -> Result<HourlySeries, WeatherError> {
        let url = self.build_forecast_url(coordinates);
        debug!(url = %url, "Fetching hourly forecast");

        let response = self.client.get(&url).send().await.map_err(|e| {
            if e.is_timeout() {
                WeatherError::Timeout
            } else {
                WeatherError::ConnectionFailed(e.to_string())
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            return Err(WeatherError::RequestFailed {
                status: status.as_u16(),
            });
        }

        let forecast: ForecastResponse = response
            .json()
            .await
            .map_err(|e| WeatherError::ParseError(e.to_string()))?;

        debug!(samples = forecast.hourly.temperature_2m.len(), "Forecast received");
        Ok(forecast.hourly)
    }
}
