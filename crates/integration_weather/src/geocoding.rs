//! Open-Meteo geocoding client
//!
//! Resolves place names to coordinates via the Open-Meteo Geocoding API.

use async_trait::async_trait;
use domain::GeoLocation;
use reqwest::Client;
use tracing::{debug, instrument};

use crate::client::{OpenMeteoConfig, WeatherError};
use crate::models::GeocodingResponse;

/// Client trait for resolving place names to coordinates
#[async_trait]
pub trait GeocodingClient: Send + Sync {
    /// Resolve a place name to coordinates
    ///
    /// Returns the best candidate reported by the upstream service.
    async fn geocode(&self, name: &str) -> Result<GeoLocation, WeatherError>;
}

/// Open-Meteo geocoding client implementation
#[derive(Debug, Clone)]
pub struct OpenMeteoGeocoder {
    client: Client,
    config: OpenMeteoConfig,
}

impl OpenMeteoGeocoder {
    /// Create a new geocoding client with the given configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be initialized.
    pub fn new(config: OpenMeteoConfig) -> Result<Self, WeatherError> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| WeatherError::ConnectionFailed(e.to_string()))?;

        Ok(Self { client, config })
    }

    /// Create a new geocoding client with default configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be initialized.
    pub fn with_defaults() -> Result<Self, WeatherError> {
        Self::new(OpenMeteoConfig::default())
    }
}

#[async_trait]
impl GeocodingClient for OpenMeteoGeocoder {
    #[instrument(skip(self))]
    async fn geocode(&self, name: &str) -> Result<GeoLocation, WeatherError> {
        let query = name.trim();
        if query.is_empty() {
            return Err(WeatherError::PlaceNotFound(name.to_string()));
        }

        let url = format!("{}/v1/search", self.config.geocoding_base_url);
        debug!(url = %url, query = %query, "Geocoding place name");

        let response = self
            .client
            .get(&url)
            .query(&[
                ("name", query),
                ("count", "1"),
                ("language", self.config.language.as_str()),
            ])
            .send()
            .await
            .map_err(|e| {
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

        let body: GeocodingResponse = response
            .json()
            .await
            .map_err(|e| WeatherError::ParseError(e.to_string()))?;

        let candidate = body
            .results
            .unwrap_or_default()
            .into_iter()
            .next()
            .ok_or_else(|| WeatherError::PlaceNotFound(query.to_string()))?;

        let coordinates = GeoLocation::new(candidate.latitude, candidate.longitude)
            .map_err(|e| WeatherError::ParseError(e.to_string()))?;

        debug!(
            lat = coordinates.latitude(),
            lon = coordinates.longitude(),
            resolved = candidate.name.as_deref().unwrap_or(query),
            "Geocoded place name"
        );
        Ok(coordinates)
    }
}
