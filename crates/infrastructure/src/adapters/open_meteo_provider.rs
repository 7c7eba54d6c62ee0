//! Open-Meteo provider - Implements WeatherProviderPort using integration_weather
//!
//! Wraps the wire clients in the retry policy so transient upstream failures
//! are absorbed before they reach the application layer.

use application::error::{ApplicationError, UpstreamError};
use application::ports::WeatherProviderPort;
use async_trait::async_trait;
use domain::{GeoLocation, HourlySeries, LocationName};
use integration_weather::{
    ForecastClient, GeocodingClient, OpenMeteoClient, OpenMeteoConfig, OpenMeteoGeocoder,
    WeatherError,
};
use tracing::{debug, instrument};

use crate::retry::{RetryConfig, retry};

/// Adapter for the Open-Meteo forecast and geocoding APIs
pub struct OpenMeteoProvider {
    forecast: OpenMeteoClient,
    geocoder: OpenMeteoGeocoder,
    retry: RetryConfig,
}

impl std::fmt::Debug for OpenMeteoProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenMeteoProvider")
            .field("forecast", &"OpenMeteoClient")
            .field("geocoder", &"OpenMeteoGeocoder")
            .field("retry", &self.retry)
            .finish()
    }
}

impl OpenMeteoProvider {
    /// Create a provider with default endpoints and retry policy
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP clients fail to initialize.
    pub fn new() -> Result<Self, ApplicationError> {
        Self::with_config(OpenMeteoConfig::default(), RetryConfig::default())
    }

    /// Create with custom endpoint and retry configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP clients fail to initialize.
    pub fn with_config(
        config: OpenMeteoConfig,
        retry: RetryConfig,
    ) -> Result<Self, ApplicationError> {
        let forecast = OpenMeteoClient::new(config.clone())
            .map_err(|e| ApplicationError::Internal(e.to_string()))?;
        let geocoder = OpenMeteoGeocoder::new(config)
            .map_err(|e| ApplicationError::Internal(e.to_string()))?;
        Ok(Self {
            forecast,
            geocoder,
            retry,
        })
    }

    /// Map a wire error to the application error space
    fn map_error(err: WeatherError) -> ApplicationError {
        match err {
            WeatherError::ConnectionFailed(e) => UpstreamError::ConnectionFailure(e).into(),
            WeatherError::Timeout => UpstreamError::Timeout.into(),
            WeatherError::RequestFailed { status } => UpstreamError::Rejected { status }.into(),
            WeatherError::ParseError(e) => UpstreamError::ServiceFailure(e).into(),
            WeatherError::PlaceNotFound(name) => ApplicationError::LocationNotFound(name),
        }
    }
}

#[async_trait]
impl WeatherProviderPort for OpenMeteoProvider {
    #[instrument(skip(self))]
    async fn geocode(&self, name: &LocationName) -> Result<GeoLocation, ApplicationError> {
        let result = retry(&self.retry, || self.geocoder.geocode(name.as_str()))
            .await
            .map_err(Self::map_error);

        match &result {
            Ok(coordinates) => {
                debug!(%coordinates, "Geocoded location name");
            }
            Err(e) => {
                debug!(error = %e, "Failed to geocode location name");
            }
        }

        result
    }

    #[instrument(skip(self), fields(lat = coordinates.latitude(), lon = coordinates.longitude()))]
    async fn fetch_hourly(
        &self,
        coordinates: &GeoLocation,
    ) -> Result<HourlySeries, ApplicationError> {
        let result = retry(&self.retry, || self.forecast.fetch_hourly(coordinates))
            .await
            .map_err(Self::map_error);

        match &result {
            Ok(hourly) => {
                debug!(
                    samples = hourly.temperature_2m.len(),
                    "Fetched hourly series"
                );
            }
            Err(e) => {
                debug!(error = %e, "Failed to fetch hourly series");
            }
        }

        result
    }
}
