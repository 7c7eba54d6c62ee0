//! Weather provider port
//!
//! Defines the interface for talking to the upstream forecast and geocoding
//! services.

use async_trait::async_trait;
use domain::{GeoLocation, HourlySeries, LocationName};
#[cfg(test)]
use mockall::automock;

use crate::error::ApplicationError;

/// Port for upstream weather data retrieval
#[cfg_attr(test, automock)]
#[async_trait]
pub trait WeatherProviderPort: Send + Sync {
    /// Resolve a place name to coordinates
    ///
    /// Returns `ApplicationError::LocationNotFound` when the upstream service
    /// has no candidate for the name.
    async fn geocode(&self, name: &LocationName) -> Result<GeoLocation, ApplicationError>;

    /// Fetch a fresh hourly forecast for the given coordinates
    async fn fetch_hourly(
        &self,
        coordinates: &GeoLocation,
    ) -> Result<HourlySeries, ApplicationError>;
}
