//! Wire models for the Open-Meteo APIs
//!
//! Raw response shapes, reduced to the fields Stratus reads.

use domain::HourlySeries;
use serde::Deserialize;

/// Forecast endpoint response
///
/// The hourly block deserializes straight into the domain payload; series the
/// service does not project (wind direction, timestamps) are preserved there
/// untouched.
#[derive(Debug, Clone, Deserialize)]
pub struct ForecastResponse {
    /// Latitude of the grid cell the forecast was computed for
    pub latitude: f64,
    /// Longitude of the grid cell the forecast was computed for
    pub longitude: f64,
    /// Hourly series block
    pub hourly: HourlySeries,
}

/// Geocoding search response
#[derive(Debug, Clone, Deserialize)]
pub struct GeocodingResponse {
    /// Candidate places, absent entirely when nothing matched
    #[serde(default)]
    pub results: Option<Vec<GeocodingMatch>>,
}

/// A single geocoding candidate
#[derive(Debug, Clone, Deserialize)]
pub struct GeocodingMatch {
    /// Candidate latitude in decimal degrees
    pub latitude: f64,
    /// Candidate longitude in decimal degrees
    pub longitude: f64,
    /// Place name as reported upstream
    #[serde(default)]
    pub name: Option<String>,
    /// Country the place belongs to
    #[serde(default)]
    pub country: Option<String>,
}
