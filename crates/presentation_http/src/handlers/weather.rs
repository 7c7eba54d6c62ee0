//! Weather resolution handlers
//!
//! Serves cached hourly observations, falling back to the upstream
//! provider when a location is unknown or its data has gone stale.

use application::WeatherReport;
use axum::{
    Json,
    extract::{Query, State},
};
use chrono::{DateTime, Utc};
use domain::{GeoLocation, HourOfDay, WeatherMetric};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};
use utoipa::{IntoParams, ToSchema};

use crate::{error::ApiError, state::AppState};

// ---------------------------------------------------------------------------
// Query parameters
// ---------------------------------------------------------------------------

/// Query parameters for GET /v1/weather
#[derive(Debug, Deserialize, IntoParams)]
pub struct WeatherQuery {
    /// Place name, any casing
    pub location: String,
    /// Hour of day in UTC, 0-23
    pub hour: u8,
    /// Comma-separated metric names (temperature, precipitation, pressure,
    /// wind_speed, humidity); omitted means temperature, wind_speed, pressure
    pub metrics: Option<String>,
}

/// Query parameters for GET /v1/weather/current
#[derive(Debug, Deserialize, IntoParams)]
pub struct CurrentWeatherQuery {
    /// Latitude in degrees
    pub latitude: f64,
    /// Longitude in degrees
    pub longitude: f64,
}

// ---------------------------------------------------------------------------
// Response DTO
// ---------------------------------------------------------------------------

/// An hourly weather report
///
/// Only the requested metrics are present; the rest are omitted from the
/// JSON body entirely.
#[derive(Debug, Serialize, ToSchema)]
#[schema(example = json!({
    "location": "Paris",
    "latitude": 48.85,
    "longitude": 2.35,
    "hour": 14,
    "updated_at": "2026-08-25T07:00:00Z",
    "temperature": 12.3,
    "wind_speed": 8.5,
    "pressure": 1013.2
}))]
pub struct WeatherResponse {
    /// Normalized location name; absent for coordinate-only lookups
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    /// Latitude in degrees
    pub latitude: f64,
    /// Longitude in degrees
    pub longitude: f64,
    /// Hour of day the values describe, UTC
    pub hour: u8,
    /// When the backing observation was fetched from upstream
    pub updated_at: DateTime<Utc>,
    /// Air temperature at 2m, degrees Celsius
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f64>,
    /// Precipitation sum, millimeters
    #[serde(skip_serializing_if = "Option::is_none")]
    pub precipitation: Option<f64>,
    /// Sea-level pressure, hectopascals
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pressure: Option<f64>,
    /// Wind speed at 10m, km/h
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wind_speed: Option<f64>,
    /// Relative humidity at 2m, percent
    #[serde(skip_serializing_if = "Option::is_none")]
    pub humidity: Option<f64>,
}

impl From<WeatherReport> for WeatherResponse {
    fn from(report: WeatherReport) -> Self {
        Self {
            location: report.location,
            latitude: report.latitude,
            longitude: report.longitude,
            hour: report.hour.value(),
            updated_at: report.updated_at,
            temperature: report.temperature,
            precipitation: report.precipitation,
            pressure: report.pressure,
            wind_speed: report.wind_speed,
            humidity: report.humidity,
        }
    }
}

// ---------------------------------------------------------------------------
// Parsing helpers
// ---------------------------------------------------------------------------

/// Parse the `metrics` CSV into typed metrics.
///
/// Empty segments are dropped, so `metrics=` and a trailing comma both mean
/// "no explicit selection" and the service applies its default set.
fn parse_metrics(raw: Option<&str>) -> Result<Vec<WeatherMetric>, ApiError> {
    let Some(raw) = raw else {
        return Ok(Vec::new());
    };

    raw.split(',')
        .map(str::trim)
        .filter(|segment| !segment.is_empty())
        .map(|segment| {
            segment
                .parse::<WeatherMetric>()
                .map_err(|e| ApiError::BadRequest(e.to_string()))
        })
        .collect()
}

fn parse_hour(hour: u8) -> Result<HourOfDay, ApiError> {
    HourOfDay::new(hour).map_err(|e| ApiError::BadRequest(e.to_string()))
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// Resolve weather for a named place at an hour of day
///
/// GET /v1/weather?location=Paris&hour=14&metrics=temperature,humidity
///
/// Answers from the local cache when the observation is fresh; otherwise
/// refetches from upstream, and geocodes the name first when the place has
/// never been seen.
#[utoipa::path(
    get,
    path = "/v1/weather",
    tag = "weather",
    params(WeatherQuery),
    responses(
        (status = 200, description = "Weather report for the requested hour", body = WeatherResponse),
        (status = 400, description = "Invalid hour or metric name", body = crate::error::ErrorResponse),
        (status = 404, description = "Place name could not be geocoded", body = crate::error::ErrorResponse),
        (status = 408, description = "Upstream timed out", body = crate::error::ErrorResponse),
        (status = 503, description = "Upstream unreachable", body = crate::error::ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn get_weather(
    State(state): State<AppState>,
    Query(query): Query<WeatherQuery>,
) -> Result<Json<WeatherResponse>, ApiError> {
    let hour = parse_hour(query.hour)?;
    let metrics = parse_metrics(query.metrics.as_deref())?;

    let report = state
        .weather_service
        .resolve(&query.location, hour, &metrics)
        .await?;

    debug!(location = %query.location, hour = %hour, "Resolved weather report");
    Ok(Json(WeatherResponse::from(report)))
}

/// Current conditions for raw coordinates
///
/// GET /v1/weather/current?latitude=48.85&longitude=2.35
///
/// Always fetches live from upstream for the current UTC hour; nothing is
/// cached or tracked for these lookups.
#[utoipa::path(
    get,
    path = "/v1/weather/current",
    tag = "weather",
    params(CurrentWeatherQuery),
    responses(
        (status = 200, description = "Current conditions at the coordinates", body = WeatherResponse),
        (status = 400, description = "Coordinates out of range", body = crate::error::ErrorResponse),
        (status = 408, description = "Upstream timed out", body = crate::error::ErrorResponse),
        (status = 503, description = "Upstream unreachable", body = crate::error::ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn current_weather(
    State(state): State<AppState>,
    Query(query): Query<CurrentWeatherQuery>,
) -> Result<Json<WeatherResponse>, ApiError> {
    let coordinates = GeoLocation::new(query.latitude, query.longitude)
        .map_err(|e| ApiError::BadRequest(e.to_string()))?;

    let report = state.weather_service.current_at(coordinates).await?;

    debug!(
        latitude = query.latitude,
        longitude = query.longitude,
        "Fetched current conditions"
    );
    Ok(Json(WeatherResponse::from(report)))
}
