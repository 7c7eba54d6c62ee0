//! Tracked location handlers
//!
//! REST API endpoints for the set of locations the background refresh
//! keeps warm.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use chrono::{DateTime, Utc};
use domain::{GeoLocation, Location};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};
use utoipa::ToSchema;
use validator::Validate;

use crate::{error::ApiError, middleware::ValidatedJson, state::AppState};

// ---------------------------------------------------------------------------
// Response / request DTOs
// ---------------------------------------------------------------------------

/// A tracked location
#[derive(Debug, Serialize, ToSchema)]
#[schema(example = json!({
    "id": "550e8400-e29b-41d4-a716-446655440000",
    "name": "Paris",
    "latitude": 48.85,
    "longitude": 2.35,
    "created_at": "2026-08-25T07:00:00Z"
}))]
pub struct LocationResponse {
    /// Unique location ID
    pub id: String,
    /// Normalized display name
    pub name: String,
    /// Latitude in degrees
    pub latitude: f64,
    /// Longitude in degrees
    pub longitude: f64,
    /// When the location was first registered
    pub created_at: DateTime<Utc>,
}

impl From<Location> for LocationResponse {
    fn from(location: Location) -> Self {
        Self {
            id: location.id.to_string(),
            name: location.name.to_string(),
            latitude: location.coordinates.latitude(),
            longitude: location.coordinates.longitude(),
            created_at: location.created_at,
        }
    }
}

/// Register location request body
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[schema(example = json!({
    "name": "Paris",
    "latitude": 48.85,
    "longitude": 2.35
}))]
pub struct RegisterLocationRequest {
    /// Place name; stored in normalized title case
    #[validate(length(min = 1, max = 120, message = "must be between 1 and 120 characters"))]
    pub name: String,
    /// Latitude in degrees
    #[validate(range(min = -90.0, max = 90.0, message = "must be between -90 and 90"))]
    pub latitude: f64,
    /// Longitude in degrees
    #[validate(range(min = -180.0, max = 180.0, message = "must be between -180 and 180"))]
    pub longitude: f64,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// List tracked locations
///
/// GET /v1/locations
#[utoipa::path(
    get,
    path = "/v1/locations",
    tag = "locations",
    responses(
        (status = 200, description = "Tracked locations ordered by name", body = Vec<LocationResponse>),
        (status = 500, description = "Storage failure", body = crate::error::ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn list_locations(
    State(state): State<AppState>,
) -> Result<Json<Vec<LocationResponse>>, ApiError> {
    let locations = state.weather_service.list_locations().await?;

    let response: Vec<LocationResponse> =
        locations.into_iter().map(LocationResponse::from).collect();

    debug!(count = response.len(), "Listed tracked locations");
    Ok(Json(response))
}

/// Register a location, or return it unchanged when already tracked
///
/// POST /v1/locations
///
/// Registration is idempotent: a repeat under any casing of the same name
/// answers 200 with the stored record, and the supplied coordinates are
/// discarded in favor of the original ones.
#[utoipa::path(
    post,
    path = "/v1/locations",
    tag = "locations",
    request_body = RegisterLocationRequest,
    responses(
        (status = 201, description = "Location registered", body = LocationResponse),
        (status = 200, description = "Location was already tracked", body = LocationResponse),
        (status = 400, description = "Invalid name or coordinates", body = crate::error::ErrorResponse),
        (status = 503, description = "Upstream unreachable", body = crate::error::ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn register_location(
    State(state): State<AppState>,
    ValidatedJson(body): ValidatedJson<RegisterLocationRequest>,
) -> Result<(StatusCode, Json<LocationResponse>), ApiError> {
    let coordinates = GeoLocation::new(body.latitude, body.longitude)
        .map_err(|e| ApiError::BadRequest(e.to_string()))?;

    let (location, created) = state
        .weather_service
        .register(&body.name, coordinates)
        .await?;

    let status = if created {
        StatusCode::CREATED
    } else {
        StatusCode::OK
    };

    debug!(id = %location.id, created, "Register request handled");
    Ok((status, Json(LocationResponse::from(location))))
}

/// Stop tracking a location
///
/// DELETE /v1/locations/{name}
#[utoipa::path(
    delete,
    path = "/v1/locations/{name}",
    tag = "locations",
    params(
        ("name" = String, Path, description = "Place name, any casing")
    ),
    responses(
        (status = 204, description = "Location removed"),
        (status = 404, description = "Location not tracked", body = crate::error::ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn remove_location(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<StatusCode, ApiError> {
    state.weather_service.remove_location(&name).await?;

    debug!(name = %name, "Removed location");
    Ok(StatusCode::NO_CONTENT)
}
