//! OpenAPI documentation module
//!
//! Generates the OpenAPI document for the Stratus HTTP API and serves it
//! together with a Redoc viewer.

// Allow clippy warnings from macro-generated code in utoipa derive
#![allow(clippy::needless_for_each)]

use axum::{Json, Router, response::Html, routing::get};
use utoipa::OpenApi;
use utoipa_redoc::{Redoc, Servable as RedocServable};

use crate::{handlers, state::AppState};

/// OpenAPI documentation for the Stratus weather API
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Stratus Weather API",
        version = "0.1.0",
        description = "Freshness-bounded cache of hourly weather observations over the Open-Meteo API",
        license(name = "MIT", url = "https://opensource.org/licenses/MIT")
    ),
    servers(
        (url = "/", description = "Local server")
    ),
    tags(
        (name = "health", description = "Liveness and readiness probes"),
        (name = "locations", description = "Tracked location management"),
        (name = "weather", description = "Weather resolution and current conditions")
    ),
    paths(
        handlers::health::health_check,
        handlers::health::readiness_check,
        handlers::locations::list_locations,
        handlers::locations::register_location,
        handlers::locations::remove_location,
        handlers::weather::get_weather,
        handlers::weather::current_weather,
    ),
    components(schemas(
        handlers::health::HealthResponse,
        handlers::health::ReadinessResponse,
        handlers::health::StorageStatus,
        handlers::locations::LocationResponse,
        handlers::locations::RegisterLocationRequest,
        handlers::weather::WeatherResponse,
        crate::error::ErrorResponse,
    ))
)]
pub struct ApiDoc;

/// Routes serving the OpenAPI document and the Redoc viewer
pub fn create_openapi_routes() -> Router<AppState> {
    let redoc = Redoc::with_url("/api-docs/openapi.json", ApiDoc::openapi());

    Router::new()
        // Raw OpenAPI document
        .route("/api-docs/openapi.json", get(|| async { Json(ApiDoc::openapi()) }))
        // ReDoc documentation
        .route("/redoc", get(|| async move { Html(redoc.to_html()) }))
}
