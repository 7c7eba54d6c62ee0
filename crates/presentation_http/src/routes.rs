//! Route definitions

use axum::{
    Router,
    routing::{delete, get},
};

use crate::{handlers, openapi, state::AppState};

/// Create the main router with all routes
pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Health and status endpoints
        .route("/health", get(handlers::health::health_check))
        .route("/ready", get(handlers::health::readiness_check))
        // Location API (v1)
        .route(
            "/v1/locations",
            get(handlers::locations::list_locations).post(handlers::locations::register_location),
        )
        .route("/v1/locations/{name}", delete(handlers::locations::remove_location))
        // Weather API (v1)
        .route("/v1/weather", get(handlers::weather::get_weather))
        .route("/v1/weather/current", get(handlers::weather::current_weather))
        // API documentation
        .merge(openapi::create_openapi_routes())
        // Attach state
        .with_state(state)
}
