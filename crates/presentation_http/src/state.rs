//! Application state shared across handlers

use std::sync::Arc;

use application::WeatherService;

/// Shared application state
#[derive(Debug, Clone)]
pub struct AppState {
    /// Weather resolution service
    pub weather_service: Arc<WeatherService>,
}
