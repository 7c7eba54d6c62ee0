//! Open-Meteo weather integration
//!
//! Clients for the Open-Meteo Forecast and Geocoding APIs
//! (<https://open-meteo.com>). Provides hourly forecast retrieval and
//! place-name resolution without requiring an API key.

pub mod client;
pub mod geocoding;
mod models;

pub use client::{ForecastClient, HOURLY_SERIES, OpenMeteoClient, OpenMeteoConfig, WeatherError};
pub use geocoding::{GeocodingClient, OpenMeteoGeocoder};
pub use models::{ForecastResponse, GeocodingMatch, GeocodingResponse};
