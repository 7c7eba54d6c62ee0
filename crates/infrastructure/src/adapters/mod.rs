//! Infrastructure adapters
//!
//! Adapters connect application ports to concrete implementations.

mod open_meteo_provider;

pub use open_meteo_provider::OpenMeteoProvider;
