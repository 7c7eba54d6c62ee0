//! Port definitions for application layer
//!
//! Ports are interfaces that define how the application interacts with
//! external systems. Adapters in the infrastructure layer implement these ports.

mod location_store;
mod observation_store;
mod weather_provider;

pub use location_store::LocationStore;
#[cfg(test)]
pub use location_store::MockLocationStore;
#[cfg(test)]
pub use observation_store::MockObservationStore;
pub use observation_store::ObservationStore;
#[cfg(test)]
pub use weather_provider::MockWeatherProviderPort;
pub use weather_provider::WeatherProviderPort;
