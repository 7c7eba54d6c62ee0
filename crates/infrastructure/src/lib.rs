//! Infrastructure layer - Adapters for external systems
//!
//! Implements ports defined in the application layer: the Open-Meteo weather
//! provider with retry, and SQLite persistence for locations and observations.

pub mod adapters;
pub mod config;
pub mod persistence;
pub mod retry;

pub use adapters::*;
pub use config::{
    AppConfig, DatabaseConfig, RefreshAppConfig, RetryAppConfig, ServerConfig, UpstreamConfig,
};
pub use persistence::{
    ConnectionPool, DatabaseError, SqliteLocationStore, SqliteObservationStore, create_pool,
};
pub use retry::{RetryConfig, RetryResult, Retryable, retry, with_retry};
