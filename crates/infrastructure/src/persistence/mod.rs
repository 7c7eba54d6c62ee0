//! Persistence module
//!
//! SQLite-based storage for registered locations and cached observations.

pub mod connection;
pub mod location_store;
pub mod migrations;
pub mod observation_store;

pub use connection::{ConnectionPool, DatabaseError, create_pool};
pub use location_store::SqliteLocationStore;
pub use observation_store::SqliteObservationStore;
