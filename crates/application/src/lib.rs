//! Application layer - Use cases and orchestration
//!
//! Contains the weather resolution and refresh services plus the port
//! definitions they depend on. Orchestrates domain objects and
//! infrastructure adapters.

pub mod error;
pub mod ports;
pub mod services;

pub use error::{ApplicationError, UpstreamError};
pub use ports::*;
pub use services::*;
