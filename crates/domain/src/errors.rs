//! Domain-level errors

use thiserror::Error;

/// Errors that can occur in the domain layer
#[derive(Debug, Error)]
pub enum DomainError {
    /// Location name is empty or otherwise unusable as a canonical key
    #[error("Invalid location name: {0}")]
    InvalidLocationName(String),

    /// Metric name is not one of the filterable weather metrics
    #[error("Unknown weather metric: {0}")]
    UnknownMetric(String),
}
