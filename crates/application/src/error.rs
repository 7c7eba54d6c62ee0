//! Application-level errors

use domain::DomainError;
use thiserror::Error;

/// Failures reported by the upstream weather provider
///
/// Connection failures and timeouts are transient and worth retrying; every
/// other kind is settled and surfaces immediately.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum UpstreamError {
    /// Could not reach the upstream service
    #[error("Upstream connection failed: {0}")]
    ConnectionFailure(String),

    /// The upstream service did not answer in time
    #[error("Upstream request timed out")]
    Timeout,

    /// The upstream service answered with a non-success status
    #[error("Upstream rejected the request: HTTP {status}")]
    Rejected {
        /// HTTP status code returned by the upstream service
        status: u16,
    },

    /// The upstream response was unusable
    #[error("Upstream service failure: {0}")]
    ServiceFailure(String),
}

impl UpstreamError {
    /// Whether the failure is transient and a retry may succeed
    #[must_use]
    pub const fn is_transient(&self) -> bool {
        matches!(self, Self::ConnectionFailure(_) | Self::Timeout)
    }
}

/// Errors that can occur in the application layer
#[derive(Debug, Error)]
pub enum ApplicationError {
    /// Domain-level error
    #[error(transparent)]
    Domain(#[from] DomainError),

    /// Upstream weather provider failure
    #[error(transparent)]
    Upstream(#[from] UpstreamError),

    /// A stored entity was not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Geocoding produced no candidate for the place name
    #[error("Location not found: {0}")]
    LocationNotFound(String),

    /// An entity with the same identity already exists
    #[error("Already exists: {0}")]
    AlreadyExists(String),

    /// Persistent storage failure
    #[error("Storage error: {0}")]
    Storage(String),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}
