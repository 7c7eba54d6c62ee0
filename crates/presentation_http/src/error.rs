//! API error handling
//!
//! Maps application failures onto HTTP status codes and keeps response
//! bodies free of implementation details when detail exposure is off.

use application::{ApplicationError, UpstreamError};
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use std::sync::atomic::{AtomicBool, Ordering};
use thiserror::Error;
use utoipa::ToSchema;

/// Process-wide switch for error detail exposure
///
/// Production deployments turn this off so storage paths and upstream
/// URLs never reach a client.
static EXPOSE_INTERNAL_ERRORS: AtomicBool = AtomicBool::new(true);

/// Turn internal error detail exposure on or off
///
/// Set from the server environment at startup: on for development, off for
/// anything reachable from outside.
pub fn set_expose_internal_errors(expose: bool) {
    EXPOSE_INTERNAL_ERRORS.store(expose, Ordering::SeqCst);
}

fn should_expose_details() -> bool {
    EXPOSE_INTERNAL_ERRORS.load(Ordering::SeqCst)
}

/// Sanitize an error message to remove potentially sensitive information
///
/// Catches file paths, database locations, connection targets, and panic
/// locations before they end up in a response body.
fn sanitize_error_message(msg: &str) -> String {
    if should_expose_details() {
        return msg.to_string();
    }

    let sensitive_patterns = [
        // File paths
        "/home/",
        "/var/",
        "/etc/",
        "\\Users\\",
        "C:\\",
        // Database and panic locations
        "sqlite",
        ".rs:",
        "panicked at",
        // Connection details
        "os error",
        "connection refused",
        "timed out",
    ];

    let msg_lower = msg.to_lowercase();
    for pattern in &sensitive_patterns {
        if msg_lower.contains(&pattern.to_lowercase()) {
            return "An error occurred processing your request".to_string();
        }
    }

    // Anything that looks like a URL still names the upstream host
    if msg.contains("://") {
        return "An error occurred processing your request".to_string();
    }

    msg.to_string()
}

/// API error type
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Upstream request timed out")]
    UpstreamTimeout,

    #[error("Upstream rejected the request: HTTP {status}")]
    UpstreamRejected { status: u16 },

    #[error("Service unavailable: {0}")]
    ServiceUnavailable(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Body returned with every non-2xx response
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    /// Human-readable description of what went wrong
    pub error: String,
    /// Stable machine-readable code
    pub code: String,
    /// Extra context, present only when detail exposure is on
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code, message, details) = match &self {
            Self::BadRequest(msg) => (
                StatusCode::BAD_REQUEST,
                "bad_request",
                sanitize_error_message(msg),
                None,
            ),
            Self::NotFound(msg) => (
                StatusCode::NOT_FOUND,
                "not_found",
                sanitize_error_message(msg),
                None,
            ),
            Self::Conflict(msg) => (
                StatusCode::CONFLICT,
                "conflict",
                sanitize_error_message(msg),
                None,
            ),
            Self::UpstreamTimeout => (
                StatusCode::REQUEST_TIMEOUT,
                "upstream_timeout",
                "Upstream weather provider timed out".to_string(),
                None,
            ),
            Self::UpstreamRejected { status } => (
                // An out-of-range upstream code collapses to 502
                StatusCode::from_u16(*status).unwrap_or(StatusCode::BAD_GATEWAY),
                "upstream_rejected",
                format!("Upstream weather provider rejected the request: HTTP {status}"),
                None,
            ),
            Self::ServiceUnavailable(msg) => {
                // Connection failures tend to name the host they missed
                let sanitized = if should_expose_details() {
                    msg.clone()
                } else {
                    "Upstream weather provider unreachable".to_string()
                };
                (
                    StatusCode::SERVICE_UNAVAILABLE,
                    "service_unavailable",
                    sanitized,
                    None,
                )
            },
            Self::Internal(msg) => {
                // Clients always get the generic line; the real cause rides
                // along in `details` only when exposure is on
                let details = should_expose_details().then(|| msg.clone());
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal_error",
                    "An internal error occurred".to_string(),
                    details,
                )
            },
        };

        let body = Json(ErrorResponse {
            error: message,
            code: code.to_string(),
            details,
        });

        (status, body).into_response()
    }
}

impl From<ApplicationError> for ApiError {
    fn from(err: ApplicationError) -> Self {
        match err {
            ApplicationError::Domain(e) => Self::BadRequest(e.to_string()),
            ApplicationError::NotFound(msg) => Self::NotFound(msg),
            ApplicationError::LocationNotFound(name) => {
                Self::NotFound(format!("Location not found: {name}"))
            },
            ApplicationError::AlreadyExists(msg) => Self::Conflict(msg),
            ApplicationError::Upstream(e) => match e {
                UpstreamError::ConnectionFailure(msg) => Self::ServiceUnavailable(msg),
                UpstreamError::Timeout => Self::UpstreamTimeout,
                UpstreamError::Rejected { status } => Self::UpstreamRejected { status },
                UpstreamError::ServiceFailure(msg) => Self::Internal(msg),
            },
            ApplicationError::Storage(msg) | ApplicationError::Internal(msg) => Self::Internal(msg),
        }
    }
}
