//! JSON body validation
//!
//! `ValidatedJson` runs the `validator` rules declared on a request type and
//! turns failures into 400 responses shaped like every other API error.

use axum::{
    Json,
    extract::{FromRequest, Request, rejection::JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::de::DeserializeOwned;
use thiserror::Error;
use validator::Validate;

use crate::error::ErrorResponse;

/// Validation failure raised by [`ValidatedJson`]
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("Invalid JSON: {0}")]
    Json(#[from] JsonRejection),
    #[error("Validation failed: {0}")]
    Invalid(String),
}

impl IntoResponse for ValidationError {
    fn into_response(self) -> Response {
        let message = match &self {
            Self::Json(e) => e.to_string(),
            Self::Invalid(msg) => msg.clone(),
        };

        let body = Json(ErrorResponse {
            error: message,
            code: "validation_error".to_string(),
            details: None,
        });

        (StatusCode::BAD_REQUEST, body).into_response()
    }
}

/// `Json<T>` that additionally enforces the `validator` rules on `T`
///
/// Handlers take this in place of `Json<T>` and only ever see bodies that
/// passed every declared rule.
///
/// # Example
///
/// ```ignore
/// use validator::Validate;
/// use serde::Deserialize;
///
/// #[derive(Deserialize, Validate)]
/// struct RegisterRequest {
///     #[validate(length(min = 1, max = 120))]
///     name: String,
///     #[validate(range(min = -90.0, max = 90.0))]
///     latitude: f64,
/// }
///
/// async fn handler(ValidatedJson(req): ValidatedJson<RegisterRequest>) {
///     // req passed every rule
/// }
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct ValidatedJson<T>(pub T);

impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = ValidationError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state).await?;

        value.validate().map_err(|e| {
            let mut problems: Vec<String> = e
                .field_errors()
                .into_iter()
                .flat_map(|(field, errs)| {
                    errs.iter().map(move |err| match &err.message {
                        Some(message) => format!("{field}: {message}"),
                        None => format!("{field}: {}", err.code),
                    })
                })
                .collect();
            // field_errors is a HashMap; order the output so the same bad
            // request always produces the same message
            problems.sort();

            ValidationError::Invalid(problems.join("; "))
        })?;

        Ok(Self(value))
    }
}
