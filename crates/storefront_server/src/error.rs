//! Mapping of failures onto the response envelope.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::Value;
use storefront_core::Envelope;
use storefront_error::{StorefrontError, StorefrontErrorKind, ValidationError};

/// Message returned for every failure that is not the caller's fault.
pub const UNEXPECTED_MESSAGE: &str = "An unexpected error occurred.";

/// Failure of an API request.
///
/// Each variant renders as an [`Envelope`] with `success: false`. Unexpected
/// errors are logged in full and replaced by a fixed message on the wire.
#[derive(Debug, derive_more::Display)]
pub enum ApiError {
    /// Request failed field rules (422)
    #[display("{}", _0)]
    Validation(ValidationError),
    /// Addressed resource does not exist (404)
    #[display("{} not found.", _0)]
    NotFound(&'static str),
    /// Request conflicts with current state (409)
    #[display("{}", _0)]
    Conflict(String),
    /// Request rejected before reaching a handler, e.g. body too large
    #[display("{}", _1)]
    Rejected(StatusCode, String),
    /// Anything else (500)
    #[display("{}", _0)]
    Unexpected(StorefrontError),
}

impl ApiError {
    /// Status code the error renders with.
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::Rejected(status, _) => *status,
            ApiError::Unexpected(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<StorefrontError> for ApiError {
    fn from(err: StorefrontError) -> Self {
        match err.into_kind() {
            StorefrontErrorKind::Validation(validation) => ApiError::Validation(validation),
            other => ApiError::Unexpected(StorefrontError::new(other)),
        }
    }
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        ApiError::Validation(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let envelope: Envelope<Value> = match self {
            ApiError::Validation(err) => {
                let message = err
                    .first_message()
                    .unwrap_or("The given data was invalid.")
                    .to_string();
                Envelope::invalid(message, err.errors().clone())
            }
            ApiError::NotFound(resource) => Envelope::failure(format!("{} not found.", resource)),
            ApiError::Conflict(message) | ApiError::Rejected(_, message) => {
                Envelope::failure(message)
            }
            ApiError::Unexpected(err) => {
                tracing::error!(error = %err, "Request failed");
                Envelope::failure(UNEXPECTED_MESSAGE)
            }
        };
        (status, Json(envelope)).into_response()
    }
}

/// Result type for handlers and the service.
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;
    use storefront_error::{DatabaseError, DatabaseErrorKind};

    #[test]
    fn validation_kind_is_unwrapped() {
        let err: StorefrontError = ValidationError::field("name", "The name field is required.").into();
        let api: ApiError = err.into();
        assert_eq!(api.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[test]
    fn store_failures_are_unexpected() {
        let err: StorefrontError =
            DatabaseError::new(DatabaseErrorKind::Query("syntax error".to_string())).into();
        let api: ApiError = err.into();
        assert_eq!(api.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn not_found_names_the_resource() {
        assert_eq!(ApiError::NotFound("Product").to_string(), "Product not found.");
    }
}
