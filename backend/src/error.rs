//! Error types for the Cadastros backend.
//!
//! - [`StoreError`] - Record store failures
//! - [`ApiError`] - Request-level errors, rendered by the error responder
//! - [`ServerError`] - Startup and shutdown errors
//!
//! [`ApiError`] implements [`IntoResponse`]: typed client errors become their
//! status code with a `{message, details?}` body, everything else is logged
//! and answered with a generic 500.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde::Serialize;
use serde_json::{json, Value};
use thiserror::Error;

/// Body of every 500 response.
pub const INTERNAL_ERROR_MESSAGE: &str = "Internal server error";

/// Body of every unmatched-route response.
pub const NOT_FOUND_MESSAGE: &str = "Resource not found";

// =============================================================================
// Store Errors
// =============================================================================

/// Errors from a [`RecordStore`](crate::store::RecordStore).
#[derive(Debug, Error)]
pub enum StoreError {
    /// Driver or connection error.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// A returned row could not be turned into a record.
    #[error("Malformed row returned by the store: {0}")]
    Decode(String),

    /// A statement did not get the parameters its shape requires.
    #[error("Invalid statement parameters: {0}")]
    InvalidParams(String),
}

// =============================================================================
// API Errors
// =============================================================================

/// Errors returned by services and controllers.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Client-correctable request problem.
    #[error("{message}")]
    BadRequest { message: String, details: Option<Value> },

    /// Target record or route does not exist.
    #[error("{message}")]
    NotFound { message: String },

    /// Store failure.
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    /// Anything else that went wrong on the server.
    #[error("Internal error: {0}")]
    Internal(String),
}

/// JSON body of an error response.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Value>,
}

impl ApiError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        ApiError::BadRequest {
            message: message.into(),
            details: None,
        }
    }

    /// Bad request naming the required fields that were absent or empty.
    pub fn missing_fields(fields: &[&str]) -> Self {
        ApiError::BadRequest {
            message: format!("Missing required fields: {}", fields.join(", ")),
            details: Some(json!({ "missing": fields })),
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        ApiError::NotFound {
            message: message.into(),
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::BadRequest { .. } => StatusCode::BAD_REQUEST,
            ApiError::NotFound { .. } => StatusCode::NOT_FOUND,
            ApiError::Store(_) | ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// User-safe body. Internal details never leave the server.
    pub fn body(&self) -> ErrorBody {
        match self {
            ApiError::BadRequest { message, details } => ErrorBody {
                message: message.clone(),
                details: details.clone(),
            },
            ApiError::NotFound { message } => ErrorBody {
                message: message.clone(),
                details: None,
            },
            ApiError::Store(_) | ApiError::Internal(_) => ErrorBody {
                message: INTERNAL_ERROR_MESSAGE.to_string(),
                details: None,
            },
        }
    }
}

/// Answer for a handler that panicked, installed through tower-http's
/// `CatchPanicLayer`.
pub fn panic_response(panic: Box<dyn std::any::Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = panic.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "unknown panic".to_string()
    };

    ApiError::Internal(detail).into_response()
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match &self {
            ApiError::Store(_) | ApiError::Internal(_) => {
                tracing::error!("Unexpected server error: {}", self);
            }
            ApiError::BadRequest { .. } | ApiError::NotFound { .. } => {
                tracing::debug!("Client error: {}", self);
            }
        }

        (self.status_code(), Json(self.body())).into_response()
    }
}

// =============================================================================
// Server Errors
// =============================================================================

/// Errors while starting or running the HTTP server.
#[derive(Debug, Error)]
pub enum ServerError {
    /// The store could not be reached or configured.
    #[error("Record store error: {0}")]
    Store(#[from] StoreError),

    /// Binding or serving failed.
    #[error("Server IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid configuration.
    #[error("Invalid configuration: {0}")]
    Config(String),
}

// =============================================================================
// Result Type Aliases
// =============================================================================

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Result type for service and controller operations.
pub type ApiResult<T> = Result<T, ApiError>;

/// Result type for server lifecycle operations.
pub type ServerResult<T> = Result<T, ServerError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_fields_message_and_details() {
        let err = ApiError::missing_fields(&["name", "email"]);
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);

        let body = serde_json::to_value(err.body()).unwrap();
        assert_eq!(body["message"], "Missing required fields: name, email");
        assert_eq!(body["details"]["missing"], json!(["name", "email"]));
    }

    #[test]
    fn test_not_found_has_no_details() {
        let err = ApiError::not_found("teams record with id 9 not found.");
        let body = serde_json::to_value(err.body()).unwrap();

        assert_eq!(err.status_code(), StatusCode::NOT_FOUND);
        assert_eq!(body, json!({ "message": "teams record with id 9 not found." }));
    }

    #[test]
    fn test_internal_errors_do_not_leak() {
        let err: ApiError = StoreError::Decode("column \"secret\" missing".into()).into();
        let body = serde_json::to_value(err.body()).unwrap();

        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body, json!({ "message": INTERNAL_ERROR_MESSAGE }));
    }

    #[test]
    fn test_error_conversion_chain() {
        let store_err = StoreError::InvalidParams("expected id".into());
        let server_err: ServerError = store_err.into();
        assert!(server_err.to_string().contains("expected id"));
    }
}
