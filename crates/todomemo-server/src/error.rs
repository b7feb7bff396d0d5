//! API error handling.
//!
//! Maps `TodoError` and body rejections onto HTTP status codes and a JSON body:
//!
//! ```json
//! { "code": "VALIDATION_ERROR", "errorMessage": "...", "details": [...] }
//! ```

use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use todomemo_core::{TodoError, ValidationError};

// =============================================================================
// API Error
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiError {
    /// Error code for programmatic handling.
    pub code: String,
    /// Human-readable error message.
    pub error_message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Vec<FieldError>>,
}

impl ApiError {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            error_message: message.into(),
            details: None,
        }
    }

    pub fn validation(message: impl Into<String>, details: Vec<FieldError>) -> Self {
        Self {
            code: "VALIDATION_ERROR".to_string(),
            error_message: message.into(),
            details: Some(details),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl From<ValidationError> for FieldError {
    fn from(error: ValidationError) -> Self {
        Self {
            field: error.field,
            message: error.message,
        }
    }
}

// =============================================================================
// API Error Response
// =============================================================================

#[derive(Debug, Clone)]
pub struct ApiErrorResponse {
    pub status: StatusCode,
    pub error: ApiError,
}

impl ApiErrorResponse {
    pub const fn new(status: StatusCode, error: ApiError) -> Self {
        Self { status, error }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(
            StatusCode::BAD_REQUEST,
            ApiError::validation(message, Vec::new()),
        )
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, ApiError::new("NOT_FOUND", message))
    }

    pub fn internal_error(message: impl Into<String>) -> Self {
        Self::new(
            StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::new("INTERNAL_ERROR", message),
        )
    }
}

impl IntoResponse for ApiErrorResponse {
    fn into_response(self) -> Response {
        (self.status, Json(self.error)).into_response()
    }
}

impl From<ValidationError> for ApiErrorResponse {
    fn from(error: ValidationError) -> Self {
        Self::new(
            StatusCode::BAD_REQUEST,
            ApiError::validation(error.to_string(), vec![error.into()]),
        )
    }
}

impl From<TodoError> for ApiErrorResponse {
    fn from(error: TodoError) -> Self {
        match error {
            TodoError::Validation(error) => error.into(),
            TodoError::NotFound(id) => Self::not_found(format!("todo {id} does not exist")),
            // Store details stay in the log.
            TodoError::Store(error) => {
                tracing::error!(%error, "store failure");
                Self::internal_error("An internal error occurred")
            }
        }
    }
}

/// Malformed JSON, wrong types, missing fields, or a missing content type.
impl From<JsonRejection> for ApiErrorResponse {
    fn from(rejection: JsonRejection) -> Self {
        Self::bad_request(rejection.body_text())
    }
}
