//! API error handling.
//!
//! Every failure leaves the service as a JSON body of the form
//! `{"code": ..., "message": ..., "details"?: [...]}`. The HTTP status is
//! derived from the [`ErrorCode`], so the two can never disagree.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;

use crate::infrastructure::RepositoryError;

// =============================================================================
// Error Codes
// =============================================================================

/// Machine-readable error code carried in every error body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// One or more fields failed validation.
    ValidationError,
    /// The request body is not a decodable task object.
    InvalidJson,
    /// The `{id}` path segment is not an integer.
    InvalidTaskId,
    /// No task has the requested id.
    NotFound,
    /// The store failed; details are logged, never returned.
    InternalError,
}

impl ErrorCode {
    /// HTTP status answered for this code.
    #[must_use]
    pub const fn status(self) -> StatusCode {
        match self {
            Self::ValidationError | Self::InvalidJson | Self::InvalidTaskId => {
                StatusCode::BAD_REQUEST
            }
            Self::NotFound => StatusCode::NOT_FOUND,
            Self::InternalError => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

// =============================================================================
// Error Body
// =============================================================================

/// Field-level error for validation failures.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    /// Name of the offending request field.
    pub field: String,
    /// What is wrong with it.
    pub message: String,
}

impl FieldError {
    /// Creates a new field error.
    #[must_use]
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// JSON error body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ApiError {
    pub code: ErrorCode,
    pub message: String,
    /// Present only for [`ErrorCode::ValidationError`].
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Vec<FieldError>>,
}

// =============================================================================
// API Error Response
// =============================================================================

/// An error body paired with the status it is sent with.
#[derive(Debug, Clone)]
pub struct ApiErrorResponse {
    pub status: StatusCode,
    pub error: ApiError,
}

impl ApiErrorResponse {
    fn with_code(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            status: code.status(),
            error: ApiError {
                code,
                message: message.into(),
                details: None,
            },
        }
    }

    /// 400 for a body that does not decode into a task object.
    #[must_use]
    pub fn invalid_json(message: impl Into<String>) -> Self {
        Self::with_code(ErrorCode::InvalidJson, message)
    }

    /// 400 for a non-integer `{id}` path segment.
    #[must_use]
    pub fn invalid_task_id() -> Self {
        Self::with_code(ErrorCode::InvalidTaskId, "Invalid task ID")
    }

    /// 400 listing every field that failed validation.
    #[must_use]
    pub fn validation(details: Vec<FieldError>) -> Self {
        let mut response = Self::with_code(ErrorCode::ValidationError, "Validation failed");
        response.error.details = Some(details);
        response
    }

    /// 404 for a task id with no row behind it.
    #[must_use]
    pub fn task_not_found() -> Self {
        Self::with_code(ErrorCode::NotFound, "Task not found")
    }

    /// 500 with a generic message.
    #[must_use]
    pub fn internal() -> Self {
        Self::with_code(ErrorCode::InternalError, "An internal error occurred")
    }
}

impl IntoResponse for ApiErrorResponse {
    fn into_response(self) -> Response {
        (self.status, Json(self.error)).into_response()
    }
}

impl From<RepositoryError> for ApiErrorResponse {
    fn from(error: RepositoryError) -> Self {
        match error {
            RepositoryError::NotFound(_) => Self::task_not_found(),
            RepositoryError::DatabaseError(_) => {
                tracing::error!(%error, "Repository operation failed");
                Self::internal()
            }
        }
    }
}

impl From<serde_json::Error> for ApiErrorResponse {
    fn from(error: serde_json::Error) -> Self {
        tracing::debug!(%error, "Rejected request body");
        Self::invalid_json(format!("Invalid request body: {error}"))
    }
}

// =============================================================================
// Validation Error
// =============================================================================

/// Every field error found in one request body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    pub errors: Vec<FieldError>,
}

impl ValidationError {
    /// Creates a new validation error.
    #[must_use]
    pub const fn new(errors: Vec<FieldError>) -> Self {
        Self { errors }
    }
}

impl From<ValidationError> for ApiErrorResponse {
    fn from(error: ValidationError) -> Self {
        Self::validation(error.errors)
    }
}

// =============================================================================
// Tests
// =============================================================================
