//! HTTP handlers for the Task API.
//!
//! Each handler decodes and validates its input, performs one repository
//! operation and translates the outcome into a status code and JSON body.

use std::num::{IntErrorKind, ParseIntError};
use std::sync::Arc;

use axum::{
    Json,
    body::Bytes,
    extract::{Path, State},
    http::StatusCode,
};

use super::dto::{TaskPayload, TaskResponse};
use super::error::ApiErrorResponse;
use crate::domain::{NewTask, TaskId};
use crate::infrastructure::{RepositoryError, TaskRepository};

// =============================================================================
// Application State
// =============================================================================

/// Shared application dependencies.
///
/// The repository is injected at construction so handlers never reach for
/// global state, and tests can substitute any backend.
#[derive(Clone)]
pub struct AppState {
    /// Task repository for persistence.
    pub task_repository: Arc<dyn TaskRepository>,
}

impl AppState {
    /// Creates a new `AppState` around the given repository.
    #[must_use]
    pub fn new(task_repository: Arc<dyn TaskRepository>) -> Self {
        Self { task_repository }
    }
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        formatter
            .debug_struct("AppState")
            .field("task_repository", &"Arc<dyn TaskRepository>")
            .finish()
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Parses the `{id}` path segment as an integer task id.
///
/// An integer too large for the id column cannot name a stored task, so it
/// is reported as not found rather than malformed.
fn parse_task_id(raw: &str) -> Result<TaskId, ApiErrorResponse> {
    raw.parse().map_err(|error: ParseIntError| match error.kind() {
        IntErrorKind::PosOverflow | IntErrorKind::NegOverflow => {
            tracing::debug!(raw, "Task id outside the storable range");
            ApiErrorResponse::task_not_found()
        }
        _ => ApiErrorResponse::invalid_task_id(),
    })
}

/// Decodes and validates a request body.
fn decode_payload(body: &[u8]) -> Result<NewTask, ApiErrorResponse> {
    Ok(TaskPayload::from_json(body)?.validate()?)
}

// =============================================================================
// POST /tasks
// =============================================================================

/// Creates a new task.
///
/// # Request Body
///
/// ```json
/// {
///   "title": "Buy milk",
///   "description": "Optional description",
///   "status": "pending",
///   "due_date": "2023-06-01T10:00"
/// }
/// ```
///
/// # Response
///
/// - **201 Created**: the persisted task, including its generated id
/// - **400 Bad Request**: malformed body or invalid fields
/// - **500 Internal Server Error**: storage failure
///
/// # Errors
///
/// Returns [`ApiErrorResponse`] for any of the failure statuses above.
pub async fn create_task(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<(StatusCode, Json<TaskResponse>), ApiErrorResponse> {
    let new_task = decode_payload(&body)?;

    let task = state
        .task_repository
        .create(new_task)
        .await
        .map_err(|error| match error {
            // The insert succeeded but the row vanished before the read-back.
            RepositoryError::NotFound(task_id) => {
                tracing::error!(%task_id, "Created task disappeared before it could be read back");
                ApiErrorResponse::internal()
            }
            other => ApiErrorResponse::from(other),
        })?;

    tracing::info!(task_id = %task.id, "Created task");
    Ok((StatusCode::CREATED, Json(TaskResponse::from(task))))
}

// =============================================================================
// GET /tasks
// =============================================================================

/// Lists every task.
///
/// # Response
///
/// - **200 OK**: JSON array of tasks, `[]` when there are none
/// - **500 Internal Server Error**: storage failure
///
/// # Errors
///
/// Returns [`ApiErrorResponse`] if the repository fails.
pub async fn list_tasks(
    State(state): State<AppState>,
) -> Result<Json<Vec<TaskResponse>>, ApiErrorResponse> {
    let tasks = state.task_repository.list().await?;
    Ok(Json(tasks.into_iter().map(TaskResponse::from).collect()))
}

// =============================================================================
// GET /tasks/{id}
// =============================================================================

/// Fetches a single task.
///
/// # Response
///
/// - **200 OK**: the task
/// - **400 Bad Request**: non-integer id
/// - **404 Not Found**: no task with that id
///
/// # Errors
///
/// Returns [`ApiErrorResponse`] for any of the failure statuses above or a
/// storage failure.
pub async fn get_task(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
) -> Result<Json<TaskResponse>, ApiErrorResponse> {
    let task_id = parse_task_id(&raw_id)?;
    let task = state.task_repository.find_by_id(task_id).await?;
    Ok(Json(TaskResponse::from(task)))
}

// =============================================================================
// PUT /tasks/{id}
// =============================================================================

/// Replaces every mutable field of a task.
///
/// The id is taken from the path; an `id` in the body is ignored.
///
/// # Response
///
/// - **204 No Content**: task updated
/// - **400 Bad Request**: non-integer id, malformed body or invalid fields
/// - **404 Not Found**: no task with that id
///
/// # Errors
///
/// Returns [`ApiErrorResponse`] for any of the failure statuses above or a
/// storage failure.
pub async fn update_task(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
    body: Bytes,
) -> Result<StatusCode, ApiErrorResponse> {
    let task_id = parse_task_id(&raw_id)?;
    let task = decode_payload(&body)?.with_id(task_id);

    state.task_repository.update(task).await?;

    Ok(StatusCode::NO_CONTENT)
}

// =============================================================================
// DELETE /tasks/{id}
// =============================================================================

/// Deletes a task.
///
/// # Response
///
/// - **204 No Content**: task deleted
/// - **400 Bad Request**: non-integer id
/// - **404 Not Found**: no task with that id
///
/// # Errors
///
/// Returns [`ApiErrorResponse`] for any of the failure statuses above or a
/// storage failure.
pub async fn delete_task(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
) -> Result<StatusCode, ApiErrorResponse> {
    let task_id = parse_task_id(&raw_id)?;
    state.task_repository.delete(task_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// =============================================================================
// GET /health Handler
// =============================================================================

/// Health check response body.
#[derive(Debug, Clone, serde::Serialize)]
pub struct HealthResponse {
    /// Service status.
    pub status: &'static str,
    /// Service version.
    pub version: &'static str,
}

/// Health check endpoint.
///
/// Returns a simple JSON response indicating the service is running. It does
/// not touch the database.
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        version: env!("CARGO_PKG_VERSION"),
    })
}

// =============================================================================
// Tests
// =============================================================================
