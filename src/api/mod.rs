//! HTTP surface of the Task API.
//!
//! - `dto`: request and response bodies
//! - `error`: error responses
//! - `handlers`: one handler per route
//! - `routes`: router and middleware

pub mod dto;
pub mod error;
pub mod handlers;
pub mod routes;

pub use dto::{TaskPayload, TaskResponse};
pub use error::{ApiError, ApiErrorResponse, ErrorCode, FieldError, ValidationError};
pub use handlers::{
    AppState, HealthResponse, create_task, delete_task, get_task, health_check, list_tasks,
    update_task,
};
pub use routes::{cors_layer, router};
