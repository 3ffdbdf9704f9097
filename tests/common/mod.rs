//! Common test helpers for integration tests.
//!
//! Each integration test file is compiled as a separate crate, so helpers
//! used by only some files would otherwise trigger dead code warnings.

#![allow(dead_code)]

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Method, Request, Response, header};
use futures::FutureExt;
use futures::future::BoxFuture;
use http_body_util::BodyExt;
use tower::ServiceExt;

use task_api::api::{AppState, router};
use task_api::domain::{NewTask, Task, TaskId};
use task_api::infrastructure::{InMemoryTaskRepository, RepositoryError, TaskRepository};

// =============================================================================
// Application Helpers
// =============================================================================

/// Builds a router backed by the given in-memory repository.
pub fn create_test_app(repository: &InMemoryTaskRepository) -> Router {
    router(AppState::new(Arc::new(repository.clone())))
}

/// Builds a router whose repository fails every operation.
pub fn create_failing_app() -> Router {
    router(AppState::new(Arc::new(FailingTaskRepository)))
}

/// Repository stub that reports a storage failure for every call.
pub struct FailingTaskRepository;

fn unavailable<T: Send + 'static>() -> BoxFuture<'static, Result<T, RepositoryError>> {
    async { Err(RepositoryError::DatabaseError("connection refused".to_string())) }.boxed()
}

impl TaskRepository for FailingTaskRepository {
    fn create(&self, _task: NewTask) -> BoxFuture<'_, Result<Task, RepositoryError>> {
        unavailable()
    }

    fn list(&self) -> BoxFuture<'_, Result<Vec<Task>, RepositoryError>> {
        unavailable()
    }

    fn find_by_id(&self, _id: TaskId) -> BoxFuture<'_, Result<Task, RepositoryError>> {
        unavailable()
    }

    fn update(&self, _task: Task) -> BoxFuture<'_, Result<(), RepositoryError>> {
        unavailable()
    }

    fn delete(&self, _id: TaskId) -> BoxFuture<'_, Result<(), RepositoryError>> {
        unavailable()
    }
}

// =============================================================================
// Request Helpers
// =============================================================================

/// Sends a request with an optional raw JSON body through the router.
pub async fn send(app: Router, method: Method, uri: &str, body: Option<&str>) -> Response<Body> {
    send_with_content_type(app, method, uri, body, "application/json").await
}

/// Sends a request whose body, if any, is labelled with `content_type`.
pub async fn send_with_content_type(
    app: Router,
    method: Method,
    uri: &str,
    body: Option<&str>,
    content_type: &str,
) -> Response<Body> {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, content_type)
            .body(Body::from(body.to_string())),
        None => builder.body(Body::empty()),
    }
    .expect("Failed to build request");

    app.oneshot(request).await.expect("Router is infallible")
}

/// Creates a task through the router and returns its JSON representation.
pub async fn create_via_api(app: Router, title: &str) -> serde_json::Value {
    let response = send(app, Method::POST, "/tasks", Some(&task_body(title))).await;
    assert_eq!(response.status(), axum::http::StatusCode::CREATED);
    body_json(response).await
}

/// Collects a response body into bytes.
pub async fn body_bytes(response: Response<Body>) -> Vec<u8> {
    response
        .into_body()
        .collect()
        .await
        .expect("Failed to collect body")
        .to_bytes()
        .to_vec()
}

/// Collects a response body and parses it as JSON.
pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    serde_json::from_slice(&body_bytes(response).await).expect("Body should be JSON")
}

/// A valid creation body with the given title.
pub fn task_body(title: &str) -> String {
    serde_json::json!({
        "title": title,
        "description": "",
        "status": "pending",
        "due_date": "2023-06-01T10:00"
    })
    .to_string()
}
