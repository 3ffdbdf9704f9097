//! Router construction.
//!
//! Route table:
//!
//! | Method | Path          | Handler         |
//! |--------|---------------|-----------------|
//! | GET    | `/health`     | `health_check`  |
//! | GET    | `/tasks`      | `list_tasks`    |
//! | POST   | `/tasks`      | `create_task`   |
//! | GET    | `/tasks/{id}` | `get_task`      |
//! | PUT    | `/tasks/{id}` | `update_task`   |
//! | DELETE | `/tasks/{id}` | `delete_task`   |

use axum::{
    Router,
    http::{HeaderName, Method, header},
    routing::get,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use super::handlers::{
    AppState, create_task, delete_task, get_task, health_check, list_tasks, update_task,
};

/// Builds the application router with tracing and CORS applied.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/tasks", get(list_tasks).post(create_task))
        .route(
            "/tasks/{id}",
            get(get_task).put(update_task).delete(delete_task),
        )
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer())
        .with_state(state)
}

/// CORS policy: any origin, a fixed set of request headers and methods.
#[must_use]
pub fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_headers([
            HeaderName::from_static("x-requested-with"),
            header::CONTENT_TYPE,
            header::AUTHORIZATION,
        ])
        .allow_methods([
            Method::GET,
            Method::HEAD,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
}
