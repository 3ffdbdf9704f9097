//! Repository trait for the task entity.
//!
//! Every operation returns a boxed future so the trait stays object safe and
//! the HTTP layer can hold any backend behind `Arc<dyn TaskRepository>`.

use futures::future::BoxFuture;
use thiserror::Error;

use crate::domain::{NewTask, Task, TaskId};

// =============================================================================
// Repository Error
// =============================================================================

/// Errors that can occur during repository operations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RepositoryError {
    /// No row matched the given id.
    #[error("Task not found: {0}")]
    NotFound(TaskId),

    /// Connection or query failure reported by the store.
    #[error("Database error: {0}")]
    DatabaseError(String),
}

impl From<sqlx::Error> for RepositoryError {
    fn from(error: sqlx::Error) -> Self {
        Self::DatabaseError(error.to_string())
    }
}

// =============================================================================
// Task Repository
// =============================================================================

/// Persistence operations for tasks.
///
/// Each call is a single independent round trip to the store (two for
/// `create`). No call is retried.
pub trait TaskRepository: Send + Sync {
    /// Inserts a task and returns the persisted record, including its
    /// store-assigned id.
    ///
    /// The record is read back after the insert. The two statements are not
    /// wrapped in a transaction, so a concurrent delete between them surfaces
    /// as [`RepositoryError::NotFound`].
    fn create(&self, task: NewTask) -> BoxFuture<'_, Result<Task, RepositoryError>>;

    /// Returns every task in the store's natural order.
    ///
    /// An empty store yields an empty vector.
    fn list(&self) -> BoxFuture<'_, Result<Vec<Task>, RepositoryError>>;

    /// Finds a task by its id.
    ///
    /// Returns [`RepositoryError::NotFound`] when no row matches.
    fn find_by_id(&self, id: TaskId) -> BoxFuture<'_, Result<Task, RepositoryError>>;

    /// Replaces every mutable field of the task with `task.id`.
    ///
    /// Returns [`RepositoryError::NotFound`] when no row was affected.
    fn update(&self, task: Task) -> BoxFuture<'_, Result<(), RepositoryError>>;

    /// Deletes the task with the given id.
    ///
    /// Returns [`RepositoryError::NotFound`] when no row was affected.
    fn delete(&self, id: TaskId) -> BoxFuture<'_, Result<(), RepositoryError>>;
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn test_repository_error_display() {
        let error = RepositoryError::NotFound(TaskId::new(123));
        assert_eq!(format!("{error}"), "Task not found: 123");

        let error = RepositoryError::DatabaseError("connection refused".to_string());
        assert_eq!(format!("{error}"), "Database error: connection refused");
    }

    #[rstest]
    fn test_repository_error_from_sqlx_error() {
        let error = RepositoryError::from(sqlx::Error::PoolTimedOut);
        assert!(matches!(error, RepositoryError::DatabaseError(_)));
    }
}
