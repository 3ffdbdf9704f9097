//! `PostgreSQL` repository implementation.
//!
//! This module provides the `PostgreSQL`-backed [`TaskRepository`] using
//! `sqlx` for parameterized queries over a shared connection pool.
//!
//! # Table Schema
//!
//! The schema is managed outside this service. `due_date` may be either
//! `TIMESTAMPTZ` or `TIMESTAMP`; a `TIMESTAMP` column holds UTC wall-clock
//! values.
//!
//! ```sql
//! CREATE TABLE tasks (
//!     id SERIAL PRIMARY KEY,
//!     title TEXT NOT NULL,
//!     description TEXT NOT NULL DEFAULT '',
//!     status TEXT NOT NULL,
//!     due_date TIMESTAMPTZ NOT NULL
//! );
//! ```

use chrono::{DateTime, Utc};
use futures::FutureExt;
use futures::future::BoxFuture;
use sqlx::PgPool;

use crate::domain::{DueDate, NewTask, Task, TaskId};
use crate::infrastructure::{RepositoryError, TaskRepository};

// =============================================================================
// Row Mapping
// =============================================================================

/// Raw column tuple as selected from `tasks`.
type TaskRow = (i32, String, Option<String>, String, DateTime<Utc>);

// The cast lets a plain `TIMESTAMP` column decode as `DateTime<Utc>`.
// sqlx sessions run with `TimeZone = UTC`, so such values read back as UTC.
const SELECT_TASK_BY_ID: &str = "SELECT id, title, description, status, \
     due_date::timestamptz FROM tasks WHERE id = $1";

const SELECT_ALL_TASKS: &str =
    "SELECT id, title, description, status, due_date::timestamptz FROM tasks";

const INSERT_TASK: &str = "INSERT INTO tasks (title, description, status, due_date) \
     VALUES ($1, $2, $3, $4) RETURNING id";

const UPDATE_TASK: &str = "UPDATE tasks SET title = $1, description = $2, status = $3, \
     due_date = $4 WHERE id = $5";

const DELETE_TASK: &str = "DELETE FROM tasks WHERE id = $1";

/// Converts a selected row into a [`Task`]. A NULL description reads as empty.
fn task_from_row((id, title, description, status, due_date): TaskRow) -> Task {
    Task {
        id: TaskId::new(id),
        title,
        description: description.unwrap_or_default(),
        status,
        due_date: DueDate::from_datetime(due_date),
    }
}

// =============================================================================
// PostgreSQL Task Repository
// =============================================================================

/// `PostgreSQL` implementation of `TaskRepository`.
///
/// The pool owns connection reuse and thread safety; the repository adds no
/// locking of its own.
#[derive(Debug, Clone)]
pub struct PostgresTaskRepository {
    pool: PgPool,
}

impl PostgresTaskRepository {
    /// Creates a new `PostgreSQL` task repository with the given connection pool.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

impl TaskRepository for PostgresTaskRepository {
    fn create(&self, task: NewTask) -> BoxFuture<'_, Result<Task, RepositoryError>> {
        async move {
            let (id,): (i32,) = sqlx::query_as(INSERT_TASK)
                .bind(&task.title)
                .bind(&task.description)
                .bind(&task.status)
                .bind(*task.due_date.as_datetime())
                .fetch_one(&self.pool)
                .await?;

            let task_id = TaskId::new(id);
            tracing::debug!(%task_id, "Inserted task");

            self.find_by_id(task_id).await
        }
        .boxed()
    }

    fn list(&self) -> BoxFuture<'_, Result<Vec<Task>, RepositoryError>> {
        async move {
            let rows: Vec<TaskRow> = sqlx::query_as(SELECT_ALL_TASKS)
                .fetch_all(&self.pool)
                .await?;

            Ok(rows.into_iter().map(task_from_row).collect())
        }
        .boxed()
    }

    fn find_by_id(&self, id: TaskId) -> BoxFuture<'_, Result<Task, RepositoryError>> {
        async move {
            let row: Option<TaskRow> = sqlx::query_as(SELECT_TASK_BY_ID)
                .bind(id.value())
                .fetch_optional(&self.pool)
                .await?;

            row.map(task_from_row).ok_or(RepositoryError::NotFound(id))
        }
        .boxed()
    }

    fn update(&self, task: Task) -> BoxFuture<'_, Result<(), RepositoryError>> {
        async move {
            let result = sqlx::query(UPDATE_TASK)
                .bind(&task.title)
                .bind(&task.description)
                .bind(&task.status)
                .bind(*task.due_date.as_datetime())
                .bind(task.id.value())
                .execute(&self.pool)
                .await?;

            let rows_affected = result.rows_affected();
            if rows_affected == 0 {
                return Err(RepositoryError::NotFound(task.id));
            }

            tracing::info!(task_id = %task.id, rows_affected, "Updated task");
            Ok(())
        }
        .boxed()
    }

    fn delete(&self, id: TaskId) -> BoxFuture<'_, Result<(), RepositoryError>> {
        async move {
            let result = sqlx::query(DELETE_TASK)
                .bind(id.value())
                .execute(&self.pool)
                .await?;

            let rows_affected = result.rows_affected();
            if rows_affected == 0 {
                return Err(RepositoryError::NotFound(id));
            }

            tracing::info!(task_id = %id, rows_affected, "Deleted task");
            Ok(())
        }
        .boxed()
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::{DatabaseConfig, connect_pool};
    use chrono::TimeZone;
    use rstest::rstest;

    fn test_new_task(title: &str) -> NewTask {
        NewTask {
            title: title.to_string(),
            description: "Test Description".to_string(),
            status: "pending".to_string(),
            due_date: DueDate::from_datetime(
                Utc.with_ymd_and_hms(2023, 1, 1, 0, 0, 0)
                    .single()
                    .expect("valid date"),
            ),
        }
    }

    async fn test_repository() -> PostgresTaskRepository {
        let config = DatabaseConfig::from_env().expect("DB_* variables must be set");
        let pool = connect_pool(&config).await.expect("database must be reachable");
        PostgresTaskRepository::new(pool)
    }

    // -------------------------------------------------------------------------
    // Row Mapping Tests
    // -------------------------------------------------------------------------

    #[rstest]
    fn test_task_from_row_null_description_is_empty() {
        let due_date = Utc
            .with_ymd_and_hms(2023, 6, 1, 10, 0, 0)
            .single()
            .expect("valid date");

        let task = task_from_row((7, "Title".to_string(), None, "done".to_string(), due_date));

        assert_eq!(task.id, TaskId::new(7));
        assert_eq!(task.description, "");
        assert_eq!(task.due_date.to_rfc3339(), "2023-06-01T10:00:00Z");
    }

    #[rstest]
    #[case(SELECT_TASK_BY_ID)]
    #[case(SELECT_ALL_TASKS)]
    fn test_selects_read_due_date_as_timestamptz(#[case] query: &str) {
        assert!(query.contains("due_date::timestamptz"));
    }

    // -------------------------------------------------------------------------
    // Integration Tests (require PostgreSQL)
    // -------------------------------------------------------------------------

    // These tests need a running PostgreSQL instance with the `tasks` table
    // and the DB_* variables pointing at it.

    #[rstest]
    #[tokio::test]
    #[ignore = "Requires PostgreSQL instance"]
    async fn test_postgres_task_repository_create_and_find() {
        let repository = test_repository().await;

        let created = repository.create(test_new_task("Test Task")).await.unwrap();
        assert!(created.id.value() > 0);
        assert_eq!(created.title, "Test Task");

        let found = repository.find_by_id(created.id).await.unwrap();
        assert_eq!(found, created);

        let _ = repository.delete(created.id).await;
    }

    #[rstest]
    #[tokio::test]
    #[ignore = "Requires PostgreSQL instance"]
    async fn test_postgres_task_repository_update() {
        let repository = test_repository().await;
        let created = repository.create(test_new_task("Original")).await.unwrap();

        let mut changed = created.clone();
        changed.title = "Updated".to_string();
        changed.status = "done".to_string();
        repository.update(changed.clone()).await.unwrap();

        let found = repository.find_by_id(created.id).await.unwrap();
        assert_eq!(found, changed);

        let _ = repository.delete(created.id).await;
    }

    #[rstest]
    #[tokio::test]
    #[ignore = "Requires PostgreSQL instance"]
    async fn test_postgres_task_repository_delete_missing_is_not_found() {
        let repository = test_repository().await;
        let created = repository.create(test_new_task("Doomed")).await.unwrap();

        repository.delete(created.id).await.unwrap();
        let result = repository.delete(created.id).await;

        assert_eq!(result, Err(RepositoryError::NotFound(created.id)));
    }

    #[rstest]
    #[tokio::test]
    #[ignore = "Requires PostgreSQL instance"]
    async fn test_postgres_task_repository_plain_timestamp_column() {
        let mut config = DatabaseConfig::from_env().expect("DB_* variables must be set");
        // One connection, so the temporary table shadows `tasks` for every query.
        config.max_connections = 1;
        let pool = connect_pool(&config).await.expect("database must be reachable");
        sqlx::query(
            "CREATE TEMPORARY TABLE tasks (id SERIAL PRIMARY KEY, title TEXT NOT NULL, \
             description TEXT NOT NULL DEFAULT '', status TEXT NOT NULL, \
             due_date TIMESTAMP NOT NULL)",
        )
        .execute(&pool)
        .await
        .unwrap();
        let repository = PostgresTaskRepository::new(pool);

        let created = repository.create(test_new_task("Plain")).await.unwrap();
        let listed = repository.list().await.unwrap();

        assert_eq!(created.due_date.to_rfc3339(), "2023-01-01T00:00:00Z");
        assert_eq!(listed, vec![created]);
    }
}
