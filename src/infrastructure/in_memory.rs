//! In-memory repository implementation.
//!
//! This module provides an in-memory implementation of [`TaskRepository`]
//! with the same observable contract as the `PostgreSQL` one. It backs the
//! integration tests and local experiments.
//!
//! # Features
//!
//! - Thread-safe with `Arc<RwLock<...>>`
//! - Ids assigned from a counter starting at 1, never reused
//! - All operations return boxed futures like the database backend

use std::collections::BTreeMap;
use std::sync::Arc;

use futures::FutureExt;
use futures::future::BoxFuture;
use tokio::sync::RwLock;

use crate::domain::{NewTask, Task, TaskId};
use crate::infrastructure::{RepositoryError, TaskRepository};

/// Storage guarded by the repository lock.
#[derive(Debug)]
struct InMemoryState {
    tasks: BTreeMap<TaskId, Task>,
    next_id: i32,
}

impl Default for InMemoryState {
    fn default() -> Self {
        Self {
            tasks: BTreeMap::new(),
            next_id: 1,
        }
    }
}

// =============================================================================
// In-Memory Task Repository
// =============================================================================

/// In-memory implementation of `TaskRepository`.
///
/// Cloning the repository shares the underlying storage.
///
/// # Example
///
/// ```ignore
/// use task_api::infrastructure::InMemoryTaskRepository;
///
/// let repository = InMemoryTaskRepository::new();
/// let task = repository.create(new_task).await?;
/// let found = repository.find_by_id(task.id).await?;
/// ```
#[derive(Debug, Clone, Default)]
pub struct InMemoryTaskRepository {
    state: Arc<RwLock<InMemoryState>>,
}

impl InMemoryTaskRepository {
    /// Creates a new empty in-memory task repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of stored tasks.
    pub async fn len(&self) -> usize {
        self.state.read().await.tasks.len()
    }

    /// Returns `true` if no task is stored.
    pub async fn is_empty(&self) -> bool {
        self.state.read().await.tasks.is_empty()
    }
}

impl TaskRepository for InMemoryTaskRepository {
    fn create(&self, task: NewTask) -> BoxFuture<'_, Result<Task, RepositoryError>> {
        async move {
            let mut guard = self.state.write().await;

            let task_id = TaskId::new(guard.next_id);
            guard.next_id = guard.next_id.checked_add(1).ok_or_else(|| {
                RepositoryError::DatabaseError("task id sequence exhausted".to_string())
            })?;

            let task = task.with_id(task_id);
            guard.tasks.insert(task_id, task.clone());
            Ok(task)
        }
        .boxed()
    }

    fn list(&self) -> BoxFuture<'_, Result<Vec<Task>, RepositoryError>> {
        async move {
            let guard = self.state.read().await;
            Ok(guard.tasks.values().cloned().collect())
        }
        .boxed()
    }

    fn find_by_id(&self, id: TaskId) -> BoxFuture<'_, Result<Task, RepositoryError>> {
        async move {
            let guard = self.state.read().await;
            guard
                .tasks
                .get(&id)
                .cloned()
                .ok_or(RepositoryError::NotFound(id))
        }
        .boxed()
    }

    fn update(&self, task: Task) -> BoxFuture<'_, Result<(), RepositoryError>> {
        async move {
            let mut guard = self.state.write().await;
            let slot = guard
                .tasks
                .get_mut(&task.id)
                .ok_or(RepositoryError::NotFound(task.id))?;
            *slot = task;
            Ok(())
        }
        .boxed()
    }

    fn delete(&self, id: TaskId) -> BoxFuture<'_, Result<(), RepositoryError>> {
        async move {
            let mut guard = self.state.write().await;
            guard
                .tasks
                .remove(&id)
                .map(|_| ())
                .ok_or(RepositoryError::NotFound(id))
        }
        .boxed()
    }
}

// =============================================================================
// Tests
// =============================================================================
