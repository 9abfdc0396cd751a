//! Durable task store.
//!
//! # Responsibility
//! - Expose the async persistence contract used by the coordinator.
//! - Keep every database access behind one component.
//!
//! # Invariants
//! - Errors are returned to the caller as-is; the store never retries and
//!   never falls back to another backend.
//! - `get_by_completion` and `get_all` return tasks in no particular order.

use crate::db::DbError;
use crate::model::task::{Task, TaskId};
use crate::repo::task_repo::RepoError;
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

mod sqlite;

pub use sqlite::SqliteTaskStore;

pub type StoreResult<T> = Result<T, StoreError>;

#[derive(Debug, Error)]
pub enum StoreError {
    /// Opening the database failed; the outcome is latched for the store's
    /// lifetime.
    #[error("task store unavailable: {0}")]
    Unavailable(Arc<DbError>),
    #[error(transparent)]
    Repo(#[from] RepoError),
    #[error("task store worker failed: {0}")]
    Worker(String),
}

/// Async persistence contract for tasks.
#[async_trait]
pub trait TaskStore: Send + Sync {
    /// Inserts the task or replaces the stored task with the same ID.
    async fn put(&self, task: &Task) -> StoreResult<()>;

    /// Removes a task. Deleting an unknown ID succeeds.
    async fn delete(&self, id: TaskId) -> StoreResult<()>;

    async fn get(&self, id: TaskId) -> StoreResult<Option<Task>>;

    async fn get_all(&self) -> StoreResult<Vec<Task>>;

    /// Every task whose completion flag equals `completed`.
    async fn get_by_completion(&self, completed: bool) -> StoreResult<Vec<Task>>;
}
