//! SQLite-backed durable store with lazy, single-flight initialization.

use super::{StoreError, StoreResult, TaskStore};
use crate::config::{StoreConfig, StoreLocation};
use crate::db::{open_db, open_db_in_memory, DbError};
use crate::model::task::{Task, TaskId};
use crate::repo::task_repo::{RepoResult, SqliteTaskRepository, TaskRepository};
use async_trait::async_trait;
use log::{debug, error};
use rusqlite::Connection;
use std::sync::Arc;
use tokio::sync::{Mutex, OnceCell};

type SharedConnection = Arc<Mutex<Connection>>;
type InitOutcome = Result<SharedConnection, Arc<DbError>>;

/// Task store over one lazily opened SQLite connection.
///
/// The first operation opens the database and applies migrations. Callers
/// that arrive while that is in flight wait for the same outcome, and a
/// failed open is reported to every later caller.
pub struct SqliteTaskStore {
    config: StoreConfig,
    conn: OnceCell<InitOutcome>,
}

impl SqliteTaskStore {
    pub fn new(config: StoreConfig) -> Self {
        Self {
            config,
            conn: OnceCell::new(),
        }
    }

    pub fn in_memory() -> Self {
        Self::new(StoreConfig::in_memory())
    }

    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    /// Whether the open attempt has completed, successfully or not.
    pub fn is_initialized(&self) -> bool {
        self.conn.initialized()
    }

    async fn connection(&self) -> StoreResult<SharedConnection> {
        let outcome = self
            .conn
            .get_or_init(|| open_shared(self.config.clone()))
            .await;

        match outcome {
            Ok(conn) => Ok(Arc::clone(conn)),
            Err(err) => Err(StoreError::Unavailable(Arc::clone(err))),
        }
    }

    async fn with_repo<T, F>(&self, op: &'static str, f: F) -> StoreResult<T>
    where
        T: Send + 'static,
        F: FnOnce(&SqliteTaskRepository<'_>) -> RepoResult<T> + Send + 'static,
    {
        let conn = self.connection().await?;
        let result = tokio::task::spawn_blocking(move || {
            let conn = conn.blocking_lock();
            let repo = SqliteTaskRepository::new(&conn);
            f(&repo)
        })
        .await
        .map_err(|err| StoreError::Worker(err.to_string()))?;

        match result {
            Ok(value) => {
                debug!("event=store_{op} module=store status=ok");
                Ok(value)
            }
            Err(err) => {
                error!("event=store_{op} module=store status=error error={err}");
                Err(err.into())
            }
        }
    }
}

async fn open_shared(config: StoreConfig) -> InitOutcome {
    let opened = tokio::task::spawn_blocking(move || match &config.location {
        StoreLocation::File(path) => open_db(path),
        StoreLocation::Memory => open_db_in_memory(),
    })
    .await;

    match opened {
        Ok(Ok(conn)) => Ok(Arc::new(Mutex::new(conn))),
        Ok(Err(err)) => Err(Arc::new(err)),
        Err(join_err) => Err(Arc::new(DbError::Io(std::io::Error::other(format!(
            "database open task failed: {join_err}"
        ))))),
    }
}

#[async_trait]
impl TaskStore for SqliteTaskStore {
    async fn put(&self, task: &Task) -> StoreResult<()> {
        let task = task.clone();
        self.with_repo("put", move |repo| repo.put(&task)).await
    }

    async fn delete(&self, id: TaskId) -> StoreResult<()> {
        self.with_repo("delete", move |repo| repo.delete(id)).await
    }

    async fn get(&self, id: TaskId) -> StoreResult<Option<Task>> {
        self.with_repo("get", move |repo| repo.get(id)).await
    }

    async fn get_all(&self) -> StoreResult<Vec<Task>> {
        self.with_repo("get_all", |repo| repo.list_all()).await
    }

    async fn get_by_completion(&self, completed: bool) -> StoreResult<Vec<Task>> {
        self.with_repo("get_by_completion", move |repo| {
            repo.list_by_completion(completed)
        })
        .await
    }
}
