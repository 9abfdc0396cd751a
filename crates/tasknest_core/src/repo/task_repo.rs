//! Task repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Provide upsert/delete/get/list APIs over the `tasks` table.
//! - Keep SQL details inside the core persistence boundary.
//!
//! # Invariants
//! - Each write runs in its own transaction.
//! - Rows are decoded through `TaskRecord`, so stored data follows the same
//!   shape as JSON exports.

use crate::db::DbError;
use crate::model::record::{RecordError, TaskRecord};
use crate::model::task::{Task, TaskId};
use rusqlite::{params, Connection, OptionalExtension, Row};
use thiserror::Error;

const TASK_SELECT_SQL: &str = "SELECT
    id,
    title,
    description,
    completed,
    created_at,
    updated_at
FROM tasks";

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error for task persistence and query operations.
#[derive(Debug, Error)]
pub enum RepoError {
    #[error("{0}")]
    Db(#[from] DbError),
    #[error("invalid persisted task data: {0}")]
    InvalidData(String),
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

impl From<RecordError> for RepoError {
    fn from(value: RecordError) -> Self {
        Self::InvalidData(value.to_string())
    }
}

/// Repository interface for task storage.
pub trait TaskRepository {
    /// Inserts the task, or replaces the stored row with the same ID.
    fn put(&self, task: &Task) -> RepoResult<()>;
    /// Removes the task. Removing an absent ID succeeds.
    fn delete(&self, id: TaskId) -> RepoResult<()>;
    fn get(&self, id: TaskId) -> RepoResult<Option<Task>>;
    /// Every stored task, in no particular order.
    fn list_all(&self) -> RepoResult<Vec<Task>>;
    fn list_by_completion(&self, completed: bool) -> RepoResult<Vec<Task>>;
}

/// SQLite-backed task repository.
pub struct SqliteTaskRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteTaskRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl TaskRepository for SqliteTaskRepository<'_> {
    fn put(&self, task: &Task) -> RepoResult<()> {
        let record = TaskRecord::from(task);
        let tx = self.conn.unchecked_transaction()?;
        tx.execute(
            "INSERT INTO tasks (
                id,
                title,
                description,
                completed,
                created_at,
                updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            ON CONFLICT(id) DO UPDATE SET
                title = excluded.title,
                description = excluded.description,
                completed = excluded.completed,
                created_at = excluded.created_at,
                updated_at = excluded.updated_at;",
            params![
                record.id,
                record.title,
                record.description,
                bool_to_int(record.completed),
                record.created_at,
                record.updated_at,
            ],
        )?;
        tx.commit()?;
        Ok(())
    }

    fn delete(&self, id: TaskId) -> RepoResult<()> {
        let tx = self.conn.unchecked_transaction()?;
        tx.execute("DELETE FROM tasks WHERE id = ?1;", [id.to_string()])?;
        tx.commit()?;
        Ok(())
    }

    fn get(&self, id: TaskId) -> RepoResult<Option<Task>> {
        let record = self
            .conn
            .query_row(
                &format!("{TASK_SELECT_SQL} WHERE id = ?1;"),
                [id.to_string()],
                read_record,
            )
            .optional()?;

        match record {
            Some(record) => Ok(Some(decode_record(record)?)),
            None => Ok(None),
        }
    }

    fn list_all(&self) -> RepoResult<Vec<Task>> {
        let mut stmt = self.conn.prepare(&format!("{TASK_SELECT_SQL};"))?;
        let mut rows = stmt.query([])?;
        let mut tasks = Vec::new();

        while let Some(row) = rows.next()? {
            tasks.push(decode_record(read_record(row)?)?);
        }

        Ok(tasks)
    }

    fn list_by_completion(&self, completed: bool) -> RepoResult<Vec<Task>> {
        // Filtered in memory; the `completed` index is not consulted.
        let mut tasks = self.list_all()?;
        tasks.retain(|task| task.completed == completed);
        Ok(tasks)
    }
}

fn read_record(row: &Row<'_>) -> rusqlite::Result<RawTaskRow> {
    Ok(RawTaskRow {
        id: row.get("id")?,
        title: row.get("title")?,
        description: row.get("description")?,
        completed: row.get("completed")?,
        created_at: row.get("created_at")?,
        updated_at: row.get("updated_at")?,
    })
}

struct RawTaskRow {
    id: String,
    title: String,
    description: String,
    completed: i64,
    created_at: String,
    updated_at: String,
}

fn decode_record(row: RawTaskRow) -> RepoResult<Task> {
    let completed = match row.completed {
        0 => false,
        1 => true,
        other => {
            return Err(RepoError::InvalidData(format!(
                "invalid completed value `{other}` in tasks.completed"
            )));
        }
    };

    let task = Task::try_from(TaskRecord {
        id: row.id,
        title: row.title,
        description: row.description,
        completed,
        created_at: row.created_at,
        updated_at: row.updated_at,
    })?;
    Ok(task)
}

fn bool_to_int(value: bool) -> i64 {
    if value {
        1
    } else {
        0
    }
}
