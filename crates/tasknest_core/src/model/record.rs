//! Persisted task shape.
//!
//! # Responsibility
//! - Define the storage/export record for one task.
//! - Convert timestamps to and from their ISO-8601 string form.
//!
//! # Invariants
//! - Timestamps are written as UTC RFC 3339 with exactly three fractional
//!   digits and a `Z` suffix.
//! - Parsing rejects records whose `updatedAt` precedes `createdAt`.

use crate::model::task::{Task, Timestamp};
use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// One task as stored on disk and emitted by JSON exports.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskRecord {
    pub id: String,
    pub title: String,
    pub description: String,
    pub completed: bool,
    pub created_at: String,
    pub updated_at: String,
}

/// A stored record that cannot be turned back into a `Task`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RecordError {
    #[error("invalid task id `{0}`")]
    InvalidId(String),
    #[error("invalid {field} timestamp `{value}`")]
    InvalidTimestamp { field: &'static str, value: String },
    #[error("updatedAt `{updated_at}` precedes createdAt `{created_at}`")]
    UpdatedBeforeCreated {
        created_at: String,
        updated_at: String,
    },
}

pub fn format_timestamp(value: &Timestamp) -> String {
    value.to_rfc3339_opts(SecondsFormat::Millis, true)
}

pub fn parse_timestamp(field: &'static str, value: &str) -> Result<Timestamp, RecordError> {
    DateTime::parse_from_rfc3339(value)
        .map(|parsed| parsed.with_timezone(&Utc))
        .map_err(|_| RecordError::InvalidTimestamp {
            field,
            value: value.to_string(),
        })
}

impl From<&Task> for TaskRecord {
    fn from(task: &Task) -> Self {
        Self {
            id: task.id.to_string(),
            title: task.title.clone(),
            description: task.description.clone(),
            completed: task.completed,
            created_at: format_timestamp(&task.created_at),
            updated_at: format_timestamp(&task.updated_at),
        }
    }
}

impl TryFrom<TaskRecord> for Task {
    type Error = RecordError;

    fn try_from(record: TaskRecord) -> Result<Self, Self::Error> {
        let id = Uuid::parse_str(&record.id)
            .map_err(|_| RecordError::InvalidId(record.id.clone()))?;
        let created_at = parse_timestamp("createdAt", &record.created_at)?;
        let updated_at = parse_timestamp("updatedAt", &record.updated_at)?;
        if updated_at < created_at {
            return Err(RecordError::UpdatedBeforeCreated {
                created_at: record.created_at,
                updated_at: record.updated_at,
            });
        }

        Ok(Task {
            id,
            title: record.title,
            description: record.description,
            completed: record.completed,
            created_at,
            updated_at,
        })
    }
}
