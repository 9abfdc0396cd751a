//! Task entity.
//!
//! # Responsibility
//! - Define the canonical todo record handled by store and coordinator.
//! - Own timestamp policy for creation and mutation.
//!
//! # Invariants
//! - `id` and `created_at` never change after creation.
//! - `updated_at >= created_at`, and every mutation moves `updated_at`
//!   strictly forward.
//! - Timestamps are whole milliseconds so storage round-trips are exact.

use chrono::{DateTime, SubsecRound, Utc};
use uuid::Uuid;

/// Stable identifier for a task.
///
/// Kept as a type alias to make semantic intent explicit in signatures.
pub type TaskId = Uuid;

/// UTC instant with millisecond precision.
pub type Timestamp = DateTime<Utc>;

/// Returns the current instant truncated to whole milliseconds.
pub fn now_millis() -> Timestamp {
    Utc::now().trunc_subsecs(3)
}

/// Canonical todo record.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Task {
    pub id: TaskId,
    pub title: String,
    pub description: String,
    pub completed: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Partial field update merged over an existing task.
///
/// `None` keeps the stored value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskPatch {
    pub title: Option<String>,
    pub description: Option<String>,
}

impl TaskPatch {
    pub fn title(title: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            description: None,
        }
    }

    pub fn description(description: impl Into<String>) -> Self {
        Self {
            title: None,
            description: Some(description.into()),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.description.is_none()
    }
}

impl Task {
    /// Creates a new open task with a generated ID and both timestamps set
    /// to now.
    pub fn new(title: impl Into<String>, description: impl Into<String>) -> Self {
        let now = now_millis();
        Self {
            id: Uuid::new_v4(),
            title: title.into(),
            description: description.into(),
            completed: false,
            created_at: now,
            updated_at: now,
        }
    }

    /// Creates an open task with caller-provided identity and creation time.
    ///
    /// Used by tests and seeding code that need a chosen creation time.
    pub fn with_id(
        id: TaskId,
        title: impl Into<String>,
        description: impl Into<String>,
        created_at: Timestamp,
    ) -> Self {
        let created_at = created_at.trunc_subsecs(3);
        Self {
            id,
            title: title.into(),
            description: description.into(),
            completed: false,
            created_at,
            updated_at: created_at,
        }
    }

    /// Merges `patch` over this task and bumps `updated_at`.
    pub fn apply_patch(&mut self, patch: TaskPatch) {
        if let Some(title) = patch.title {
            self.title = title;
        }
        if let Some(description) = patch.description {
            self.description = description;
        }
        self.touch();
    }

    /// Flips the completion flag, bumps `updated_at` and returns the new flag.
    pub fn toggle_completed(&mut self) -> bool {
        self.completed = !self.completed;
        self.touch();
        self.completed
    }

    /// Whether the task was modified after creation.
    pub fn was_updated(&self) -> bool {
        self.updated_at != self.created_at
    }

    fn touch(&mut self) {
        // Two mutations inside the same millisecond still need distinct stamps.
        let floor = self.updated_at + chrono::Duration::milliseconds(1);
        self.updated_at = now_millis().max(floor);
    }
}
