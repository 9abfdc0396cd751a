//! Core persistence and state synchronization for TaskNest.
//! This crate is the single source of truth for task invariants.

pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;
pub mod store;

pub use config::{StoreConfig, StoreLocation};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::draft::{DraftError, TaskDraft, DESCRIPTION_MAX_CHARS, TITLE_MAX_CHARS};
pub use model::filter::{ParseFilterError, TaskFilter};
pub use model::record::{RecordError, TaskRecord};
pub use model::task::{Task, TaskId, TaskPatch, Timestamp};
pub use repo::task_repo::{RepoError, RepoResult, SqliteTaskRepository, TaskRepository};
pub use service::task_coordinator::{MutationOutcome, TaskCoordinator};
pub use store::{SqliteTaskStore, StoreError, StoreResult, TaskStore};

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
