//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define the synchronous data access contract for tasks.
//! - Isolate SQLite query details from the async store and coordinator.
//!
//! # Invariants
//! - Read paths reject malformed rows with `RepoError::InvalidData`.
//! - Missing rows are reported as `None`/no-op, never as errors.

pub mod task_repo;
