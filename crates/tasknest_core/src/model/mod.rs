//! Task domain model.
//!
//! # Responsibility
//! - Define the canonical task record and its mutation helpers.
//! - Define the view filter and the persisted record shape.
//! - Provide input validation helpers for presentation layers.
//!
//! # Invariants
//! - Every task is identified by a stable `TaskId`.
//! - Deletion is a hard delete; there are no tombstones.

pub mod draft;
pub mod filter;
pub mod record;
pub mod task;
