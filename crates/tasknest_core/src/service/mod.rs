//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate store calls into the operations presentation layers use.
//! - Keep UI layers decoupled from storage details.

pub mod task_coordinator;
