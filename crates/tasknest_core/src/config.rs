//! Store location configuration.
//!
//! # Responsibility
//! - Describe where the task database lives.
//! - Resolve the platform default database path.
//!
//! # Invariants
//! - The core never reads environment variables; callers layer their own
//!   overrides on top of `StoreConfig`.

use std::path::PathBuf;

pub const APP_DIR_NAME: &str = "tasknest";
pub const DB_FILE_NAME: &str = "tasknest.sqlite3";

/// Backing location for a task store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreLocation {
    /// SQLite database file; parent directories are created on open.
    File(PathBuf),
    /// Private in-memory database that lives as long as the store.
    Memory,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    pub location: StoreLocation,
}

impl StoreConfig {
    pub fn file(path: impl Into<PathBuf>) -> Self {
        Self {
            location: StoreLocation::File(path.into()),
        }
    }

    pub fn in_memory() -> Self {
        Self {
            location: StoreLocation::Memory,
        }
    }

    /// `<data dir>/tasknest/tasknest.sqlite3`, or the same layout under the
    /// system temp directory when the platform has no data directory.
    pub fn default_file() -> Self {
        Self::file(default_db_path())
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self::default_file()
    }
}

pub fn default_db_path() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(std::env::temp_dir)
        .join(APP_DIR_NAME)
        .join(DB_FILE_NAME)
}
