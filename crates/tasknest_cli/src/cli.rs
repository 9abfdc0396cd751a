//! Argument definitions.

use anyhow::anyhow;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tasknest_core::{default_log_level, init_logging, StoreConfig, TaskFilter, TaskId};

/// TaskNest - local task list
#[derive(Parser, Debug)]
#[command(name = "tasknest")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to the task database (defaults to the platform data directory)
    #[arg(long, global = true, env = "TASKNEST_DB_PATH")]
    pub db: Option<PathBuf>,

    /// Absolute directory for rolling log files; logging is off when unset
    #[arg(long, global = true, env = "TASKNEST_LOG_DIR")]
    pub log_dir: Option<PathBuf>,

    /// Log level: trace, debug, info, warn, error
    #[arg(long, global = true, env = "TASKNEST_LOG_LEVEL")]
    pub log_level: Option<String>,

    /// Output in JSON format
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Create a new task
    Add {
        /// Task title (at most 100 characters)
        title: String,
        /// Task description (at most 500 characters)
        description: String,
    },

    /// List tasks, newest first
    List {
        /// Subset to show: all, active, completed
        #[arg(long, short, default_value = "all")]
        filter: TaskFilter,
    },

    /// Edit the title and/or description of a task
    Edit {
        id: TaskId,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        description: Option<String>,
    },

    /// Mark a task complete, or incomplete if it already is
    Toggle { id: TaskId },

    /// Delete a task permanently
    Delete {
        id: TaskId,
        /// Skip the confirmation prompt
        #[arg(long, short)]
        yes: bool,
    },

    /// Print core version information
    Version,
}

impl Cli {
    pub fn store_config(&self) -> StoreConfig {
        match &self.db {
            Some(path) => StoreConfig::file(path),
            None => StoreConfig::default_file(),
        }
    }

    pub fn init_logging(&self) -> anyhow::Result<()> {
        let Some(log_dir) = &self.log_dir else {
            return Ok(());
        };
        let level = self.log_level.as_deref().unwrap_or(default_log_level());
        let log_dir = log_dir
            .to_str()
            .ok_or_else(|| anyhow!("log directory must be valid UTF-8"))?;
        init_logging(level, log_dir).map_err(|err| anyhow!(err))
    }
}
