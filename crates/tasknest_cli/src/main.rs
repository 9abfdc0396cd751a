//! TaskNest command-line front end.
//!
//! # Responsibility
//! - Drive the core coordinator from shell commands.
//! - Own presentation concerns: input validation, feedback text, rendering.

use clap::Parser;
use std::sync::Arc;
use tasknest_core::{SqliteTaskStore, TaskCoordinator};

mod cli;
mod commands;
mod view;

use cli::Cli;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    cli.init_logging()?;

    let store = Arc::new(SqliteTaskStore::new(cli.store_config()));
    let coordinator = TaskCoordinator::start(store).await;
    commands::run(cli.command, &coordinator, cli.json).await
}
