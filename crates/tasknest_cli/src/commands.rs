//! Command handlers on top of the task coordinator.

use crate::cli::Command;
use crate::view;
use anyhow::{bail, Context};
use std::io::{BufRead, Write};
use tasknest_core::model::draft::{validate_description, validate_title};
use tasknest_core::{
    core_version, ping, MutationOutcome, TaskCoordinator, TaskDraft, TaskFilter, TaskId,
    TaskPatch, TaskRecord,
};

pub async fn run(
    command: Command,
    coordinator: &TaskCoordinator,
    json: bool,
) -> anyhow::Result<()> {
    let output = match command {
        Command::Add { title, description } => add(coordinator, title, description).await?,
        Command::List { filter } => list(coordinator, filter, json).await?,
        Command::Edit {
            id,
            title,
            description,
        } => edit(coordinator, id, title, description).await?,
        Command::Toggle { id } => toggle(coordinator, id).await?,
        Command::Delete { id, yes } => {
            if !yes && !confirm_delete()? {
                "Cancelled".to_string()
            } else {
                delete(coordinator, id).await?
            }
        }
        Command::Version => format!("tasknest_core version={} ping={}", core_version(), ping()),
    };
    println!("{output}");
    Ok(())
}

async fn add(
    coordinator: &TaskCoordinator,
    title: String,
    description: String,
) -> anyhow::Result<String> {
    let draft = TaskDraft::new(title.trim(), description.trim());
    draft.validate()?;

    let Some(id) = coordinator.add(draft.title, draft.description).await else {
        bail!("failed to add task");
    };
    Ok(format!("{} ({id})", view::TASK_ADDED))
}

async fn list(
    coordinator: &TaskCoordinator,
    filter: TaskFilter,
    json: bool,
) -> anyhow::Result<String> {
    if !coordinator.set_filter(filter).await {
        bail!("failed to load tasks");
    }
    let tasks = coordinator.tasks();

    if json {
        let records = tasks.iter().map(TaskRecord::from).collect::<Vec<_>>();
        return Ok(serde_json::to_string_pretty(&records)?);
    }

    if tasks.is_empty() {
        let (title, hint) = view::empty_state(filter);
        return Ok(format!("{title}\n{hint}"));
    }

    Ok(tasks
        .iter()
        .map(view::render_task)
        .collect::<Vec<_>>()
        .join("\n"))
}

async fn edit(
    coordinator: &TaskCoordinator,
    id: TaskId,
    title: Option<String>,
    description: Option<String>,
) -> anyhow::Result<String> {
    let patch = TaskPatch {
        title: title.map(|value| value.trim().to_string()),
        description: description.map(|value| value.trim().to_string()),
    };
    if patch.is_empty() {
        bail!("nothing to edit; pass --title and/or --description");
    }
    if let Some(title) = &patch.title {
        validate_title(title)?;
    }
    if let Some(description) = &patch.description {
        validate_description(description)?;
    }

    match coordinator.update(id, patch).await {
        MutationOutcome::Applied(()) => Ok(view::TASK_UPDATED.to_string()),
        MutationOutcome::NotFound => bail!("{}", view::TASK_NOT_FOUND),
        MutationOutcome::Failed => bail!("failed to update task {id}"),
    }
}

async fn toggle(coordinator: &TaskCoordinator, id: TaskId) -> anyhow::Result<String> {
    // Captured before the toggle is issued so the message cannot observe it.
    let was_completed = coordinator.published_task(id).map(|task| task.completed);

    let now_completed = match coordinator.toggle_completed(id).await {
        MutationOutcome::Applied(now_completed) => now_completed,
        MutationOutcome::NotFound => bail!("{}", view::TASK_NOT_FOUND),
        MutationOutcome::Failed => bail!("failed to toggle task {id}"),
    };
    // Hidden by the current filter: the flag flipped, so it was the opposite.
    let was_completed = was_completed.unwrap_or(!now_completed);
    Ok(view::toggle_feedback(was_completed).to_string())
}

async fn delete(coordinator: &TaskCoordinator, id: TaskId) -> anyhow::Result<String> {
    if !coordinator.delete(id).await {
        bail!("failed to delete task {id}");
    }
    Ok(view::TASK_DELETED.to_string())
}

fn confirm_delete() -> anyhow::Result<bool> {
    let mut stdout = std::io::stdout();
    write!(stdout, "{}", view::DELETE_PROMPT)?;
    stdout.flush()?;

    let mut answer = String::new();
    std::io::stdin()
        .lock()
        .read_line(&mut answer)
        .context("failed to read confirmation")?;
    Ok(view::is_confirmation(&answer))
}

#[cfg(test)]
mod tests {
    use super::{edit, list, toggle};
    use crate::view;
    use std::sync::Arc;
    use tasknest_core::{SqliteTaskStore, StoreConfig, TaskCoordinator, TaskFilter, TaskId};

    async fn coordinator() -> TaskCoordinator {
        TaskCoordinator::start(Arc::new(SqliteTaskStore::in_memory())).await
    }

    async fn add_task(coordinator: &TaskCoordinator, title: &str) -> TaskId {
        coordinator
            .add(title, "details")
            .await
            .expect("add should succeed")
    }

    #[tokio::test]
    async fn toggle_reports_open_task_as_completed() {
        let coordinator = coordinator().await;
        let id = add_task(&coordinator, "open").await;

        let message = toggle(&coordinator, id).await.unwrap();
        assert_eq!(message, "Task marked as complete");
        assert!(coordinator.published_task(id).unwrap().completed);
    }

    #[tokio::test]
    async fn toggle_reports_completed_task_as_reopened() {
        let coordinator = coordinator().await;
        let id = add_task(&coordinator, "done").await;
        toggle(&coordinator, id).await.unwrap();

        let message = toggle(&coordinator, id).await.unwrap();
        assert_eq!(message, "Task marked as incomplete");
        assert!(!coordinator.published_task(id).unwrap().completed);
    }

    #[tokio::test]
    async fn toggle_of_task_hidden_by_filter_uses_flipped_flag() {
        let coordinator = coordinator().await;
        let id = add_task(&coordinator, "hidden").await;
        toggle(&coordinator, id).await.unwrap();
        assert!(coordinator.set_filter(TaskFilter::Active).await);
        assert!(coordinator.published_task(id).is_none());

        let message = toggle(&coordinator, id).await.unwrap();
        assert_eq!(message, "Task marked as incomplete");
        assert!(coordinator.published_task(id).is_some());
    }

    #[tokio::test]
    async fn toggle_of_missing_task_is_not_found() {
        let coordinator = coordinator().await;

        let err = toggle(&coordinator, TaskId::new_v4()).await.unwrap_err();
        assert_eq!(err.to_string(), view::TASK_NOT_FOUND);
    }

    #[tokio::test]
    async fn edit_of_missing_task_is_not_found() {
        let coordinator = coordinator().await;

        let err = edit(&coordinator, TaskId::new_v4(), Some("title".into()), None)
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), view::TASK_NOT_FOUND);
    }

    #[tokio::test]
    async fn edit_against_unavailable_store_is_not_reported_as_missing() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("blocker");
        std::fs::write(&blocker, b"not a directory").unwrap();
        let store = SqliteTaskStore::new(StoreConfig::file(blocker.join("tasks.db")));
        let coordinator = TaskCoordinator::start(Arc::new(store)).await;

        let err = edit(&coordinator, TaskId::new_v4(), Some("title".into()), None)
            .await
            .unwrap_err();
        assert_ne!(err.to_string(), view::TASK_NOT_FOUND);
    }

    #[tokio::test]
    async fn list_fails_when_store_is_unavailable() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("blocker");
        std::fs::write(&blocker, b"not a directory").unwrap();
        let store = SqliteTaskStore::new(StoreConfig::file(blocker.join("tasks.db")));
        let coordinator = TaskCoordinator::start(Arc::new(store)).await;

        let err = list(&coordinator, TaskFilter::All, false).await.unwrap_err();
        assert_eq!(err.to_string(), "failed to load tasks");
    }

    #[tokio::test]
    async fn list_shows_empty_state_for_filter() {
        let coordinator = coordinator().await;
        add_task(&coordinator, "open").await;

        let output = list(&coordinator, TaskFilter::Completed, false).await.unwrap();
        let (title, hint) = view::empty_state(TaskFilter::Completed);
        assert_eq!(output, format!("{title}\n{hint}"));
    }
}
