//! Task coordinator: owner of the visible task list and active filter.
//!
//! # Responsibility
//! - Route every task mutation through the durable store.
//! - Re-derive the visible list from the store after each mutation and
//!   publish it, newest first, together with the active filter.
//!
//! # Invariants
//! - The published list is never patched in place; it is always the result
//!   of a fresh store query under the active filter.
//! - Store errors are logged and never reach observers. A failed read
//!   publishes an empty list; a failed write skips the reload, so observers
//!   keep the pre-mutation view.
//! - Unknown IDs on update/toggle are silent no-ops with no reload.

use crate::model::filter::TaskFilter;
use crate::model::task::{Task, TaskId, TaskPatch};
use crate::store::TaskStore;
use log::{error, info};
use std::sync::Arc;
use tokio::sync::watch;

/// Result of a mutation that first looks the task up by ID.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MutationOutcome<T> {
    /// The change was stored and the list reloaded.
    Applied(T),
    /// No task has that ID; nothing was written or reloaded.
    NotFound,
    /// The store failed; observers keep the previous view.
    Failed,
}

impl<T> MutationOutcome<T> {
    pub fn applied(self) -> Option<T> {
        match self {
            Self::Applied(value) => Some(value),
            Self::NotFound | Self::Failed => None,
        }
    }
}

/// Explicitly constructed coordinator shared with presentation handlers.
///
/// Observers subscribe through `tokio::sync::watch`, so a new subscriber
/// immediately sees the latest list and filter.
pub struct TaskCoordinator {
    store: Arc<dyn TaskStore>,
    tasks_tx: watch::Sender<Vec<Task>>,
    filter_tx: watch::Sender<TaskFilter>,
}

impl TaskCoordinator {
    /// Creates a coordinator and performs the initial `reload(All)`.
    pub async fn start(store: Arc<dyn TaskStore>) -> Self {
        let (tasks_tx, _) = watch::channel(Vec::new());
        let (filter_tx, _) = watch::channel(TaskFilter::All);
        let coordinator = Self {
            store,
            tasks_tx,
            filter_tx,
        };
        coordinator.reload(TaskFilter::All).await;
        coordinator
    }

    pub fn subscribe_tasks(&self) -> watch::Receiver<Vec<Task>> {
        self.tasks_tx.subscribe()
    }

    pub fn subscribe_filter(&self) -> watch::Receiver<TaskFilter> {
        self.filter_tx.subscribe()
    }

    /// Snapshot of the currently published list.
    pub fn tasks(&self) -> Vec<Task> {
        self.tasks_tx.borrow().clone()
    }

    pub fn filter(&self) -> TaskFilter {
        *self.filter_tx.borrow()
    }

    /// Looks a task up in the published list without touching the store.
    pub fn published_task(&self, id: TaskId) -> Option<Task> {
        self.tasks_tx
            .borrow()
            .iter()
            .find(|task| task.id == id)
            .cloned()
    }

    /// Queries the store under `filter` and publishes the result.
    ///
    /// Returns `false` when the query failed and an empty list was published
    /// in its place.
    pub async fn reload(&self, filter: TaskFilter) -> bool {
        let loaded = match filter.completion() {
            None => self.store.get_all().await,
            Some(completed) => self.store.get_by_completion(completed).await,
        };

        match loaded {
            Ok(mut tasks) => {
                tasks.sort_by(|left, right| right.created_at.cmp(&left.created_at));
                info!(
                    "event=tasks_reload module=service status=ok filter={filter} count={}",
                    tasks.len()
                );
                self.tasks_tx.send_replace(tasks);
                self.filter_tx.send_replace(filter);
                true
            }
            Err(err) => {
                error!("event=tasks_reload module=service status=error filter={filter} error={err}");
                self.tasks_tx.send_replace(Vec::new());
                false
            }
        }
    }

    /// Creates an open task and returns its ID, or `None` if the write failed.
    pub async fn add(
        &self,
        title: impl Into<String>,
        description: impl Into<String>,
    ) -> Option<TaskId> {
        let task = Task::new(title, description);
        if !self.persist_and_reload("task_add", &task).await {
            return None;
        }
        Some(task.id)
    }

    /// Merges `patch` over the stored task.
    pub async fn update(&self, id: TaskId, patch: TaskPatch) -> MutationOutcome<()> {
        let mut task = match self.fetch("task_update", id).await {
            MutationOutcome::Applied(task) => task,
            MutationOutcome::NotFound => return MutationOutcome::NotFound,
            MutationOutcome::Failed => return MutationOutcome::Failed,
        };
        task.apply_patch(patch);
        if !self.persist_and_reload("task_update", &task).await {
            return MutationOutcome::Failed;
        }
        MutationOutcome::Applied(())
    }

    /// Flips the completion flag and returns the new value.
    ///
    /// The reload runs under the current filter whether or not the task still
    /// matches it.
    pub async fn toggle_completed(&self, id: TaskId) -> MutationOutcome<bool> {
        let mut task = match self.fetch("task_toggle", id).await {
            MutationOutcome::Applied(task) => task,
            MutationOutcome::NotFound => return MutationOutcome::NotFound,
            MutationOutcome::Failed => return MutationOutcome::Failed,
        };
        let completed = task.toggle_completed();
        if !self.persist_and_reload("task_toggle", &task).await {
            return MutationOutcome::Failed;
        }
        MutationOutcome::Applied(completed)
    }

    /// Removes the task. Deleting an unknown ID still reloads.
    pub async fn delete(&self, id: TaskId) -> bool {
        if let Err(err) = self.store.delete(id).await {
            error!("event=task_delete module=service status=error task_id={id} error={err}");
            return false;
        }
        info!("event=task_delete module=service status=ok task_id={id}");
        self.reload(self.filter()).await;
        true
    }

    /// Switches the filter by reloading from the store under it.
    ///
    /// Returns `false` when the reload failed; the previous filter stays
    /// published.
    pub async fn set_filter(&self, filter: TaskFilter) -> bool {
        self.reload(filter).await
    }

    async fn fetch(&self, event: &str, id: TaskId) -> MutationOutcome<Task> {
        match self.store.get(id).await {
            Ok(Some(task)) => MutationOutcome::Applied(task),
            Ok(None) => {
                info!("event={event} module=service status=skip reason=not_found task_id={id}");
                MutationOutcome::NotFound
            }
            Err(err) => {
                error!("event={event} module=service status=error task_id={id} error={err}");
                MutationOutcome::Failed
            }
        }
    }

    async fn persist_and_reload(&self, event: &str, task: &Task) -> bool {
        if let Err(err) = self.store.put(task).await {
            error!(
                "event={event} module=service status=error task_id={} error={err}",
                task.id
            );
            return false;
        }
        info!("event={event} module=service status=ok task_id={}", task.id);
        self.reload(self.filter()).await;
        true
    }
}
