use async_trait::async_trait;
use chrono::Duration;
use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tasknest_core::model::task::now_millis;
use tasknest_core::{
    MutationOutcome, SqliteTaskStore, StoreError, StoreResult, Task, TaskCoordinator, TaskFilter,
    TaskId, TaskPatch, TaskStore,
};
use uuid::Uuid;

/// Wraps a real store and fails reads or writes on demand.
struct FlakyStore {
    inner: SqliteTaskStore,
    fail_reads: AtomicBool,
    fail_writes: AtomicBool,
}

impl FlakyStore {
    fn new() -> Self {
        Self {
            inner: SqliteTaskStore::in_memory(),
            fail_reads: AtomicBool::new(false),
            fail_writes: AtomicBool::new(false),
        }
    }

    fn check(flag: &AtomicBool) -> StoreResult<()> {
        if flag.load(Ordering::SeqCst) {
            return Err(StoreError::Worker("injected failure".to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl TaskStore for FlakyStore {
    async fn put(&self, task: &Task) -> StoreResult<()> {
        Self::check(&self.fail_writes)?;
        self.inner.put(task).await
    }

    async fn delete(&self, id: TaskId) -> StoreResult<()> {
        Self::check(&self.fail_writes)?;
        self.inner.delete(id).await
    }

    async fn get(&self, id: TaskId) -> StoreResult<Option<Task>> {
        Self::check(&self.fail_reads)?;
        self.inner.get(id).await
    }

    async fn get_all(&self) -> StoreResult<Vec<Task>> {
        Self::check(&self.fail_reads)?;
        self.inner.get_all().await
    }

    async fn get_by_completion(&self, completed: bool) -> StoreResult<Vec<Task>> {
        Self::check(&self.fail_reads)?;
        self.inner.get_by_completion(completed).await
    }
}

async fn coordinator() -> (TaskCoordinator, Arc<SqliteTaskStore>) {
    let store = Arc::new(SqliteTaskStore::in_memory());
    let coordinator = TaskCoordinator::start(store.clone()).await;
    (coordinator, store)
}

async fn seed_with_age(store: &SqliteTaskStore, title: &str, minutes_ago: i64) -> Task {
    let task = Task::with_id(
        Uuid::new_v4(),
        title,
        "d",
        now_millis() - Duration::minutes(minutes_ago),
    );
    store.put(&task).await.unwrap();
    task
}

#[tokio::test]
async fn starts_with_all_filter_and_loads_existing_tasks() {
    let store = Arc::new(SqliteTaskStore::in_memory());
    let existing = Task::new("existing", "d");
    store.put(&existing).await.unwrap();

    let coordinator = TaskCoordinator::start(store).await;

    assert_eq!(coordinator.filter(), TaskFilter::All);
    assert_eq!(coordinator.tasks(), vec![existing]);
}

#[tokio::test]
async fn buy_milk_scenario() {
    let (coordinator, store) = coordinator().await;

    let id = coordinator.add("Buy milk", "2%").await.unwrap();
    let stored = store.get_all().await.unwrap();
    assert_eq!(stored.len(), 1);
    assert!(!stored[0].completed);
    let before = stored[0].updated_at;

    assert_eq!(
        coordinator.toggle_completed(id).await,
        MutationOutcome::Applied(true)
    );
    let toggled = store.get(id).await.unwrap().unwrap();
    assert!(toggled.completed);
    assert!(toggled.updated_at > before);

    assert!(coordinator.set_filter(TaskFilter::Active).await);
    assert!(coordinator.tasks().is_empty());

    assert!(coordinator.set_filter(TaskFilter::Completed).await);
    assert_eq!(coordinator.tasks(), vec![toggled]);
}

#[tokio::test]
async fn published_list_is_newest_first() {
    let (coordinator, store) = coordinator().await;
    let oldest = seed_with_age(&store, "oldest", 30).await;
    let newest = seed_with_age(&store, "newest", 1).await;
    let middle = seed_with_age(&store, "middle", 10).await;

    coordinator.reload(TaskFilter::All).await;
    let ids = coordinator
        .tasks()
        .into_iter()
        .map(|task| task.id)
        .collect::<Vec<_>>();
    assert_eq!(ids, vec![newest.id, middle.id, oldest.id]);

    let added = coordinator.add("just now", "d").await.unwrap();
    assert_eq!(coordinator.tasks()[0].id, added);
}

#[tokio::test]
async fn filters_select_by_completion() {
    let (coordinator, store) = coordinator().await;
    let mut ids = Vec::new();
    for index in 0..6 {
        ids.push(coordinator.add(format!("task {index}"), "d").await.unwrap());
    }
    for id in ids.iter().step_by(2) {
        coordinator.toggle_completed(*id).await.applied().unwrap();
    }

    coordinator.set_filter(TaskFilter::Active).await;
    assert_eq!(coordinator.filter(), TaskFilter::Active);
    assert_eq!(coordinator.tasks().len(), 3);
    assert!(coordinator.tasks().iter().all(|task| !task.completed));

    coordinator.set_filter(TaskFilter::Completed).await;
    assert_eq!(coordinator.tasks().len(), 3);
    assert!(coordinator.tasks().iter().all(|task| task.completed));

    coordinator.set_filter(TaskFilter::All).await;
    let published = coordinator.tasks().into_iter().collect::<HashSet<_>>();
    let stored = store.get_all().await.unwrap().into_iter().collect::<HashSet<_>>();
    assert_eq!(published, stored);
}

#[tokio::test]
async fn mutations_reload_under_the_active_filter() {
    let (coordinator, _store) = coordinator().await;
    coordinator.set_filter(TaskFilter::Active).await;

    let id = coordinator.add("open", "d").await.unwrap();
    assert_eq!(coordinator.tasks().len(), 1);

    coordinator.toggle_completed(id).await.applied().unwrap();
    assert_eq!(coordinator.filter(), TaskFilter::Active);
    assert!(coordinator.tasks().is_empty());
}

#[tokio::test]
async fn update_merges_partial_fields() {
    let (coordinator, _store) = coordinator().await;
    let id = coordinator.add("title", "description").await.unwrap();

    assert_eq!(
        coordinator.update(id, TaskPatch::description("changed")).await,
        MutationOutcome::Applied(())
    );

    let task = coordinator.published_task(id).unwrap();
    assert_eq!(task.title, "title");
    assert_eq!(task.description, "changed");
    assert!(task.was_updated());
}

#[tokio::test]
async fn missing_ids_are_silent_no_ops() {
    let (coordinator, store) = coordinator().await;
    coordinator.add("keep", "d").await.unwrap();
    let before_store = store.get_all().await.unwrap();
    let before_list = coordinator.tasks();
    let updates = coordinator.subscribe_tasks();

    let missing = Uuid::new_v4();
    assert_eq!(
        coordinator.update(missing, TaskPatch::title("x")).await,
        MutationOutcome::NotFound
    );
    assert_eq!(
        coordinator.toggle_completed(missing).await,
        MutationOutcome::NotFound
    );

    assert_eq!(store.get_all().await.unwrap(), before_store);
    assert_eq!(coordinator.tasks(), before_list);
    assert!(!updates.has_changed().unwrap());
}

#[tokio::test]
async fn delete_twice_is_not_an_error() {
    let (coordinator, store) = coordinator().await;
    let id = coordinator.add("temporary", "d").await.unwrap();

    assert!(coordinator.delete(id).await);
    assert!(coordinator.delete(id).await);
    assert!(store.get_all().await.unwrap().is_empty());
    assert!(coordinator.tasks().is_empty());
}

#[tokio::test]
async fn ids_are_unique_across_adds() {
    let (coordinator, _store) = coordinator().await;
    let mut seen = HashSet::new();
    for index in 0..25 {
        let id = coordinator.add(format!("task {index}"), "d").await.unwrap();
        assert!(seen.insert(id));
    }
    assert_eq!(coordinator.tasks().len(), 25);
}

#[tokio::test]
async fn late_subscribers_see_latest_values() {
    let (coordinator, _store) = coordinator().await;
    let id = coordinator.add("seen late", "d").await.unwrap();
    coordinator.set_filter(TaskFilter::Active).await;

    let tasks = coordinator.subscribe_tasks();
    let filter = coordinator.subscribe_filter();
    assert_eq!(tasks.borrow().len(), 1);
    assert_eq!(tasks.borrow()[0].id, id);
    assert_eq!(*filter.borrow(), TaskFilter::Active);
}

#[tokio::test]
async fn subscribers_are_notified_after_each_mutation() {
    let (coordinator, _store) = coordinator().await;
    let mut tasks = coordinator.subscribe_tasks();
    assert!(!tasks.has_changed().unwrap());

    coordinator.add("notify", "d").await.unwrap();
    assert!(tasks.has_changed().unwrap());
    assert_eq!(tasks.borrow_and_update().len(), 1);
}

#[tokio::test]
async fn read_failure_publishes_empty_list_and_keeps_filter() {
    let store = Arc::new(FlakyStore::new());
    let coordinator = TaskCoordinator::start(store.clone()).await;
    coordinator.add("visible", "d").await.unwrap();
    assert_eq!(coordinator.tasks().len(), 1);

    store.fail_reads.store(true, Ordering::SeqCst);
    assert!(!coordinator.set_filter(TaskFilter::Completed).await);

    assert!(coordinator.tasks().is_empty());
    assert_eq!(coordinator.filter(), TaskFilter::All);
}

#[tokio::test]
async fn write_failure_keeps_previous_view() {
    let store = Arc::new(FlakyStore::new());
    let coordinator = TaskCoordinator::start(store.clone()).await;
    let id = coordinator.add("stable", "d").await.unwrap();
    let before = coordinator.tasks();

    store.fail_writes.store(true, Ordering::SeqCst);
    assert_eq!(coordinator.add("lost", "d").await, None);
    assert_eq!(
        coordinator.toggle_completed(id).await,
        MutationOutcome::Failed
    );
    assert_eq!(
        coordinator.update(id, TaskPatch::title("lost")).await,
        MutationOutcome::Failed
    );
    assert!(!coordinator.delete(id).await);

    assert_eq!(coordinator.tasks(), before);
    assert_eq!(store.inner.get_all().await.unwrap(), before);
}

#[tokio::test]
async fn unavailable_store_starts_with_empty_list() {
    let dir = tempfile::tempdir().unwrap();
    let blocker = dir.path().join("blocker");
    std::fs::write(&blocker, b"file").unwrap();
    let store = Arc::new(SqliteTaskStore::new(tasknest_core::StoreConfig::file(
        blocker.join("tasks.db"),
    )));

    let coordinator = TaskCoordinator::start(store).await;
    assert!(coordinator.tasks().is_empty());
    assert_eq!(coordinator.add("never stored", "d").await, None);
}

#[tokio::test]
async fn lookup_failure_is_reported_apart_from_missing_task() {
    let store = Arc::new(FlakyStore::new());
    let coordinator = TaskCoordinator::start(store.clone()).await;
    let id = coordinator.add("present", "d").await.unwrap();

    store.fail_reads.store(true, Ordering::SeqCst);
    assert_eq!(
        coordinator.update(id, TaskPatch::title("x")).await,
        MutationOutcome::Failed
    );
    assert_eq!(
        coordinator.toggle_completed(id).await,
        MutationOutcome::Failed
    );

    store.fail_reads.store(false, Ordering::SeqCst);
    assert_eq!(
        coordinator.update(Uuid::new_v4(), TaskPatch::title("x")).await,
        MutationOutcome::NotFound
    );
    assert_eq!(store.inner.get(id).await.unwrap().unwrap().title, "present");
}
