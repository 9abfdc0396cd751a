//! Text rendering and user feedback.

use tasknest_core::{Task, TaskFilter};

pub const TASK_ADDED: &str = "Task added successfully";
pub const TASK_UPDATED: &str = "Task updated successfully";
pub const TASK_DELETED: &str = "Task deleted successfully";
pub const TASK_NOT_FOUND: &str = "Task not found";
pub const DELETE_PROMPT: &str = "Are you sure you want to delete this task? [y/N] ";

/// Feedback for a toggle, derived from the flag captured before the toggle.
pub fn toggle_feedback(was_completed: bool) -> &'static str {
    if was_completed {
        "Task marked as incomplete"
    } else {
        "Task marked as complete"
    }
}

/// Title and hint shown when the filtered list is empty.
pub fn empty_state(filter: TaskFilter) -> (&'static str, &'static str) {
    match filter {
        TaskFilter::All => ("No tasks found", "Add a new task to get started"),
        TaskFilter::Active => (
            "No active tasks",
            "All tasks are completed or you need to add new tasks",
        ),
        TaskFilter::Completed => (
            "No completed tasks",
            "Mark some tasks as completed to see them here",
        ),
    }
}

pub fn render_task(task: &Task) -> String {
    let marker = if task.completed { "[x]" } else { "[ ]" };
    let (label, stamp) = if task.was_updated() {
        ("Updated", task.updated_at)
    } else {
        ("Created", task.created_at)
    };
    format!(
        "{marker} {}  {}\n    {}\n    {label}: {}",
        task.id,
        task.title,
        task.description,
        stamp.format("%Y-%m-%d %H:%M")
    )
}

pub fn is_confirmation(answer: &str) -> bool {
    matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes")
}
