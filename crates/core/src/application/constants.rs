// Task protocol constants (no magic values)
use std::time::Duration;

/// Default wall-clock budget for waiting on a task (5s)
pub const DEFAULT_WAIT_TIMEOUT: Duration = Duration::from_secs(5);

/// Default delay between two status fetches (500ms)
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(500);

/// Collection path of the task endpoint
pub const TASKS_PATH: &str = "/tasks";

/// Path of a single task
pub fn task_path(task_id: crate::domain::TaskId) -> String {
    format!("{}/{}", TASKS_PATH, task_id)
}
