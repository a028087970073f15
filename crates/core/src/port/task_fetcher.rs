// Task Fetcher Port
// Pure read of one task snapshot; retry policy belongs to the poll loop.

use crate::domain::{TaskId, TaskRecord};
use crate::error::Result;
use async_trait::async_trait;

/// Task Fetcher trait
///
/// Implementations:
/// - HttpTaskFetcher: `GET /tasks/{id}` over a Transport
/// - ScriptedTaskFetcher: replays a status script (tests)
#[async_trait]
pub trait TaskFetcher: Send + Sync {
    /// Fetch the current state of a task
    ///
    /// # Errors
    /// - ClientError::NotFound if the server has no such task
    /// - ClientError::Transport if the network call fails
    /// - ClientError::Decode if the body is not a task
    async fn fetch(&self, task_id: TaskId) -> Result<TaskRecord>;
}

// ============================================================================
// Mock Implementations for Testing
// ============================================================================

pub mod mocks {
    use super::*;
    use crate::domain::{TaskKind, TaskStatus};
    use crate::error::ClientError;
    use std::collections::VecDeque;
    use std::sync::{Arc, Mutex};

    /// One scripted answer
    #[derive(Debug, Clone)]
    pub enum FetchStep {
        /// Report the task in this status
        Status(TaskStatus),
        /// Fail the fetch with a transport error
        TransportFailure(String),
        /// Report the task as missing
        Missing,
        /// Never answer, like a request stuck on the network
        Hang,
    }

    /// Build a task snapshot in the given status
    pub fn record(task_id: TaskId, status: TaskStatus) -> TaskRecord {
        let now = chrono::Utc::now();
        let error = if status == TaskStatus::Failed {
            Some(crate::domain::TaskError {
                message: "Index `movies` not found.".to_string(),
                code: "index_not_found".to_string(),
                error_type: "invalid_request".to_string(),
                link: None,
            })
        } else {
            None
        };
        TaskRecord {
            uid: task_id,
            index_uid: Some("movies".to_string()),
            status,
            kind: TaskKind::DocumentAdditionOrUpdate,
            canceled_by: None,
            details: None,
            error,
            duration: None,
            enqueued_at: now,
            started_at: (status != TaskStatus::Enqueued).then_some(now),
            finished_at: status.is_terminal().then_some(now),
        }
    }

    /// Scripted Task Fetcher
    ///
    /// Answers with the script in order; once exhausted it keeps repeating
    /// the last step (or `processing` for an empty script).
    pub struct ScriptedTaskFetcher {
        script: Arc<Mutex<VecDeque<FetchStep>>>,
        last: Arc<Mutex<FetchStep>>,
        call_count: Arc<Mutex<usize>>,
    }

    impl ScriptedTaskFetcher {
        pub fn new(steps: impl IntoIterator<Item = FetchStep>) -> Self {
            Self {
                script: Arc::new(Mutex::new(steps.into_iter().collect())),
                last: Arc::new(Mutex::new(FetchStep::Status(TaskStatus::Processing))),
                call_count: Arc::new(Mutex::new(0)),
            }
        }

        /// `processing` for the first `n - 1` calls, then `status`
        pub fn terminal_after(n: usize, status: TaskStatus) -> Self {
            let mut steps = vec![FetchStep::Status(TaskStatus::Processing); n.saturating_sub(1)];
            steps.push(FetchStep::Status(status));
            Self::new(steps)
        }

        /// Never leaves `processing`
        pub fn never_terminal() -> Self {
            Self::new([FetchStep::Status(TaskStatus::Processing)])
        }

        pub fn call_count(&self) -> usize {
            *self.call_count.lock().unwrap()
        }
    }

    #[async_trait]
    impl TaskFetcher for ScriptedTaskFetcher {
        async fn fetch(&self, task_id: TaskId) -> Result<TaskRecord> {
            *self.call_count.lock().unwrap() += 1;

            let step = {
                let mut script = self.script.lock().unwrap();
                let mut last = self.last.lock().unwrap();
                if let Some(next) = script.pop_front() {
                    *last = next;
                }
                last.clone()
            };

            match step {
                FetchStep::Status(status) => Ok(record(task_id, status)),
                FetchStep::TransportFailure(msg) => Err(ClientError::Transport(msg)),
                FetchStep::Missing => Err(ClientError::NotFound(format!(
                    "Task `{}` not found.",
                    task_id
                ))),
                FetchStep::Hang => std::future::pending().await,
            }
        }
    }
}
