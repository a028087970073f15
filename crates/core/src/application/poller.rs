// Task Poller - waits for an enqueued task to reach a terminal state

use crate::application::cancel::CancelToken;
use crate::domain::{TaskDescriptor, TaskId, TaskRecord, WaitOptions};
use crate::error::{ClientError, Result};
use crate::port::TaskFetcher;
use async_trait::async_trait;
use std::sync::Arc;
use tokio::time::{sleep, Instant};
use tracing::{debug, info, warn};

/// Polls the task endpoint until a task is done
///
/// Holds no mutable state: every wait owns its own start time and last
/// snapshot, so one poller can serve any number of concurrent waits.
#[derive(Clone)]
pub struct TaskPoller {
    fetcher: Arc<dyn TaskFetcher>,
    defaults: WaitOptions,
}

impl TaskPoller {
    /// Create a poller using the default wait options (5s / 500ms)
    pub fn new(fetcher: Arc<dyn TaskFetcher>) -> Self {
        Self::with_defaults(fetcher, WaitOptions::default())
    }

    /// Create a poller with caller-chosen defaults for omitted options
    pub fn with_defaults(fetcher: Arc<dyn TaskFetcher>, defaults: WaitOptions) -> Self {
        Self { fetcher, defaults }
    }

    pub fn defaults(&self) -> WaitOptions {
        self.defaults
    }

    /// Wait for a task given its id or its descriptor
    ///
    /// A `failed` task is returned as `Ok`: the wait succeeded, the task
    /// did not. Inspect `record.status` / `record.error`.
    ///
    /// # Errors
    /// - ClientError::Timeout if the task is still pending after `timeout`
    /// - any fetch error, unretried
    /// - ClientError::InvalidConfig for a zero poll interval
    pub async fn wait_for_task(
        &self,
        task: impl Into<TaskId>,
        options: Option<WaitOptions>,
    ) -> Result<TaskRecord> {
        let options = options.unwrap_or(self.defaults);
        options.validate()?;
        self.poll_until_terminal(task.into(), &options, None).await
    }

    /// Same as `wait_for_task`, aborting with `Canceled` once `cancel` fires
    pub async fn wait_for_task_with_cancel(
        &self,
        task: impl Into<TaskId>,
        options: Option<WaitOptions>,
        cancel: CancelToken,
    ) -> Result<TaskRecord> {
        let options = options.unwrap_or(self.defaults);
        options.validate()?;
        self.poll_until_terminal(task.into(), &options, Some(cancel))
            .await
    }

    /// The poll loop
    ///
    /// 1. fetch (errors propagate at once, no retry)
    /// 2. terminal status -> return the record
    /// 3. elapsed >= timeout -> `Timeout`
    /// 4. sleep `interval`, repeat
    ///
    /// The timeout is checked after the fetch, so at least one status read
    /// happens even with a zero timeout.
    pub async fn poll_until_terminal(
        &self,
        task_id: TaskId,
        options: &WaitOptions,
        mut cancel: Option<CancelToken>,
    ) -> Result<TaskRecord> {
        let started = Instant::now();
        let mut attempt: u32 = 0;

        loop {
            attempt += 1;

            let record = match cancel.as_mut() {
                Some(token) => {
                    if token.is_canceled() {
                        warn!(task_id, attempt, "Task wait canceled");
                        return Err(ClientError::Canceled { task_id });
                    }
                    tokio::select! {
                        fetched = self.fetcher.fetch(task_id) => fetched?,
                        _ = token.cancelled() => {
                            warn!(task_id, attempt, "Task wait canceled during fetch");
                            return Err(ClientError::Canceled { task_id });
                        }
                    }
                }
                None => self.fetcher.fetch(task_id).await?,
            };

            debug!(
                task_id,
                attempt,
                status = %record.status,
                "Observed task status"
            );

            if record.is_terminal() {
                info!(
                    task_id,
                    attempt,
                    status = %record.status,
                    kind = %record.kind,
                    "Task reached terminal state"
                );
                return Ok(record);
            }

            let elapsed = started.elapsed();
            // >= so a zero timeout stops after exactly one fetch
            if elapsed >= options.timeout {
                warn!(
                    task_id,
                    attempt,
                    elapsed_ms = elapsed.as_millis() as u64,
                    timeout_ms = options.timeout.as_millis() as u64,
                    "Timed out waiting for task"
                );
                return Err(ClientError::Timeout(options.timeout));
            }

            match cancel.as_mut() {
                Some(token) => {
                    tokio::select! {
                        _ = sleep(options.interval) => {},
                        _ = token.cancelled() => {
                            warn!(task_id, attempt, "Task wait canceled during sleep");
                            return Err(ClientError::Canceled { task_id });
                        }
                    }
                }
                None => sleep(options.interval).await,
            }
        }
    }
}

/// Anything that can wait for a task on the caller's behalf
#[async_trait]
pub trait TaskWaiter: Send + Sync {
    async fn wait_for_task_id(
        &self,
        task_id: TaskId,
        options: Option<WaitOptions>,
    ) -> Result<TaskRecord>;
}

#[async_trait]
impl TaskWaiter for TaskPoller {
    async fn wait_for_task_id(
        &self,
        task_id: TaskId,
        options: Option<WaitOptions>,
    ) -> Result<TaskRecord> {
        self.wait_for_task(task_id, options).await
    }
}

impl TaskDescriptor {
    /// Wait for this task on `waiter` (a client or a poller)
    pub async fn wait<W: TaskWaiter + ?Sized>(
        &self,
        waiter: &W,
        options: Option<WaitOptions>,
    ) -> Result<TaskRecord> {
        waiter.wait_for_task_id(self.task_uid(), options).await
    }
}
