// HTTP Task Fetcher - `GET /tasks/{id}` over any Transport

use crate::application::codec::{decode_task_record, expect_success};
use crate::application::constants::task_path;
use crate::domain::{TaskId, TaskRecord};
use crate::error::Result;
use crate::port::{Method, TaskFetcher, Transport};
use async_trait::async_trait;
use std::sync::Arc;
use tracing::trace;

/// Reads task snapshots from the engine
pub struct HttpTaskFetcher {
    transport: Arc<dyn Transport>,
}

impl HttpTaskFetcher {
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self { transport }
    }
}

#[async_trait]
impl TaskFetcher for HttpTaskFetcher {
    async fn fetch(&self, task_id: TaskId) -> Result<TaskRecord> {
        let path = task_path(task_id);
        let response = self.transport.send(Method::Get, &path, None).await?;
        trace!(task_id, status = response.status, "Task status response");

        let body = expect_success(response)?;
        decode_task_record(&body)
    }
}
