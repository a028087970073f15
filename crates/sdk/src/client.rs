//! SearchLink Client Implementation

use crate::config::ClientConfig;
use crate::index::Index;
use crate::query::{list_pairs, segment, tasks_pairs, with_query};
use crate::types::{
    CreateIndexRequest, GlobalStats, Health, IndexInfo, Key, KeyRequest, KeyUpdate, ListQuery,
    Page, SwapIndexes, TasksPage, TasksQuery, UpdateIndexRequest, Version,
};
use async_trait::async_trait;
use futures::future::try_join_all;
use searchlink_core::application::codec::{decode, encode, expect_success};
use searchlink_core::application::constants::TASKS_PATH;
use searchlink_core::application::{CancelToken, HttpTaskFetcher, TaskPoller, TaskWaiter};
use searchlink_core::domain::{TaskDescriptor, TaskId, TaskRecord, WaitOptions};
use searchlink_core::error::{ClientError, Result};
use searchlink_core::port::{Method, TaskFetcher, Transport};
use searchlink_infra_http::ReqwestTransport;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::sync::Arc;
use tracing::debug;

/// SearchLink Client
///
/// Typed access to the engine's HTTP API. Mutating calls return a
/// [`TaskDescriptor`]; use [`SearchClient::wait_for_task`] to block until
/// the engine has processed it.
///
/// Cloning is cheap and clones share the connection pool.
///
/// # Example
///
/// ```no_run
/// use searchlink_sdk::{ClientConfig, SearchClient};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let client = SearchClient::connect(ClientConfig::new("http://127.0.0.1:7700"))?;
/// let task = client.create_index("movies", Some("id")).await?;
/// let record = client.wait_for_task(&task, None).await?;
/// assert!(record.is_success());
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct SearchClient {
    transport: Arc<dyn Transport>,
    fetcher: Arc<dyn TaskFetcher>,
    poller: TaskPoller,
}

impl SearchClient {
    /// Connect to the engine over HTTP
    ///
    /// # Errors
    /// `InvalidConfig` for a malformed host or API key.
    pub fn connect(config: ClientConfig) -> Result<Self> {
        config.wait.validate()?;
        let transport = ReqwestTransport::new(config.http_config())?;
        Ok(Self::with_transport(Arc::new(transport), config.wait))
    }

    /// Build a client on any transport (custom stacks, tests)
    pub fn with_transport(transport: Arc<dyn Transport>, wait: WaitOptions) -> Self {
        let fetcher: Arc<dyn TaskFetcher> = Arc::new(HttpTaskFetcher::new(transport.clone()));
        Self {
            transport,
            poller: TaskPoller::with_defaults(fetcher.clone(), wait),
            fetcher,
        }
    }

    /// Handle on one index; makes no request
    pub fn index(&self, uid: impl Into<String>) -> Index {
        Index::new(uid, self.clone())
    }

    // ------------------------------------------------------------------
    // Generic request helpers
    // ------------------------------------------------------------------

    async fn send(&self, method: Method, path: &str, body: Option<Vec<u8>>) -> Result<Vec<u8>> {
        debug!(%method, path, "API call");
        let response = self.transport.send(method, path, body).await?;
        expect_success(response)
    }

    pub(crate) async fn call<T: DeserializeOwned>(&self, method: Method, path: &str) -> Result<T> {
        let body = self.send(method, path, None).await?;
        decode(&body)
    }

    pub(crate) async fn call_with<B, T>(&self, method: Method, path: &str, body: &B) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let payload = encode(body)?;
        let body = self.send(method, path, Some(payload)).await?;
        decode(&body)
    }

    async fn call_no_content(&self, method: Method, path: &str) -> Result<()> {
        self.send(method, path, None).await.map(|_| ())
    }

    // ------------------------------------------------------------------
    // Instance
    // ------------------------------------------------------------------

    pub async fn health(&self) -> Result<Health> {
        self.call(Method::Get, "/health").await
    }

    /// `true` if the engine answers `/health` with `available`
    pub async fn is_healthy(&self) -> bool {
        matches!(self.health().await, Ok(health) if health.status == "available")
    }

    pub async fn version(&self) -> Result<Version> {
        self.call(Method::Get, "/version").await
    }

    pub async fn stats(&self) -> Result<GlobalStats> {
        self.call(Method::Get, "/stats").await
    }

    /// Trigger a dump of the whole instance
    pub async fn create_dump(&self) -> Result<TaskDescriptor> {
        self.call(Method::Post, "/dumps").await
    }

    // ------------------------------------------------------------------
    // Indexes
    // ------------------------------------------------------------------

    pub async fn list_indexes(&self, query: &ListQuery) -> Result<Page<IndexInfo>> {
        self.call(Method::Get, &with_query("/indexes", &list_pairs(query)))
            .await
    }

    pub async fn get_index(&self, uid: &str) -> Result<IndexInfo> {
        self.call(Method::Get, &format!("/indexes/{}", segment(uid)))
            .await
    }

    pub async fn create_index(&self, uid: &str, primary_key: Option<&str>) -> Result<TaskDescriptor> {
        let request = CreateIndexRequest { uid, primary_key };
        self.call_with(Method::Post, "/indexes", &request).await
    }

    pub async fn update_index(&self, uid: &str, primary_key: &str) -> Result<TaskDescriptor> {
        let request = UpdateIndexRequest { primary_key };
        self.call_with(Method::Patch, &format!("/indexes/{}", segment(uid)), &request)
            .await
    }

    pub async fn delete_index(&self, uid: &str) -> Result<TaskDescriptor> {
        self.call(Method::Delete, &format!("/indexes/{}", segment(uid)))
            .await
    }

    /// Atomically swap the documents, settings and tasks of index pairs
    pub async fn swap_indexes(&self, pairs: &[(&str, &str)]) -> Result<TaskDescriptor> {
        let body: Vec<SwapIndexes> = pairs
            .iter()
            .map(|(a, b)| SwapIndexes {
                indexes: [a.to_string(), b.to_string()],
            })
            .collect();
        self.call_with(Method::Post, "/swap-indexes", &body).await
    }

    // ------------------------------------------------------------------
    // Tasks
    // ------------------------------------------------------------------

    /// Fetch one task snapshot (no waiting)
    ///
    /// Same read the poller performs on every attempt.
    pub async fn get_task(&self, task: impl Into<TaskId>) -> Result<TaskRecord> {
        self.fetcher.fetch(task.into()).await
    }

    pub async fn get_tasks(&self, query: &TasksQuery) -> Result<TasksPage> {
        self.call(Method::Get, &with_query(TASKS_PATH, &tasks_pairs(query)))
            .await
    }

    /// Cancel enqueued/processing tasks matching `filter`
    ///
    /// # Errors
    /// `InvalidConfig` for an empty filter, which the engine rejects.
    pub async fn cancel_tasks(&self, filter: &TasksQuery) -> Result<TaskDescriptor> {
        require_filter(filter)?;
        let path = with_query(&format!("{}/cancel", TASKS_PATH), &tasks_pairs(filter));
        self.call(Method::Post, &path).await
    }

    /// Delete finished tasks matching `filter` from the history
    pub async fn delete_tasks(&self, filter: &TasksQuery) -> Result<TaskDescriptor> {
        require_filter(filter)?;
        self.call(Method::Delete, &with_query(TASKS_PATH, &tasks_pairs(filter)))
            .await
    }

    /// Wait until a task is `succeeded`, `failed` or `canceled`
    ///
    /// Accepts a task id or a [`TaskDescriptor`]. Without `options` the
    /// client's configured defaults apply (5s / 500ms unless overridden).
    /// A failed task is an `Ok` result; check `record.status`.
    pub async fn wait_for_task(
        &self,
        task: impl Into<TaskId>,
        options: Option<WaitOptions>,
    ) -> Result<TaskRecord> {
        self.poller.wait_for_task(task, options).await
    }

    /// `wait_for_task` that gives up with `Canceled` once `cancel` fires
    pub async fn wait_for_task_with_cancel(
        &self,
        task: impl Into<TaskId>,
        options: Option<WaitOptions>,
        cancel: CancelToken,
    ) -> Result<TaskRecord> {
        self.poller
            .wait_for_task_with_cancel(task, options, cancel)
            .await
    }

    /// Wait for several tasks concurrently; fails on the first error
    ///
    /// Records come back in the order of `tasks`.
    pub async fn wait_for_tasks<I, T>(
        &self,
        tasks: I,
        options: Option<WaitOptions>,
    ) -> Result<Vec<TaskRecord>>
    where
        I: IntoIterator<Item = T>,
        T: Into<TaskId>,
    {
        let waits = tasks
            .into_iter()
            .map(|task| self.poller.wait_for_task(task.into(), options));
        try_join_all(waits).await
    }

    // ------------------------------------------------------------------
    // Keys
    // ------------------------------------------------------------------

    pub async fn get_keys(&self, query: &ListQuery) -> Result<Page<Key>> {
        self.call(Method::Get, &with_query("/keys", &list_pairs(query)))
            .await
    }

    /// Look a key up by uid or by its secret value
    pub async fn get_key(&self, key: &str) -> Result<Key> {
        self.call(Method::Get, &format!("/keys/{}", segment(key)))
            .await
    }

    pub async fn create_key(&self, request: &KeyRequest) -> Result<Key> {
        self.call_with(Method::Post, "/keys", request).await
    }

    pub async fn update_key(&self, key: &str, update: &KeyUpdate) -> Result<Key> {
        self.call_with(Method::Patch, &format!("/keys/{}", segment(key)), update)
            .await
    }

    pub async fn delete_key(&self, key: &str) -> Result<()> {
        self.call_no_content(Method::Delete, &format!("/keys/{}", segment(key)))
            .await
    }
}

fn require_filter(filter: &TasksQuery) -> Result<()> {
    if filter.has_filter() {
        Ok(())
    } else {
        Err(ClientError::InvalidConfig(
            "task filter must name at least one uid, status, type or index".to_string(),
        ))
    }
}

#[async_trait]
impl TaskWaiter for SearchClient {
    async fn wait_for_task_id(
        &self,
        task_id: TaskId,
        options: Option<WaitOptions>,
    ) -> Result<TaskRecord> {
        self.wait_for_task(task_id, options).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use searchlink_core::port::RawResponse;
    use std::collections::VecDeque;
    use std::sync::Mutex;
    use std::time::Duration;
    use tokio_test::{assert_err, assert_ok};

    /// Records every request and answers from a queue
    struct RecordingTransport {
        responses: Mutex<VecDeque<RawResponse>>,
        requests: Mutex<Vec<(Method, String, Option<String>)>>,
    }

    impl RecordingTransport {
        fn new(responses: impl IntoIterator<Item = (u16, &'static str)>) -> Arc<Self> {
            Arc::new(Self {
                responses: Mutex::new(
                    responses
                        .into_iter()
                        .map(|(status, body)| RawResponse::new(status, body.as_bytes().to_vec()))
                        .collect(),
                ),
                requests: Mutex::new(Vec::new()),
            })
        }

        fn requests(&self) -> Vec<(Method, String, Option<String>)> {
            self.requests.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl Transport for RecordingTransport {
        async fn send(
            &self,
            method: Method,
            path: &str,
            body: Option<Vec<u8>>,
        ) -> Result<RawResponse> {
            self.requests.lock().unwrap().push((
                method,
                path.to_string(),
                body.map(|b| String::from_utf8(b).unwrap()),
            ));
            self.responses
                .lock()
                .unwrap()
                .pop_front()
                .ok_or_else(|| ClientError::Transport("no scripted response".to_string()))
        }
    }

    const ENQUEUED: &str = r#"{"taskUid": 3, "indexUid": "movies", "status": "enqueued",
        "type": "indexCreation", "enqueuedAt": "2024-03-01T10:00:00Z"}"#;
    const PROCESSING: &str = r#"{"uid": 3, "indexUid": "movies", "status": "processing",
        "type": "indexCreation", "enqueuedAt": "2024-03-01T10:00:00Z",
        "startedAt": "2024-03-01T10:00:00Z"}"#;
    const SUCCEEDED: &str = r#"{"uid": 3, "indexUid": "movies", "status": "succeeded",
        "type": "indexCreation", "enqueuedAt": "2024-03-01T10:00:00Z",
        "startedAt": "2024-03-01T10:00:00Z", "finishedAt": "2024-03-01T10:00:01Z"}"#;

    fn client(transport: &Arc<RecordingTransport>) -> SearchClient {
        SearchClient::with_transport(transport.clone(), WaitOptions::default())
    }

    #[tokio::test(start_paused = true)]
    async fn test_create_index_then_wait() {
        let transport = RecordingTransport::new([
            (202, ENQUEUED),
            (200, PROCESSING),
            (200, SUCCEEDED),
        ]);
        let client = client(&transport);

        let task = assert_ok!(client.create_index("movies", Some("id")).await);
        let record = assert_ok!(task.wait(&client, None).await);

        assert!(record.is_success());
        let requests = transport.requests();
        assert_eq!(requests.len(), 3);
        assert_eq!(requests[0].0, Method::Post);
        assert_eq!(requests[0].1, "/indexes");
        assert_eq!(
            requests[0].2.as_deref(),
            Some(r#"{"uid":"movies","primaryKey":"id"}"#)
        );
        assert_eq!(requests[1].1, "/tasks/3");
        assert_eq!(requests[2].1, "/tasks/3");
    }

    #[tokio::test(start_paused = true)]
    async fn test_wait_uses_configured_defaults() {
        let transport = RecordingTransport::new(std::iter::repeat((200, PROCESSING)).take(10));
        let wait = WaitOptions::new(Duration::from_secs(1), Duration::from_millis(500));
        let client = SearchClient::with_transport(transport.clone(), wait);

        let err = assert_err!(client.wait_for_task(3u64, None).await);

        assert!(matches!(err, ClientError::Timeout(t) if t == Duration::from_secs(1)));
        assert_eq!(transport.requests().len(), 3);
    }

    #[tokio::test]
    async fn test_get_task_reads_task_endpoint() {
        let transport = RecordingTransport::new([(200, SUCCEEDED), (202, ENQUEUED)]);
        let client = client(&transport);

        let record = assert_ok!(client.get_task(3u64).await);
        assert_eq!(record.uid, 3);
        assert!(record.is_success());

        let requests = transport.requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].0, Method::Get);
        assert_eq!(requests[0].1, "/tasks/3");
        assert_eq!(requests[0].2, None);
    }

    #[tokio::test]
    async fn test_get_task_not_found() {
        let transport = RecordingTransport::new([(
            404,
            r#"{"message":"Task `5` not found.","code":"task_not_found","type":"invalid_request"}"#,
        )]);

        let err = assert_err!(client(&transport).get_task(5u64).await);
        assert!(matches!(err, ClientError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_cancel_tasks_requires_filter() {
        let transport = RecordingTransport::new([]);

        let err = assert_err!(client(&transport).cancel_tasks(&TasksQuery::new()).await);

        assert!(matches!(err, ClientError::InvalidConfig(_)));
        assert!(transport.requests().is_empty());
    }

    #[tokio::test]
    async fn test_delete_key_accepts_empty_body() {
        let transport = RecordingTransport::new([(204, "")]);

        assert_ok!(client(&transport).delete_key("6062abda").await);

        let requests = transport.requests();
        assert_eq!(requests[0].0, Method::Delete);
        assert_eq!(requests[0].1, "/keys/6062abda");
    }

    #[tokio::test]
    async fn test_swap_indexes_body() {
        let transport = RecordingTransport::new([(
            202,
            r#"{"taskUid": 9, "indexUid": null, "status": "enqueued",
                "type": "indexSwap", "enqueuedAt": "2024-03-01T10:00:00Z"}"#,
        )]);

        let task = assert_ok!(
            client(&transport)
                .swap_indexes(&[("movies", "movies_new")])
                .await
        );

        assert_eq!(task.task_uid(), 9);
        assert_eq!(
            transport.requests()[0].2.as_deref(),
            Some(r#"[{"indexes":["movies","movies_new"]}]"#)
        );
    }

    #[tokio::test]
    async fn test_is_healthy() {
        let up = RecordingTransport::new([(200, r#"{"status":"available"}"#)]);
        let down = RecordingTransport::new([]);

        assert!(client(&up).is_healthy().await);
        assert!(!client(&down).is_healthy().await);
    }
}
