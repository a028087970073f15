//! Shared fixtures for the SearchLink integration tests

use searchlink_sdk::{ClientConfig, SearchClient, WaitOptions};
use std::time::Duration;

pub const MASTER_KEY: &str = "integration-master-key";

/// Client pointed at a mock server, polling fast enough for tests
pub fn client_for(server: &mockito::ServerGuard) -> SearchClient {
    let config = ClientConfig::new(server.url())
        .with_api_key(MASTER_KEY)
        .with_request_timeout(Duration::from_secs(5))
        .with_wait_options(fast_wait());
    SearchClient::connect(config).expect("client config is valid")
}

/// 2s budget, 20ms between polls
pub fn fast_wait() -> WaitOptions {
    WaitOptions::new(Duration::from_secs(2), Duration::from_millis(20))
}

pub fn enqueued(task_uid: u64, index_uid: &str, kind: &str) -> String {
    serde_json::json!({
        "taskUid": task_uid,
        "indexUid": index_uid,
        "status": "enqueued",
        "type": kind,
        "enqueuedAt": "2024-03-01T10:00:00.000000Z"
    })
    .to_string()
}

pub fn task(task_uid: u64, status: &str) -> String {
    let mut body = serde_json::json!({
        "uid": task_uid,
        "indexUid": "movies",
        "status": status,
        "type": "documentAdditionOrUpdate",
        "canceledBy": null,
        "details": {"receivedDocuments": 2, "indexedDocuments": null},
        "error": null,
        "duration": null,
        "enqueuedAt": "2024-03-01T10:00:00.000000Z",
        "startedAt": null,
        "finishedAt": null
    });
    if status != "enqueued" {
        body["startedAt"] = "2024-03-01T10:00:00.100000Z".into();
    }
    if matches!(status, "succeeded" | "failed" | "canceled") {
        body["finishedAt"] = "2024-03-01T10:00:00.200000Z".into();
        body["duration"] = "PT0.1S".into();
    }
    if status == "failed" {
        body["error"] = serde_json::json!({
            "message": "Document doesn't have a `id` attribute: `{\"title\":\"Carol\"}`.",
            "code": "missing_document_id",
            "type": "invalid_request",
            "link": "https://docs.meilisearch.com/errors#missing_document_id"
        });
    }
    body.to_string()
}
