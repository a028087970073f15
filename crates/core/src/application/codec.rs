// Codec - JSON bodies in and out, engine error bodies to ClientError

use crate::domain::{TaskDescriptor, TaskRecord};
use crate::error::{ClientError, Result};
use crate::port::RawResponse;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

/// Error body returned by the engine on non-2xx responses
#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    message: String,
    #[serde(default)]
    code: String,
    #[serde(default, rename = "type")]
    error_type: String,
    #[serde(default)]
    link: Option<String>,
}

/// Decode a response body as `T`
pub fn decode<T: DeserializeOwned>(body: &[u8]) -> Result<T> {
    serde_json::from_slice(body).map_err(ClientError::from)
}

/// Encode a request body
pub fn encode<T: Serialize + ?Sized>(value: &T) -> Result<Vec<u8>> {
    serde_json::to_vec(value).map_err(ClientError::from)
}

/// Decode the immediate response of a mutating call
pub fn decode_task_descriptor(body: &[u8]) -> Result<TaskDescriptor> {
    decode(body)
}

/// Decode a task status response
pub fn decode_task_record(body: &[u8]) -> Result<TaskRecord> {
    decode(body)
}

/// Pass 2xx bodies through; turn everything else into a ClientError
///
/// - 404 becomes `NotFound` with the engine's message
/// - other statuses become `Api`, falling back to the raw text when the
///   body is not the engine's error shape
pub fn expect_success(response: RawResponse) -> Result<Vec<u8>> {
    if response.is_success() {
        return Ok(response.body);
    }

    let parsed: Option<ApiErrorBody> = serde_json::from_slice(&response.body).ok();

    if response.status == 404 {
        let message = match parsed {
            Some(body) => body.message,
            None => String::from_utf8_lossy(&response.body).into_owned(),
        };
        return Err(ClientError::NotFound(message));
    }

    Err(match parsed {
        Some(body) => ClientError::Api {
            status: response.status,
            message: body.message,
            code: body.code,
            error_type: body.error_type,
            link: body.link,
        },
        None => ClientError::Api {
            status: response.status,
            message: String::from_utf8_lossy(&response.body).into_owned(),
            code: String::new(),
            error_type: String::new(),
            link: None,
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{TaskKind, TaskStatus};

    #[test]
    fn test_decode_descriptor() {
        let body = br#"{
            "taskUid": 42,
            "indexUid": "movies",
            "status": "enqueued",
            "type": "documentAdditionOrUpdate",
            "enqueuedAt": "2024-03-01T10:00:00.123456Z"
        }"#;

        let descriptor = decode_task_descriptor(body).unwrap();
        assert_eq!(descriptor.task_uid(), 42);
        assert_eq!(descriptor.index_uid(), Some("movies"));
        assert_eq!(descriptor.status(), TaskStatus::Enqueued);
        assert_eq!(descriptor.kind(), TaskKind::DocumentAdditionOrUpdate);
    }

    #[test]
    fn test_decode_descriptor_without_index() {
        let body = br#"{"taskUid": 3, "indexUid": null, "status": "enqueued",
            "type": "dumpCreation", "enqueuedAt": "2024-03-01T10:00:00Z"}"#;

        let descriptor = decode_task_descriptor(body).unwrap();
        assert_eq!(descriptor.index_uid(), None);
        assert_eq!(descriptor.kind(), TaskKind::DumpCreation);
    }

    #[test]
    fn test_decode_failed_record() {
        let body = br#"{
            "uid": 7,
            "indexUid": "movies",
            "status": "failed",
            "type": "indexCreation",
            "canceledBy": null,
            "details": {"primaryKey": null},
            "error": {
                "message": "Index `movies` already exists.",
                "code": "index_already_exists",
                "type": "invalid_request",
                "link": "https://docs.example.com/errors#index_already_exists"
            },
            "duration": "PT0.001S",
            "enqueuedAt": "2024-03-01T10:00:00Z",
            "startedAt": "2024-03-01T10:00:01Z",
            "finishedAt": "2024-03-01T10:00:02Z"
        }"#;

        let record = decode_task_record(body).unwrap();
        assert_eq!(record.uid, 7);
        assert!(record.is_failure());
        assert!(record.is_terminal());
        let error = record.error.unwrap();
        assert_eq!(error.code, "index_already_exists");
        assert_eq!(error.error_type, "invalid_request");
        assert!(record.finished_at.is_some());
    }

    #[test]
    fn test_decode_record_with_unknown_kind() {
        let body = br#"{"uid": 1, "status": "processing", "type": "somethingNew",
            "enqueuedAt": "2024-03-01T10:00:00Z"}"#;

        let record = decode_task_record(body).unwrap();
        assert_eq!(record.kind, TaskKind::Unknown);
        assert_eq!(record.status, TaskStatus::Processing);
        assert!(record.started_at.is_none());
    }

    #[test]
    fn test_decode_rejects_unknown_status() {
        let body = br#"{"uid": 1, "status": "paused", "type": "indexCreation",
            "enqueuedAt": "2024-03-01T10:00:00Z"}"#;

        let result = decode_task_record(body);
        assert!(matches!(result, Err(ClientError::Decode(_))));
    }

    #[test]
    fn test_expect_success_passes_body() {
        let body = expect_success(RawResponse::new(202, b"{}".to_vec())).unwrap();
        assert_eq!(body, b"{}");
    }

    #[test]
    fn test_expect_success_not_found() {
        let response = RawResponse::new(
            404,
            br#"{"message":"Task `9` not found.","code":"task_not_found","type":"invalid_request"}"#
                .to_vec(),
        );

        match expect_success(response) {
            Err(ClientError::NotFound(message)) => assert_eq!(message, "Task `9` not found."),
            other => panic!("expected NotFound, got {:?}", other),
        }
    }

    #[test]
    fn test_expect_success_api_error() {
        let response = RawResponse::new(
            401,
            br#"{"message":"The Authorization header is missing.","code":"missing_authorization_header","type":"auth","link":"https://docs.example.com"}"#
                .to_vec(),
        );

        match expect_success(response) {
            Err(ClientError::Api {
                status,
                code,
                error_type,
                link,
                ..
            }) => {
                assert_eq!(status, 401);
                assert_eq!(code, "missing_authorization_header");
                assert_eq!(error_type, "auth");
                assert!(link.is_some());
            }
            other => panic!("expected Api error, got {:?}", other),
        }
    }

    #[test]
    fn test_expect_success_plain_text_error() {
        let response = RawResponse::new(502, b"Bad Gateway".to_vec());

        match expect_success(response) {
            Err(ClientError::Api { status, message, .. }) => {
                assert_eq!(status, 502);
                assert_eq!(message, "Bad Gateway");
            }
            other => panic!("expected Api error, got {:?}", other),
        }
    }
}
