// Task Domain Model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Task ID, assigned by the server and never reused
pub type TaskId = u64;

/// Task Status as reported by the engine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskStatus {
    Enqueued,
    Processing,
    Succeeded,
    Failed,
    Canceled,
}

impl TaskStatus {
    /// Terminal states never revert to a non-terminal one
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            TaskStatus::Succeeded | TaskStatus::Failed | TaskStatus::Canceled
        )
    }

    pub fn is_success(&self) -> bool {
        *self == TaskStatus::Succeeded
    }

    pub fn is_failure(&self) -> bool {
        *self == TaskStatus::Failed
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TaskStatus::Enqueued => "enqueued",
            TaskStatus::Processing => "processing",
            TaskStatus::Succeeded => "succeeded",
            TaskStatus::Failed => "failed",
            TaskStatus::Canceled => "canceled",
        }
    }
}

impl std::fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Kind of mutation a task performs (observability only)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TaskKind {
    IndexCreation,
    IndexUpdate,
    IndexDeletion,
    IndexSwap,
    DocumentAdditionOrUpdate,
    DocumentDeletion,
    DocumentEdition,
    SettingsUpdate,
    DumpCreation,
    SnapshotCreation,
    TaskCancelation,
    TaskDeletion,
    #[serde(other)]
    Unknown,
}

impl TaskKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskKind::IndexCreation => "indexCreation",
            TaskKind::IndexUpdate => "indexUpdate",
            TaskKind::IndexDeletion => "indexDeletion",
            TaskKind::IndexSwap => "indexSwap",
            TaskKind::DocumentAdditionOrUpdate => "documentAdditionOrUpdate",
            TaskKind::DocumentDeletion => "documentDeletion",
            TaskKind::DocumentEdition => "documentEdition",
            TaskKind::SettingsUpdate => "settingsUpdate",
            TaskKind::DumpCreation => "dumpCreation",
            TaskKind::SnapshotCreation => "snapshotCreation",
            TaskKind::TaskCancelation => "taskCancelation",
            TaskKind::TaskDeletion => "taskDeletion",
            TaskKind::Unknown => "unknown",
        }
    }
}

impl std::fmt::Display for TaskKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Immediate response of a mutating call: the task was accepted, not done.
///
/// Fields are read-only once decoded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskDescriptor {
    #[serde(alias = "uid", alias = "id")]
    task_uid: TaskId,
    #[serde(default)]
    index_uid: Option<String>,
    status: TaskStatus,
    #[serde(rename = "type")]
    kind: TaskKind,
    enqueued_at: DateTime<Utc>,
}

impl TaskDescriptor {
    pub fn new(
        task_uid: TaskId,
        index_uid: Option<String>,
        kind: TaskKind,
        enqueued_at: DateTime<Utc>,
    ) -> Self {
        Self {
            task_uid,
            index_uid,
            status: TaskStatus::Enqueued,
            kind,
            enqueued_at,
        }
    }

    pub fn task_uid(&self) -> TaskId {
        self.task_uid
    }

    pub fn index_uid(&self) -> Option<&str> {
        self.index_uid.as_deref()
    }

    pub fn status(&self) -> TaskStatus {
        self.status
    }

    pub fn kind(&self) -> TaskKind {
        self.kind
    }

    pub fn enqueued_at(&self) -> DateTime<Utc> {
        self.enqueued_at
    }
}

impl From<TaskDescriptor> for TaskId {
    fn from(descriptor: TaskDescriptor) -> Self {
        descriptor.task_uid
    }
}

impl From<&TaskDescriptor> for TaskId {
    fn from(descriptor: &TaskDescriptor) -> Self {
        descriptor.task_uid
    }
}

/// Error detail attached to a failed task
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskError {
    pub message: String,
    pub code: String,
    #[serde(rename = "type")]
    pub error_type: String,
    #[serde(default)]
    pub link: Option<String>,
}

/// Snapshot of a task as reported by `GET /tasks/{id}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskRecord {
    #[serde(alias = "taskUid", alias = "id")]
    pub uid: TaskId,
    #[serde(default)]
    pub index_uid: Option<String>,
    pub status: TaskStatus,
    #[serde(rename = "type")]
    pub kind: TaskKind,
    #[serde(default)]
    pub canceled_by: Option<TaskId>,
    #[serde(default)]
    pub details: Option<serde_json::Value>,
    #[serde(default)]
    pub error: Option<TaskError>,
    #[serde(default)]
    pub duration: Option<String>,
    pub enqueued_at: DateTime<Utc>,
    #[serde(default)]
    pub started_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub finished_at: Option<DateTime<Utc>>,
}

impl TaskRecord {
    pub fn is_terminal(&self) -> bool {
        self.status.is_terminal()
    }

    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }

    pub fn is_failure(&self) -> bool {
        self.status.is_failure()
    }
}

impl From<TaskRecord> for TaskId {
    fn from(record: TaskRecord) -> Self {
        record.uid
    }
}

impl From<&TaskRecord> for TaskId {
    fn from(record: &TaskRecord) -> Self {
        record.uid
    }
}
