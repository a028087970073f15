//! SDK Request/Response Types
//!
//! Mirrors the engine's JSON shapes. Task types live in `searchlink-core`.

use chrono::{DateTime, Utc};
use searchlink_core::domain::{TaskId, TaskKind, TaskRecord, TaskStatus};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use uuid::Uuid;

/// An index as described by `GET /indexes/{uid}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IndexInfo {
    pub uid: String,
    #[serde(default)]
    pub primary_key: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Per-index statistics
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IndexStats {
    pub number_of_documents: u64,
    pub is_indexing: bool,
    #[serde(default)]
    pub field_distribution: HashMap<String, u64>,
}

/// Instance-wide statistics
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GlobalStats {
    pub database_size: u64,
    #[serde(default)]
    pub last_update: Option<DateTime<Utc>>,
    #[serde(default)]
    pub indexes: HashMap<String, IndexStats>,
}

/// Engine build information
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Version {
    pub commit_sha: String,
    pub commit_date: String,
    pub pkg_version: String,
}

/// `GET /health` body
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Health {
    pub status: String,
}

/// Offset/limit page (indexes, documents, keys)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page<T> {
    pub results: Vec<T>,
    pub offset: u64,
    pub limit: u64,
    pub total: u64,
}

/// Cursor page of tasks
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TasksPage {
    pub results: Vec<TaskRecord>,
    pub limit: u32,
    #[serde(default)]
    pub from: Option<TaskId>,
    #[serde(default)]
    pub next: Option<TaskId>,
    #[serde(default)]
    pub total: Option<u64>,
}

/// Offset/limit parameters for list endpoints
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListQuery {
    pub offset: Option<u64>,
    pub limit: Option<u64>,
}

impl ListQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_offset(mut self, offset: u64) -> Self {
        self.offset = Some(offset);
        self
    }

    pub fn with_limit(mut self, limit: u64) -> Self {
        self.limit = Some(limit);
        self
    }
}

/// Parameters for `GET /indexes/{uid}/documents`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DocumentsQuery {
    pub offset: Option<u64>,
    pub limit: Option<u64>,
    /// Restrict returned attributes
    pub fields: Vec<String>,
}

impl DocumentsQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_offset(mut self, offset: u64) -> Self {
        self.offset = Some(offset);
        self
    }

    pub fn with_limit(mut self, limit: u64) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn with_fields<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.fields = fields.into_iter().map(Into::into).collect();
        self
    }
}

/// Task filter: used for listing, canceling and deleting tasks
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TasksQuery {
    pub uids: Vec<TaskId>,
    pub statuses: Vec<TaskStatus>,
    pub types: Vec<TaskKind>,
    pub index_uids: Vec<String>,
    pub limit: Option<u32>,
    pub from: Option<TaskId>,
}

impl TasksQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_uids(mut self, uids: impl IntoIterator<Item = TaskId>) -> Self {
        self.uids = uids.into_iter().collect();
        self
    }

    pub fn with_statuses(mut self, statuses: impl IntoIterator<Item = TaskStatus>) -> Self {
        self.statuses = statuses.into_iter().collect();
        self
    }

    pub fn with_types(mut self, types: impl IntoIterator<Item = TaskKind>) -> Self {
        self.types = types.into_iter().collect();
        self
    }

    pub fn with_index_uids<I, S>(mut self, index_uids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.index_uids = index_uids.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn with_from(mut self, from: TaskId) -> Self {
        self.from = Some(from);
        self
    }

    /// Cancel/delete endpoints refuse an empty filter
    pub fn has_filter(&self) -> bool {
        !self.uids.is_empty()
            || !self.statuses.is_empty()
            || !self.types.is_empty()
            || !self.index_uids.is_empty()
    }
}

/// Body of `POST /indexes/{uid}/search`
///
/// Fields left `None` are omitted from the request.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub q: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub offset: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filter: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attributes_to_retrieve: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub facets: Option<Vec<String>>,
}

impl SearchQuery {
    pub fn new(q: impl Into<String>) -> Self {
        Self {
            q: Some(q.into()),
            ..Self::default()
        }
    }

    pub fn with_limit(mut self, limit: u64) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn with_offset(mut self, offset: u64) -> Self {
        self.offset = Some(offset);
        self
    }

    pub fn with_filter(mut self, filter: impl Into<serde_json::Value>) -> Self {
        self.filter = Some(filter.into());
        self
    }

    pub fn with_sort<I, S>(mut self, sort: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.sort = Some(sort.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_attributes_to_retrieve<I, S>(mut self, attributes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.attributes_to_retrieve = Some(attributes.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_facets<I, S>(mut self, facets: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.facets = Some(facets.into_iter().map(Into::into).collect());
        self
    }
}

/// Search response
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResults<T> {
    pub hits: Vec<T>,
    #[serde(default)]
    pub query: String,
    pub processing_time_ms: u64,
    #[serde(default)]
    pub limit: Option<u64>,
    #[serde(default)]
    pub offset: Option<u64>,
    #[serde(default)]
    pub estimated_total_hits: Option<u64>,
    #[serde(default)]
    pub facet_distribution: Option<serde_json::Value>,
}

/// An API key
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Key {
    pub uid: Uuid,
    pub key: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    pub actions: Vec<String>,
    pub indexes: Vec<String>,
    #[serde(default)]
    pub expires_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Body of `POST /keys`
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct KeyRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub uid: Option<Uuid>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub actions: Vec<String>,
    pub indexes: Vec<String>,
    /// `null` means the key never expires
    pub expires_at: Option<DateTime<Utc>>,
}

impl KeyRequest {
    pub fn new<A, I, S, T>(actions: A, indexes: I) -> Self
    where
        A: IntoIterator<Item = S>,
        S: Into<String>,
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        Self {
            uid: None,
            name: None,
            description: None,
            actions: actions.into_iter().map(Into::into).collect(),
            indexes: indexes.into_iter().map(Into::into).collect(),
            expires_at: None,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_uid(mut self, uid: Uuid) -> Self {
        self.uid = Some(uid);
        self
    }

    pub fn with_expires_at(mut self, expires_at: DateTime<Utc>) -> Self {
        self.expires_at = Some(expires_at);
        self
    }
}

/// Body of `PATCH /keys/{key}`; only name and description are mutable
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct KeyUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// One pair of indexes to swap
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SwapIndexes {
    pub indexes: [String; 2],
}

/// Body of `POST /indexes`
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct CreateIndexRequest<'a> {
    pub uid: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub primary_key: Option<&'a str>,
}

/// Body of `PATCH /indexes/{uid}`
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct UpdateIndexRequest<'a> {
    pub primary_key: &'a str,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_search_query_omits_unset_fields() {
        let query = SearchQuery::new("batman")
            .with_limit(5)
            .with_attributes_to_retrieve(["title"]);

        let value = serde_json::to_value(&query).unwrap();
        assert_eq!(
            value,
            json!({"q": "batman", "limit": 5, "attributesToRetrieve": ["title"]})
        );
    }

    #[test]
    fn test_key_request_keeps_null_expiry() {
        let request = KeyRequest::new(["search"], ["movies"]).with_name("Search key");

        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(
            value,
            json!({
                "name": "Search key",
                "actions": ["search"],
                "indexes": ["movies"],
                "expiresAt": null
            })
        );
    }

    #[test]
    fn test_decode_key() {
        let body = json!({
            "uid": "6062abda-a5aa-4414-ac91-ecd7944c0f8d",
            "key": "d0552b41536279a0ad88bd595327b96f01176a60c2243e906c52ac02375f9bc4",
            "name": null,
            "description": "Search key",
            "actions": ["search"],
            "indexes": ["*"],
            "expiresAt": null,
            "createdAt": "2024-01-01T00:00:00Z",
            "updatedAt": "2024-01-01T00:00:00Z"
        });

        let key: Key = serde_json::from_value(body).unwrap();
        assert_eq!(key.indexes, vec!["*".to_string()]);
        assert!(key.expires_at.is_none());
    }

    #[test]
    fn test_tasks_query_filter_detection() {
        assert!(!TasksQuery::new().with_limit(10).has_filter());
        assert!(TasksQuery::new()
            .with_statuses([TaskStatus::Enqueued])
            .has_filter());
    }
}
