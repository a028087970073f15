//! Index handle: documents, search, settings

use crate::client::SearchClient;
use crate::query::{documents_pairs, segment, with_query};
use crate::types::{DocumentsQuery, IndexInfo, IndexStats, Page, SearchQuery, SearchResults};
use searchlink_core::domain::{TaskDescriptor, TaskId, TaskRecord, WaitOptions};
use searchlink_core::error::Result;
use searchlink_core::port::Method;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fmt::Display;

/// Operations scoped to one index
///
/// Created with [`SearchClient::index`]; holds the uid and a client clone.
#[derive(Clone)]
pub struct Index {
    uid: String,
    client: SearchClient,
}

impl Index {
    pub(crate) fn new(uid: impl Into<String>, client: SearchClient) -> Self {
        Self {
            uid: uid.into(),
            client,
        }
    }

    pub fn uid(&self) -> &str {
        &self.uid
    }

    fn path(&self, suffix: &str) -> String {
        format!("/indexes/{}{}", segment(&self.uid), suffix)
    }

    fn documents_path(&self, primary_key: Option<&str>) -> String {
        let base = self.path("/documents");
        match primary_key {
            Some(key) => with_query(&base, &[("primaryKey", key.to_string())]),
            None => base,
        }
    }

    pub async fn info(&self) -> Result<IndexInfo> {
        self.client.get_index(&self.uid).await
    }

    pub async fn delete(&self) -> Result<TaskDescriptor> {
        self.client.delete_index(&self.uid).await
    }

    pub async fn stats(&self) -> Result<IndexStats> {
        self.client.call(Method::Get, &self.path("/stats")).await
    }

    // ------------------------------------------------------------------
    // Documents
    // ------------------------------------------------------------------

    /// Add documents, replacing any existing document with the same id
    pub async fn add_documents<T: Serialize>(
        &self,
        documents: &[T],
        primary_key: Option<&str>,
    ) -> Result<TaskDescriptor> {
        self.client
            .call_with(Method::Post, &self.documents_path(primary_key), documents)
            .await
    }

    /// Add documents, merging fields into existing documents
    pub async fn add_or_update_documents<T: Serialize>(
        &self,
        documents: &[T],
        primary_key: Option<&str>,
    ) -> Result<TaskDescriptor> {
        self.client
            .call_with(Method::Put, &self.documents_path(primary_key), documents)
            .await
    }

    pub async fn get_document<T: DeserializeOwned>(&self, id: impl Display) -> Result<T> {
        let path = self.path(&format!("/documents/{}", segment(&id.to_string())));
        self.client.call(Method::Get, &path).await
    }

    pub async fn get_documents<T: DeserializeOwned>(
        &self,
        query: &DocumentsQuery,
    ) -> Result<Page<T>> {
        let path = with_query(&self.path("/documents"), &documents_pairs(query));
        self.client.call(Method::Get, &path).await
    }

    pub async fn delete_document(&self, id: impl Display) -> Result<TaskDescriptor> {
        let path = self.path(&format!("/documents/{}", segment(&id.to_string())));
        self.client.call(Method::Delete, &path).await
    }

    pub async fn delete_documents<I: Serialize>(&self, ids: &[I]) -> Result<TaskDescriptor> {
        self.client
            .call_with(Method::Post, &self.path("/documents/delete-batch"), ids)
            .await
    }

    pub async fn delete_all_documents(&self) -> Result<TaskDescriptor> {
        self.client
            .call(Method::Delete, &self.path("/documents"))
            .await
    }

    // ------------------------------------------------------------------
    // Search
    // ------------------------------------------------------------------

    pub async fn search<T: DeserializeOwned>(&self, query: &SearchQuery) -> Result<SearchResults<T>> {
        self.client
            .call_with(Method::Post, &self.path("/search"), query)
            .await
    }

    // ------------------------------------------------------------------
    // Settings (untyped JSON)
    // ------------------------------------------------------------------

    pub async fn get_settings(&self) -> Result<serde_json::Value> {
        self.client.call(Method::Get, &self.path("/settings")).await
    }

    /// Partial update: only the fields present in `settings` change
    pub async fn update_settings(&self, settings: &serde_json::Value) -> Result<TaskDescriptor> {
        self.client
            .call_with(Method::Patch, &self.path("/settings"), settings)
            .await
    }

    pub async fn reset_settings(&self) -> Result<TaskDescriptor> {
        self.client
            .call(Method::Delete, &self.path("/settings"))
            .await
    }

    // ------------------------------------------------------------------
    // Tasks
    // ------------------------------------------------------------------

    pub async fn wait_for_task(
        &self,
        task: impl Into<TaskId>,
        options: Option<WaitOptions>,
    ) -> Result<TaskRecord> {
        self.client.wait_for_task(task, options).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn index(uid: &str) -> Index {
        let client = SearchClient::connect(crate::ClientConfig::default()).unwrap();
        client.index(uid)
    }

    #[test]
    fn test_paths_encode_uid() {
        let index = index("my movies");
        assert_eq!(index.path("/search"), "/indexes/my%20movies/search");
    }

    #[test]
    fn test_documents_path_with_primary_key() {
        let index = index("movies");
        assert_eq!(index.documents_path(None), "/indexes/movies/documents");
        assert_eq!(
            index.documents_path(Some("movie_id")),
            "/indexes/movies/documents?primaryKey=movie_id"
        );
    }
}
