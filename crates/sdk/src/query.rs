//! Path and query-string helpers

use crate::types::{DocumentsQuery, ListQuery, TasksQuery};
use url::form_urlencoded;

/// Percent-encode one caller-supplied path segment
pub(crate) fn segment(raw: &str) -> String {
    urlencoding::encode(raw).into_owned()
}

/// Append `pairs` to `path` as a query string (nothing if empty)
pub(crate) fn with_query(path: &str, pairs: &[(&str, String)]) -> String {
    if pairs.is_empty() {
        return path.to_string();
    }
    let mut serializer = form_urlencoded::Serializer::new(String::new());
    for (name, value) in pairs {
        serializer.append_pair(name, value);
    }
    format!("{}?{}", path, serializer.finish())
}

fn join<T: ToString>(values: &[T]) -> String {
    values
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(",")
}

pub(crate) fn list_pairs(query: &ListQuery) -> Vec<(&'static str, String)> {
    let mut pairs = Vec::new();
    if let Some(offset) = query.offset {
        pairs.push(("offset", offset.to_string()));
    }
    if let Some(limit) = query.limit {
        pairs.push(("limit", limit.to_string()));
    }
    pairs
}

pub(crate) fn documents_pairs(query: &DocumentsQuery) -> Vec<(&'static str, String)> {
    let mut pairs = list_pairs(&ListQuery {
        offset: query.offset,
        limit: query.limit,
    });
    if !query.fields.is_empty() {
        pairs.push(("fields", query.fields.join(",")));
    }
    pairs
}

pub(crate) fn tasks_pairs(query: &TasksQuery) -> Vec<(&'static str, String)> {
    let mut pairs = Vec::new();
    if !query.uids.is_empty() {
        pairs.push(("uids", join(&query.uids)));
    }
    if !query.statuses.is_empty() {
        pairs.push(("statuses", join(&query.statuses)));
    }
    if !query.types.is_empty() {
        pairs.push(("types", join(&query.types)));
    }
    if !query.index_uids.is_empty() {
        pairs.push(("indexUids", query.index_uids.join(",")));
    }
    if let Some(limit) = query.limit {
        pairs.push(("limit", limit.to_string()));
    }
    if let Some(from) = query.from {
        pairs.push(("from", from.to_string()));
    }
    pairs
}

#[cfg(test)]
mod tests {
    use super::*;
    use searchlink_core::domain::{TaskKind, TaskStatus};

    #[test]
    fn test_segment_encodes_reserved_characters() {
        assert_eq!(segment("movies"), "movies");
        assert_eq!(segment("a/b c"), "a%2Fb%20c");
    }

    #[test]
    fn test_empty_query_leaves_path() {
        assert_eq!(with_query("/indexes", &[]), "/indexes");
    }

    #[test]
    fn test_tasks_query_string() {
        let query = TasksQuery::new()
            .with_statuses([TaskStatus::Enqueued, TaskStatus::Processing])
            .with_types([TaskKind::SettingsUpdate])
            .with_index_uids(["movies"])
            .with_limit(20);

        let path = with_query("/tasks", &tasks_pairs(&query));
        assert_eq!(
            path,
            "/tasks?statuses=enqueued%2Cprocessing&types=settingsUpdate&indexUids=movies&limit=20"
        );
    }

    #[test]
    fn test_documents_query_string() {
        let query = DocumentsQuery::new()
            .with_limit(2)
            .with_fields(["id", "title"]);

        let path = with_query("/indexes/movies/documents", &documents_pairs(&query));
        assert_eq!(path, "/indexes/movies/documents?limit=2&fields=id%2Ctitle");
    }
}
