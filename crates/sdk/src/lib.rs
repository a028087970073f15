//! SearchLink SDK - Rust Client Library
//!
//! Typed client for a Meilisearch-compatible search engine. Every mutating
//! call returns a [`TaskDescriptor`]; the engine applies it asynchronously
//! and [`SearchClient::wait_for_task`] polls until it is done.
//!
//! # Example
//!
//! ```no_run
//! use searchlink_sdk::{ClientConfig, SearchClient, SearchQuery};
//! use serde_json::{json, Value};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = SearchClient::connect(ClientConfig::from_env()?)?;
//!     let movies = client.index("movies");
//!
//!     let task = movies
//!         .add_documents(&[json!({"id": 1, "title": "Carol"})], Some("id"))
//!         .await?;
//!     let record = task.wait(&client, None).await?;
//!     if let Some(error) = record.error {
//!         eprintln!("indexing failed: {}", error.message);
//!     }
//!
//!     let results = movies.search::<Value>(&SearchQuery::new("carol")).await?;
//!     println!("{} hits", results.hits.len());
//!     Ok(())
//! }
//! ```

mod client;
mod config;
mod index;
mod query;
mod types;

pub use client::SearchClient;
pub use config::{ClientConfig, DEFAULT_HOST};
pub use index::Index;
pub use types::{
    DocumentsQuery, GlobalStats, Health, IndexInfo, IndexStats, Key, KeyRequest, KeyUpdate,
    ListQuery, Page, SearchQuery, SearchResults, SwapIndexes, TasksPage, TasksQuery, Version,
};

pub use searchlink_core::application::{cancel_channel, CancelHandle, CancelToken, TaskWaiter};
pub use searchlink_core::domain::{
    TaskDescriptor, TaskError, TaskId, TaskKind, TaskRecord, TaskStatus, WaitOptions,
};
pub use searchlink_core::error::{ClientError, Result};
pub use searchlink_core::port::{Method, RawResponse, Transport};
