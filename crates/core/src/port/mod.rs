// Port Layer - Interfaces for external dependencies

pub mod task_fetcher;
pub mod transport;

// Re-exports
pub use task_fetcher::TaskFetcher;
pub use transport::{Method, RawResponse, Transport};
