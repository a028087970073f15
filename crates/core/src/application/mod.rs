// Application Layer - the task-completion protocol

pub mod cancel;
pub mod codec;
pub mod constants;
pub mod poller;
pub mod task_fetcher;

pub use cancel::{cancel_channel, CancelHandle, CancelToken};
pub use poller::{TaskPoller, TaskWaiter};
pub use task_fetcher::HttpTaskFetcher;
