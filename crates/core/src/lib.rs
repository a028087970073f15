// SearchLink Core - Domain, Ports & the task-completion protocol
// NO HTTP client dependency: transports plug in through `port::Transport`

pub mod application;
pub mod domain;
pub mod error;
pub mod port;

pub use application::{cancel_channel, CancelHandle, CancelToken, TaskPoller, TaskWaiter};
pub use domain::{TaskDescriptor, TaskError, TaskId, TaskKind, TaskRecord, TaskStatus, WaitOptions};
pub use error::{ClientError, Result};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
