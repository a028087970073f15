// Domain Layer

pub mod options;
pub mod task;

pub use options::WaitOptions;
pub use task::{TaskDescriptor, TaskError, TaskId, TaskKind, TaskRecord, TaskStatus};
