//! Core value types shared by every qsa crate: tasks, execution results,
//! executor kinds and the typed error taxonomy.

pub mod error;
pub mod result;
pub mod task;
pub mod types;

pub use error::AppError;
pub use result::{ExecutionResult, Metadata, labels};
pub use task::{Task, TaskBuilder, estimate_tokens};
pub use types::{ExecutorKind, OutputFormat};
