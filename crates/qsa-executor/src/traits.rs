use anyhow::Result;
use async_trait::async_trait;
use qsa_core::{ExecutionResult, Task};

/// Capability shared by every executor the scheduler can route to.
///
/// `execute` reports ordinary failures as `success == false` results. An `Err`
/// (or a panic) from any method is treated by the scheduler as a hard failure
/// of that executor.
#[async_trait]
pub trait CodeExecutor: Send + Sync {
    /// Short name used in logs.
    fn name(&self) -> &str;

    /// Whether this executor is suited to `task`. Must not perform I/O.
    fn can_handle(&self, task: &Task) -> bool;

    /// Liveness probe. Returns `false` rather than erroring.
    async fn health_check(&self) -> bool;

    /// Perform the task.
    async fn execute(&self, task: &Task) -> Result<ExecutionResult>;
}
