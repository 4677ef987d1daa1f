//! Priority-ordered routing with fallback.

use std::any::Any;
use std::panic::AssertUnwindSafe;

use anyhow::Result;
use futures::FutureExt;
use qsa_config::QwenConfig;
use qsa_core::{ExecutionResult, ExecutorKind, Task};
use qsa_executor::CodeExecutor;
use tracing::{debug, error, info, warn};

use crate::SchedulerStats;
use crate::compat::build_executors;

/// What happened when one executor was offered a task.
enum Attempt {
    Ineligible,
    Unhealthy,
    Completed(ExecutionResult),
}

/// Routes tasks through an ordered list of executors.
///
/// The first executor that accepts the task, reports healthy and returns a
/// successful result wins. Soft failures, hard failures (`Err` or panic) and
/// skipped executors all fall through to the next entry.
pub struct TaskScheduler {
    executors: Vec<Box<dyn CodeExecutor>>,
    stats: SchedulerStats,
}

impl TaskScheduler {
    /// Executors are tried in the given order.
    pub fn new(executors: Vec<Box<dyn CodeExecutor>>) -> Self {
        Self {
            executors,
            stats: SchedulerStats::default(),
        }
    }

    /// `[Qwen, Claude]` when `enabled`, otherwise `[Claude]`.
    pub fn standard(config: QwenConfig, enabled: bool) -> Self {
        Self::new(build_executors(
            ExecutorKind::default_order(enabled),
            config,
            enabled,
        ))
    }

    pub fn executor_names(&self) -> Vec<&str> {
        self.executors.iter().map(|e| e.name()).collect()
    }

    pub fn stats(&self) -> &SchedulerStats {
        &self.stats
    }

    pub fn status_report(&self) -> String {
        self.stats.status_report()
    }

    /// Route `task` to the first executor that completes it successfully.
    ///
    /// Never fails: exhaustion yields [`ExecutionResult::exhausted`].
    pub async fn route_task(&mut self, task: &Task) -> ExecutionResult {
        self.stats.total_tasks += 1;

        for executor in &self.executors {
            let name = executor.name();
            let outcome = AssertUnwindSafe(attempt(executor.as_ref(), task))
                .catch_unwind()
                .await;

            match outcome {
                Ok(Ok(Attempt::Completed(result))) if result.success => {
                    self.stats.record_success(&result.executor);
                    return result;
                }
                Ok(Ok(Attempt::Completed(result))) => {
                    warn!(executor = %name, output = %result.output, "Executor failed, trying next");
                }
                Ok(Ok(Attempt::Ineligible)) => {
                    debug!(executor = %name, "Executor cannot handle task");
                }
                Ok(Ok(Attempt::Unhealthy)) => {
                    debug!(executor = %name, "Executor unhealthy");
                }
                Ok(Err(e)) => {
                    self.stats.errors += 1;
                    error!(executor = %name, error = %format!("{e:#}"), "Executor raised an error");
                }
                Err(panic) => {
                    self.stats.errors += 1;
                    error!(executor = %name, panic = %panic_message(panic.as_ref()), "Executor panicked");
                }
            }
        }

        self.stats.errors += 1;
        error!(total_executors = self.executors.len(), "All executors failed");
        ExecutionResult::exhausted()
    }
}

async fn attempt(executor: &dyn CodeExecutor, task: &Task) -> Result<Attempt> {
    if !executor.can_handle(task) {
        return Ok(Attempt::Ineligible);
    }
    if !executor.health_check().await {
        return Ok(Attempt::Unhealthy);
    }
    info!(executor = %executor.name(), "Routing task");
    Ok(Attempt::Completed(executor.execute(task).await?))
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "non-string panic payload".to_string()
    }
}

#[cfg(test)]
#[path = "scheduler_tests.rs"]
mod tests;
