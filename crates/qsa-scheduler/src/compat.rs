//! String-in, string-out entry point for callers that predate the scheduler.

use qsa_config::{QwenConfig, integration_enabled_from_env};
use qsa_core::{ExecutionResult, ExecutorKind, Task};
use qsa_executor::{ClaudeExecutor, CodeExecutor, QwenExecutor};

use crate::TaskScheduler;

/// Prepended to the output of a failed request.
pub const FAILURE_PREFIX: &str = "处理失败: ";

/// Instantiate executors in the given priority order.
pub fn build_executors(
    kinds: &[ExecutorKind],
    config: QwenConfig,
    enabled: bool,
) -> Vec<Box<dyn CodeExecutor>> {
    kinds
        .iter()
        .map(|kind| -> Box<dyn CodeExecutor> {
            match kind {
                ExecutorKind::Qwen => Box::new(QwenExecutor::new(config.clone(), enabled)),
                ExecutorKind::Claude => Box::new(ClaudeExecutor::new()),
            }
        })
        .collect()
}

/// Build the task for a raw user request, tagged `source = "user_request"`.
pub fn user_task(input: &str, context_files: Option<Vec<String>>) -> Task {
    Task::builder(input)
        .context_files(context_files.unwrap_or_default())
        .meta("source", "user_request")
        .build()
}

/// The result's output on success, otherwise the output behind [`FAILURE_PREFIX`].
pub fn render_for_user(result: &ExecutionResult) -> String {
    if result.success {
        result.output.clone()
    } else {
        format!("{FAILURE_PREFIX}{}", result.output)
    }
}

/// Route a single request with the enablement flag taken from the environment
/// and config from `~/.claude/qwen-config.json`.
pub async fn process_user_request(input: &str, context_files: Option<Vec<String>>) -> String {
    process_user_request_with(input, context_files, integration_enabled_from_env(), None).await
}

/// [`process_user_request`] with the flag and config supplied by the caller.
///
/// When `config` is `None` and the integration is enabled, the config file is
/// loaded (falling back to defaults).
pub async fn process_user_request_with(
    input: &str,
    context_files: Option<Vec<String>>,
    enabled: bool,
    config: Option<QwenConfig>,
) -> String {
    let config = match config {
        Some(config) => config,
        None if enabled => QwenConfig::load_or_default(),
        None => QwenConfig::default(),
    };
    let task = user_task(input, context_files);
    let mut scheduler = TaskScheduler::standard(config, enabled);
    let result = scheduler.route_task(&task).await;
    render_for_user(&result)
}
