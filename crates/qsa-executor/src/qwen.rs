//! Qwen executor: prefers the local `qwen-code` tool, falls back to the HTTP
//! endpoint, and reports `service_unavailable` when neither can be used.

use std::path::Path;
use std::time::Duration;

use anyhow::Result;
use async_trait::async_trait;
use qsa_config::{QwenConfig, integration_enabled_from_env};
use qsa_core::{AppError, ExecutionResult, Task, labels};
use serde_json::json;
use tokio::process::Command;
use tracing::{debug, info};

use crate::patterns;
use crate::{CodeExecutor, QwenApiClient};

/// Timeout for both liveness probes (`--version` and `GET /health`).
pub const HEALTH_PROBE_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Clone)]
pub struct QwenExecutor {
    config: QwenConfig,
    enabled: bool,
    api: Option<QwenApiClient>,
    probe_timeout: Duration,
}

impl QwenExecutor {
    /// Create an executor. `enabled` gates eligibility for every task.
    pub fn new(config: QwenConfig, enabled: bool) -> Self {
        let api = match QwenApiClient::from_config(&config) {
            Ok(client) => Some(client),
            Err(e) => {
                debug!(reason = %e, "Qwen API transport disabled");
                None
            }
        };
        Self {
            config,
            enabled,
            api,
            probe_timeout: HEALTH_PROBE_TIMEOUT,
        }
    }

    /// Create an executor with the enablement flag read from `ENABLE_QWEN_INTEGRATION`.
    pub fn from_env(config: QwenConfig) -> Self {
        Self::new(config, integration_enabled_from_env())
    }

    /// Override the liveness probe timeout.
    pub fn with_probe_timeout(mut self, timeout: Duration) -> Self {
        self.probe_timeout = timeout;
        self
    }

    pub fn config(&self) -> &QwenConfig {
        &self.config
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Names of the eligibility rules `task` matches, ignoring the enablement flag.
    pub fn matched_patterns(&self, task: &Task) -> Vec<&'static str> {
        patterns::matching_rules(task)
    }

    /// Whether `<tool_path> --version` exits 0 within the probe timeout.
    pub async fn cli_available(&self) -> bool {
        qsa_process::is_responsive(&self.config.tool_path, self.probe_timeout).await
    }

    /// Whether the remote endpoint is configured and answers `/health` with 200.
    pub async fn api_available(&self) -> bool {
        match &self.api {
            Some(api) => api.is_healthy(self.probe_timeout).await,
            None => false,
        }
    }

    /// Run the task through the local tool.
    pub async fn execute_cli(&self, task: &Task) -> ExecutionResult {
        let argv = cli_argv(&self.config.tool_path, task);
        let command_head: Vec<&str> = argv.iter().take(3).map(String::as_str).collect();
        info!(command = %command_head.join(" "), "Running Qwen CLI");

        let mut cmd = Command::new(&argv[0]);
        cmd.args(&argv[1..]);

        match qsa_process::run_with_timeout(cmd, self.config.timeout()).await {
            Ok(output) if output.exit_code == 0 => {
                ExecutionResult::success(output.output, labels::QWEN_CLI)
                    .with_metadata("command", json!(command_head))
            }
            Ok(output) => ExecutionResult::failure(
                format!("Qwen CLI error: {}", output.stderr_output),
                labels::QWEN_CLI,
            )
            .with_metadata("error_code", output.exit_code),
            Err(e) => match e.downcast_ref::<AppError>() {
                Some(AppError::ToolTimeout { secs, .. }) => ExecutionResult::failure(
                    format!("Qwen CLI timeout after {secs}s"),
                    labels::QWEN_CLI,
                )
                .with_metadata("error", "timeout")
                .with_metadata("timeout_secs", *secs),
                _ => {
                    let message = format!("{e:#}");
                    ExecutionResult::failure(
                        format!("Qwen CLI execution failed: {message}"),
                        labels::QWEN_CLI,
                    )
                    .with_metadata("error", message)
                }
            },
        }
    }
}

/// `[tool, "--task", content, ("--file", path)*]`, keeping only files that exist.
fn cli_argv(tool_path: &str, task: &Task) -> Vec<String> {
    let mut argv = vec![
        tool_path.to_string(),
        "--task".to_string(),
        task.content().to_string(),
    ];
    for file in task.context_files() {
        if Path::new(file).exists() {
            argv.push("--file".to_string());
            argv.push(file.clone());
        } else {
            debug!(file = %file, "Skipping missing context file");
        }
    }
    argv
}

#[async_trait]
impl CodeExecutor for QwenExecutor {
    fn name(&self) -> &str {
        labels::QWEN
    }

    fn can_handle(&self, task: &Task) -> bool {
        self.enabled && patterns::any_rule_matches(task)
    }

    async fn health_check(&self) -> bool {
        self.cli_available().await || self.api_available().await
    }

    async fn execute(&self, task: &Task) -> Result<ExecutionResult> {
        if self.cli_available().await {
            return Ok(self.execute_cli(task).await);
        }
        if let Some(api) = &self.api {
            return Ok(api.execute(task, self.config.timeout()).await);
        }
        Ok(
            ExecutionResult::failure("Qwen service unavailable", labels::QWEN)
                .with_metadata("fallback_reason", "service_unavailable"),
        )
    }
}

#[cfg(test)]
#[path = "qwen_tests.rs"]
mod tests;
