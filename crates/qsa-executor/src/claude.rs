use anyhow::Result;
use async_trait::async_trait;
use qsa_core::{ExecutionResult, Task, labels};

use crate::CodeExecutor;

const PREVIEW_CHARS: usize = 100;

/// Universal fallback: accepts every task and always succeeds.
#[derive(Debug, Default, Clone, Copy)]
pub struct ClaudeExecutor;

impl ClaudeExecutor {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl CodeExecutor for ClaudeExecutor {
    fn name(&self) -> &str {
        labels::CLAUDE
    }

    fn can_handle(&self, _task: &Task) -> bool {
        true
    }

    async fn health_check(&self) -> bool {
        true
    }

    async fn execute(&self, task: &Task) -> Result<ExecutionResult> {
        let preview: String = task.content().chars().take(PREVIEW_CHARS).collect();
        Ok(
            ExecutionResult::success(format!("Claude processed: {preview}..."), labels::CLAUDE)
                .with_metadata("token_count", task.estimated_tokens()),
        )
    }
}
