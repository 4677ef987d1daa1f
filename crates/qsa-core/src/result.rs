//! Uniform outcome record returned by every executor.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Opaque key/value metadata attached to tasks and results.
pub type Metadata = BTreeMap<String, serde_json::Value>;

/// Executor labels reported in [`ExecutionResult::executor`].
pub mod labels {
    /// Qwen executor when neither transport could be used.
    pub const QWEN: &str = "qwen";
    /// Qwen executor via the local `qwen-code` tool.
    pub const QWEN_CLI: &str = "qwen-cli";
    /// Qwen executor via the remote HTTP endpoint.
    pub const QWEN_API: &str = "qwen-api";
    /// Universal fallback executor.
    pub const CLAUDE: &str = "claude";
    /// Terminal result when every executor was exhausted.
    pub const NONE: &str = "none";
}

/// Outcome of executing a task.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExecutionResult {
    pub success: bool,
    /// Work product on success, human-readable error on failure.
    pub output: String,
    /// Which executor (and access mode) produced this result.
    pub executor: String,
    #[serde(default)]
    pub metadata: Metadata,
}

impl ExecutionResult {
    pub fn success(output: impl Into<String>, executor: impl Into<String>) -> Self {
        Self {
            success: true,
            output: output.into(),
            executor: executor.into(),
            metadata: Metadata::new(),
        }
    }

    pub fn failure(output: impl Into<String>, executor: impl Into<String>) -> Self {
        Self {
            success: false,
            output: output.into(),
            executor: executor.into(),
            metadata: Metadata::new(),
        }
    }

    /// Attach a metadata entry, consuming and returning the result.
    pub fn with_metadata(
        mut self,
        key: impl Into<String>,
        value: impl Into<serde_json::Value>,
    ) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }

    /// Terminal result produced when no executor succeeded.
    pub fn exhausted() -> Self {
        Self::failure("All executors failed", labels::NONE)
            .with_metadata("error", "complete_failure")
    }
}
