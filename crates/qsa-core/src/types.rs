use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::result::labels;

/// Concrete executor backends.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ExecutorKind {
    /// Remote-batch executor (local `qwen-code` tool or Qwen HTTP API).
    Qwen,
    /// Universal fallback executor.
    Claude,
}

impl ExecutorKind {
    /// Returns the label family reported by this executor.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Qwen => labels::QWEN,
            Self::Claude => labels::CLAUDE,
        }
    }

    /// Default priority order when the Qwen integration is enabled.
    pub fn default_order(integration_enabled: bool) -> &'static [ExecutorKind] {
        if integration_enabled {
            &[Self::Qwen, Self::Claude]
        } else {
            &[Self::Claude]
        }
    }
}

impl std::fmt::Display for ExecutorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Output format for CLI responses
#[derive(Clone, Debug, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}
