//! Qwen integration configuration (`~/.claude/qwen-config.json`) and the
//! `ENABLE_QWEN_INTEGRATION` switch.

pub mod config;
pub mod flag;
pub mod paths;

pub use config::{DEFAULT_TIMEOUT_SECS, DEFAULT_TOOL_PATH, QwenConfig};
pub use flag::{ENABLE_QWEN_INTEGRATION, integration_enabled_from_env, parse_enabled};
