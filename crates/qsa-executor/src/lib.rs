//! Executors that can take a [`qsa_core::Task`]: the Qwen remote-batch
//! executor (local tool or HTTP endpoint) and the universal Claude fallback.

pub mod claude;
pub mod patterns;
pub mod qwen;
pub mod qwen_api;
pub mod traits;

pub use claude::ClaudeExecutor;
pub use qwen::{HEALTH_PROBE_TIMEOUT, QwenExecutor};
pub use qwen_api::QwenApiClient;
pub use traits::CodeExecutor;
