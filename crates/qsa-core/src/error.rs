#[derive(thiserror::Error, Debug)]
pub enum AppError {
    #[error("Tool '{0}' is not installed")]
    ToolNotInstalled(String),

    #[error("Tool '{tool}' timed out after {secs}s")]
    ToolTimeout { tool: String, secs: u64 },

    #[error("Qwen API is not configured (api_endpoint and api_key are both required)")]
    ApiNotConfigured,

    #[error("Failed to parse config '{path}': {reason}")]
    ConfigParse { path: String, reason: String },
}
