//! Qwen integration config loaded from `~/.claude/qwen-config.json`.
//!
//! Recognized keys:
//! - `tool_path` (legacy alias `cli_path`): local `qwen-code` executable
//! - `api_endpoint` / `api_key`: remote endpoint and bearer credential
//! - `timeout`: execution timeout in seconds
//! - `enable_for`: advisory category tags, never enforced

use anyhow::{Context, Result, bail};
use qsa_core::AppError;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::warn;

use crate::paths;

/// Default local tool executable.
pub const DEFAULT_TOOL_PATH: &str = "qwen-code";
/// Default execution timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 300;

const DEFAULT_ENABLE_FOR: &[&str] = &[
    "batch_operations",
    "documentation_generation",
    "large_codebase_analysis",
    "simple_refactoring",
];

/// Configuration for the Qwen executor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QwenConfig {
    #[serde(default = "default_tool_path", alias = "cli_path")]
    pub tool_path: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_endpoint: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    /// Execution timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout: u64,
    #[serde(default = "default_enable_for")]
    pub enable_for: Vec<String>,
}

fn default_tool_path() -> String {
    DEFAULT_TOOL_PATH.to_string()
}

fn default_timeout() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

fn default_enable_for() -> Vec<String> {
    DEFAULT_ENABLE_FOR.iter().map(|s| s.to_string()).collect()
}

impl Default for QwenConfig {
    fn default() -> Self {
        Self {
            tool_path: default_tool_path(),
            api_endpoint: None,
            api_key: None,
            timeout: default_timeout(),
            enable_for: default_enable_for(),
        }
    }
}

impl QwenConfig {
    /// Load from `~/.claude/qwen-config.json`.
    ///
    /// Returns `Default` if the file does not exist or if the home directory
    /// cannot be determined.
    pub fn load() -> Result<Self> {
        let Some(path) = paths::config_path() else {
            return Ok(Self::default());
        };
        if !path.exists() {
            return Ok(Self::default());
        }
        Self::load_from(&path)
    }

    /// Load from an explicit path. The file must exist.
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read Qwen config: {}", path.display()))?;
        let config: Self = serde_json::from_str(&content).map_err(|e| AppError::ConfigParse {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
        Ok(config)
    }

    /// Like [`QwenConfig::load`], but logs and falls back to defaults on error.
    pub fn load_or_default() -> Self {
        match Self::load() {
            Ok(config) => config,
            Err(e) => {
                warn!(error = %format!("{e:#}"), "Failed to load Qwen config, using defaults");
                Self::default()
            }
        }
    }

    /// Execution timeout as a `Duration`.
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout)
    }

    /// Endpoint (without trailing slash) and key, when both are present and non-empty.
    pub fn api_credentials(&self) -> Option<(&str, &str)> {
        let endpoint = self
            .api_endpoint
            .as_deref()
            .map(|e| e.trim_end_matches('/'))
            .filter(|e| !e.is_empty())?;
        let key = self.api_key.as_deref().filter(|k| !k.is_empty())?;
        Some((endpoint, key))
    }

    /// Default config rendered as pretty JSON, used by `qsa config init`.
    pub fn default_template() -> String {
        let mut template = Self::default();
        template.api_endpoint = Some(String::new());
        template.api_key = Some(String::new());
        // Serializing a plain struct of strings and numbers cannot fail.
        serde_json::to_string_pretty(&template).unwrap_or_default()
    }

    /// Write the default template to `~/.claude/qwen-config.json`.
    ///
    /// Refuses to overwrite an existing file unless `force` is set.
    pub fn save_default_template(force: bool) -> Result<PathBuf> {
        let path = paths::config_path().context("Failed to determine home directory")?;
        Self::save_default_template_to(&path, force)?;
        Ok(path)
    }

    /// Write the default template to `path`, creating parent directories.
    pub fn save_default_template_to(path: &Path, force: bool) -> Result<()> {
        if path.exists() && !force {
            bail!(
                "Config already exists at {} (use --force to overwrite)",
                path.display()
            );
        }
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }
        std::fs::write(path, Self::default_template())
            .with_context(|| format!("Failed to write Qwen config: {}", path.display()))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = QwenConfig::default();
        assert_eq!(config.tool_path, "qwen-code");
        assert_eq!(config.timeout, 300);
        assert!(config.api_endpoint.is_none());
        assert!(config.api_key.is_none());
        assert_eq!(config.enable_for.len(), 4);
        assert!(config.enable_for.contains(&"simple_refactoring".to_string()));
    }

    #[test]
    fn test_parse_full_config() {
        let json = r#"{
            "tool_path": "/opt/qwen/bin/qwen-code",
            "api_endpoint": "https://qwen.example.com/v1/",
            "api_key": "sk-test",
            "timeout": 120,
            "enable_for": ["documentation_generation"]
        }"#;
        let config: QwenConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.tool_path, "/opt/qwen/bin/qwen-code");
        assert_eq!(config.timeout(), Duration::from_secs(120));
        assert_eq!(
            config.api_credentials(),
            Some(("https://qwen.example.com/v1", "sk-test"))
        );
        assert_eq!(config.enable_for, vec!["documentation_generation"]);
    }

    #[test]
    fn test_legacy_cli_path_key() {
        let config: QwenConfig = serde_json::from_str(r#"{"cli_path": "qwen"}"#).unwrap();
        assert_eq!(config.tool_path, "qwen");
        assert_eq!(config.timeout, 300);
    }

    #[test]
    fn test_partial_config_fills_defaults() {
        let config: QwenConfig =
            serde_json::from_str(r#"{"api_endpoint": "https://test.com"}"#).unwrap();
        assert_eq!(config.tool_path, "qwen-code");
        assert_eq!(config.api_endpoint.as_deref(), Some("https://test.com"));
        assert!(config.api_credentials().is_none(), "key missing");
    }

    #[test]
    fn test_empty_credentials_are_not_configured() {
        let config = QwenConfig {
            api_endpoint: Some(String::new()),
            api_key: Some("k".into()),
            ..Default::default()
        };
        assert!(config.api_credentials().is_none());

        let config = QwenConfig {
            api_endpoint: Some("https://test.com".into()),
            api_key: Some(String::new()),
            ..Default::default()
        };
        assert!(config.api_credentials().is_none());
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("qwen-config.json");
        std::fs::write(&path, r#"{"timeout": 42}"#).unwrap();

        let config = QwenConfig::load_from(&path).unwrap();
        assert_eq!(config.timeout, 42);
        assert_eq!(config.tool_path, "qwen-code");
    }

    #[test]
    fn test_load_from_invalid_json_is_config_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("qwen-config.json");
        std::fs::write(&path, "{ not json").unwrap();

        let err = QwenConfig::load_from(&path).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<AppError>(),
            Some(AppError::ConfigParse { .. })
        ));
    }

    #[test]
    fn test_load_from_missing_file_fails() {
        let dir = tempfile::tempdir().unwrap();
        let result = QwenConfig::load_from(&dir.path().join("absent.json"));
        assert!(result.is_err());
    }

    #[test]
    fn test_default_template_round_trips() {
        let template = QwenConfig::default_template();
        let parsed: QwenConfig = serde_json::from_str(&template).unwrap();
        assert_eq!(parsed.tool_path, "qwen-code");
        assert_eq!(parsed.api_endpoint.as_deref(), Some(""));
        assert!(parsed.api_credentials().is_none());
    }

    #[test]
    fn test_save_template_refuses_overwrite() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("qwen-config.json");

        QwenConfig::save_default_template_to(&path, false).unwrap();
        assert!(path.exists());

        let err = QwenConfig::save_default_template_to(&path, false).unwrap_err();
        assert!(err.to_string().contains("--force"));

        QwenConfig::save_default_template_to(&path, true).unwrap();
    }
}
