//! HTTP client for the remote Qwen endpoint (`GET /health`, `POST /execute`).

use std::fmt::Display;
use std::time::Duration;

use qsa_config::QwenConfig;
use qsa_core::{AppError, ExecutionResult, Metadata, Task, labels};
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, info};

#[derive(Debug, Serialize)]
struct ExecuteRequest<'a> {
    task: &'a str,
    context_files: &'a [String],
    metadata: &'a Metadata,
}

#[derive(Debug, Deserialize)]
struct ExecuteResponse {
    #[serde(default)]
    output: Value,
    #[serde(default)]
    id: Value,
}

/// Strings are used verbatim, `null` or a missing field is empty, and any
/// other JSON value is rendered as compact JSON text.
fn render_output(output: Value) -> String {
    match output {
        Value::String(text) => text,
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

/// Bearer-authenticated client for a Qwen endpoint.
#[derive(Debug, Clone)]
pub struct QwenApiClient {
    endpoint: String,
    api_key: String,
    client: reqwest::Client,
}

impl QwenApiClient {
    pub fn new(endpoint: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
            client: reqwest::Client::new(),
        }
    }

    /// Build from config; fails with [`AppError::ApiNotConfigured`] unless
    /// both endpoint and key are set and non-empty.
    pub fn from_config(config: &QwenConfig) -> Result<Self, AppError> {
        let (endpoint, api_key) = config.api_credentials().ok_or(AppError::ApiNotConfigured)?;
        Ok(Self::new(endpoint, api_key))
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// `GET {endpoint}/health`; healthy only on HTTP 200 within `timeout`.
    pub async fn is_healthy(&self, timeout: Duration) -> bool {
        let url = format!("{}/health", self.endpoint);
        match self
            .client
            .get(&url)
            .bearer_auth(&self.api_key)
            .timeout(timeout)
            .send()
            .await
        {
            Ok(response) => {
                let status = response.status();
                debug!(url = %url, status = %status, "Qwen API health probe");
                status == StatusCode::OK
            }
            Err(e) => {
                debug!(url = %url, error = %e, "Qwen API health probe failed");
                false
            }
        }
    }

    /// `POST {endpoint}/execute`. Every outcome is reported as a result.
    pub async fn execute(&self, task: &Task, timeout: Duration) -> ExecutionResult {
        let url = format!("{}/execute", self.endpoint);
        info!(endpoint = %self.endpoint, "Calling Qwen API");

        let request = ExecuteRequest {
            task: task.content(),
            context_files: task.context_files(),
            metadata: task.metadata(),
        };
        let response = match self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .timeout(timeout)
            .json(&request)
            .send()
            .await
        {
            Ok(response) => response,
            Err(e) => return request_failed(e),
        };

        let status = response.status();
        let body = match response.text().await {
            Ok(body) => body,
            Err(e) => return request_failed(e),
        };

        if status != StatusCode::OK {
            let code = status.as_u16();
            return ExecutionResult::failure(format!("Qwen API error: {code} {body}"), labels::QWEN_API)
                .with_metadata("status_code", code);
        }

        match serde_json::from_str::<ExecuteResponse>(&body) {
            Ok(parsed) => ExecutionResult::success(render_output(parsed.output), labels::QWEN_API)
                .with_metadata("response_id", parsed.id),
            Err(e) => request_failed(e),
        }
    }
}

fn request_failed(e: impl Display) -> ExecutionResult {
    let message = e.to_string();
    ExecutionResult::failure(format!("Qwen API request failed: {message}"), labels::QWEN_API)
        .with_metadata("error", message)
}
