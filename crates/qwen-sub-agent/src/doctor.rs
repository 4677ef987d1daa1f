//! Environment diagnostics for the Qwen integration.

use anyhow::Result;
use qsa_config::{ENABLE_QWEN_INTEGRATION, QwenConfig, integration_enabled_from_env, paths};
use qsa_core::OutputFormat;
use qsa_executor::{HEALTH_PROBE_TIMEOUT, QwenApiClient};
use serde::Serialize;

use crate::config_cmds::redacted;

#[derive(Debug, Serialize)]
struct ToolStatus {
    tool_path: String,
    location: Option<String>,
    version: Option<String>,
    error: Option<String>,
}

#[derive(Debug, Serialize)]
struct EndpointStatus {
    configured: bool,
    endpoint: Option<String>,
    healthy: bool,
}

#[derive(Debug, Serialize)]
struct DoctorReport {
    version: &'static str,
    config_path: Option<String>,
    config_exists: bool,
    config_error: Option<String>,
    config: QwenConfig,
    integration_enabled: bool,
    local_tool: ToolStatus,
    remote_endpoint: EndpointStatus,
}

async fn check_local_tool(tool_path: &str) -> ToolStatus {
    let location = match qsa_process::check_tool_installed(tool_path) {
        Ok(path) => path,
        Err(e) => {
            return ToolStatus {
                tool_path: tool_path.to_string(),
                location: None,
                version: None,
                error: Some(e.to_string()),
            };
        }
    };
    let (version, error) = match qsa_process::probe_version(tool_path, HEALTH_PROBE_TIMEOUT).await {
        Ok(version) => (Some(version), None),
        Err(e) => (None, Some(format!("{e:#}"))),
    };
    ToolStatus {
        tool_path: tool_path.to_string(),
        location: Some(location.display().to_string()),
        version,
        error,
    }
}

async fn check_endpoint(config: &QwenConfig) -> EndpointStatus {
    match QwenApiClient::from_config(config) {
        Ok(client) => EndpointStatus {
            configured: true,
            endpoint: Some(client.endpoint().to_string()),
            healthy: client.is_healthy(HEALTH_PROBE_TIMEOUT).await,
        },
        Err(_) => EndpointStatus {
            configured: false,
            endpoint: None,
            healthy: false,
        },
    }
}

async fn collect() -> DoctorReport {
    let path = paths::config_path();
    let (config, config_error) = match QwenConfig::load() {
        Ok(config) => (config, None),
        Err(e) => (QwenConfig::default(), Some(format!("{e:#}"))),
    };

    DoctorReport {
        version: env!("CARGO_PKG_VERSION"),
        config_exists: path.as_ref().is_some_and(|p| p.exists()),
        config_path: path.map(|p| p.display().to_string()),
        config_error,
        integration_enabled: integration_enabled_from_env(),
        local_tool: check_local_tool(&config.tool_path).await,
        remote_endpoint: check_endpoint(&config).await,
        config: redacted(&config),
    }
}

/// Run full environment diagnostics.
pub(crate) async fn run_doctor(format: OutputFormat) -> Result<()> {
    let report = collect().await;
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
        OutputFormat::Text => print_text(&report),
    }
    Ok(())
}

fn yes_no(value: bool) -> &'static str {
    if value { "yes" } else { "no" }
}

fn print_text(report: &DoctorReport) {
    println!("=== Qwen Sub-Agent ===");
    println!("Version:  {}", report.version);
    println!(
        "Platform: {} {}",
        std::env::consts::OS,
        std::env::consts::ARCH
    );
    println!();

    println!("=== Config ===");
    match &report.config_path {
        Some(path) => println!("Path:     {path} (exists: {})", yes_no(report.config_exists)),
        None => println!("Path:     <home directory unknown>"),
    }
    if let Some(error) = &report.config_error {
        println!("Error:    {error}");
    }
    println!("Tool:     {}", report.config.tool_path);
    println!("Timeout:  {}s", report.config.timeout);
    println!("Enable for: {}", report.config.enable_for.join(", "));
    println!();

    println!("=== Integration Flag ===");
    println!(
        "{ENABLE_QWEN_INTEGRATION}: {}",
        if report.integration_enabled { "enabled" } else { "disabled" }
    );
    println!();

    println!("=== Local Tool ===");
    let tool = &report.local_tool;
    match (&tool.location, &tool.version) {
        (Some(location), Some(version)) => println!("[OK] {} ({location}) {version}", tool.tool_path),
        (Some(location), None) => println!("[!!] {} ({location}) not responding", tool.tool_path),
        (None, _) => println!("[--] {} not found", tool.tool_path),
    }
    if let Some(error) = &tool.error {
        println!("     {error}");
    }
    println!();

    println!("=== Remote Endpoint ===");
    let endpoint = &report.remote_endpoint;
    match &endpoint.endpoint {
        Some(url) if endpoint.healthy => println!("[OK] {url}"),
        Some(url) => println!("[!!] {url} health check failed"),
        None => println!("[--] not configured (api_endpoint and api_key required)"),
    }
}
