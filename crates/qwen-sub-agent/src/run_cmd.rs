//! `qsa run`, `qsa batch` and `qsa interactive`.

use anyhow::{Context, Result};
use qsa_config::{QwenConfig, integration_enabled_from_env};
use qsa_core::{ExecutionResult, ExecutorKind, OutputFormat, Task};
use qsa_scheduler::compat::{render_for_user, user_task};
use qsa_scheduler::{SchedulerStats, TaskScheduler, build_executors};
use serde::Serialize;
use std::io::Write;
use std::path::Path;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{info, warn};

const PREVIEW_CHARS: usize = 200;
const QUIT_COMMANDS: &[&str] = &["quit", "exit", "q"];

/// Integration flag: `--enable-qwen` or `ENABLE_QWEN_INTEGRATION=true`.
pub(crate) fn resolve_enabled(cli_flag: bool) -> bool {
    cli_flag || integration_enabled_from_env()
}

fn qwen_requested_but_disabled(kinds: &[ExecutorKind], enabled: bool) -> bool {
    !enabled && kinds.contains(&ExecutorKind::Qwen)
}

fn build_scheduler(kinds: &[ExecutorKind], enabled: bool) -> TaskScheduler {
    if qwen_requested_but_disabled(kinds, enabled) {
        warn!(
            "Qwen executor requested but the integration is disabled; \
             pass --enable-qwen or set ENABLE_QWEN_INTEGRATION=true"
        );
    }
    let kinds = if kinds.is_empty() {
        ExecutorKind::default_order(enabled)
    } else {
        kinds
    };
    TaskScheduler::new(build_executors(kinds, QwenConfig::load_or_default(), enabled))
}

/// Route a single task. Returns the process exit code.
pub(crate) async fn handle_run(
    task: String,
    files: Vec<String>,
    report: bool,
    executors: Vec<ExecutorKind>,
    enabled: bool,
    format: OutputFormat,
) -> Result<i32> {
    let mut scheduler = build_scheduler(&executors, enabled);
    info!(executors = ?scheduler.executor_names(), "Routing task");

    let task = user_task(&task, Some(files));
    let result = scheduler.route_task(&task).await;

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&result)?),
        OutputFormat::Text => println!("{}", render_for_user(&result)),
    }
    if report {
        eprint!("{}", scheduler.status_report());
    }

    Ok(if result.success { 0 } else { 1 })
}

#[derive(Debug, Serialize)]
struct BatchEntry<'a> {
    task: &'a str,
    result: &'a ExecutionResult,
}

#[derive(Debug, Serialize)]
struct BatchReport<'a> {
    results: Vec<BatchEntry<'a>>,
    stats: &'a SchedulerStats,
}

/// Non-empty, trimmed lines of a batch file.
fn read_batch_tasks(path: &Path) -> Result<Vec<String>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read batch file: {}", path.display()))?;
    Ok(content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect())
}

fn preview(text: &str) -> String {
    let flat = text.trim().replace('\n', " ");
    if flat.chars().nth(PREVIEW_CHARS).is_none() {
        flat
    } else {
        let truncated: String = flat.chars().take(PREVIEW_CHARS).collect();
        format!("{truncated}...")
    }
}

fn format_line(index: usize, content: &str, result: &ExecutionResult) -> String {
    let status = if result.success { "ok" } else { "FAILED" };
    format!(
        "[{index}] {content}\n    -> {} ({status}): {}",
        result.executor,
        preview(&result.output)
    )
}

/// Route every task in `file` through one scheduler, then print the report.
pub(crate) async fn handle_batch(file: &Path, enabled: bool, format: OutputFormat) -> Result<i32> {
    let tasks = read_batch_tasks(file)?;
    let mut scheduler = build_scheduler(&[], enabled);

    let mut results = Vec::with_capacity(tasks.len());
    for (index, content) in tasks.iter().enumerate() {
        let result = scheduler.route_task(&Task::new(content.as_str())).await;
        if matches!(format, OutputFormat::Text) {
            println!("{}", format_line(index + 1, content, &result));
        }
        results.push(result);
    }

    let failures = results.iter().filter(|r| !r.success).count();
    match format {
        OutputFormat::Json => {
            let entries: Vec<BatchEntry<'_>> = tasks
                .iter()
                .zip(&results)
                .map(|(task, result)| BatchEntry { task, result })
                .collect();
            let report = BatchReport {
                results: entries,
                stats: scheduler.stats(),
            };
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        OutputFormat::Text => {
            println!();
            print!("{}", scheduler.status_report());
        }
    }

    Ok(if failures == 0 { 0 } else { 1 })
}

fn is_quit(line: &str) -> bool {
    QUIT_COMMANDS.contains(&line.to_lowercase().as_str())
}

/// Read tasks from stdin until EOF or a quit command.
pub(crate) async fn handle_interactive(enabled: bool) -> Result<i32> {
    let mut scheduler = build_scheduler(&[], enabled);
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    eprintln!("Qwen Sub-Agent interactive mode (quit, exit or q to stop)");
    loop {
        eprint!("qsa> ");
        std::io::stderr().flush().ok();

        let Some(line) = lines.next_line().await.context("Failed to read stdin")? else {
            break;
        };
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if is_quit(line) {
            break;
        }

        let result = scheduler.route_task(&Task::new(line)).await;
        println!("[{}] {}", result.executor, preview(&result.output));
    }

    eprint!("{}", scheduler.status_report());
    Ok(0)
}
