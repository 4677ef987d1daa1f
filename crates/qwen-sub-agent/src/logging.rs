//! Optional file logging for a single `qsa` invocation.

use anyhow::{Context, Result};
use chrono::Utc;
use std::path::Path;

/// Create a run-specific log writer.
///
/// Returns a non-blocking writer and a worker guard that must be kept alive
/// for the duration of logging.
///
/// Log files are created in `{base_dir}/logs/run-{timestamp}.log`.
pub fn create_run_log_writer(
    base_dir: &Path,
) -> Result<(
    tracing_appender::non_blocking::NonBlocking,
    tracing_appender::non_blocking::WorkerGuard,
)> {
    let log_dir = base_dir.join("logs");
    std::fs::create_dir_all(&log_dir)
        .with_context(|| format!("Failed to create log directory: {}", log_dir.display()))?;

    let file_name = format!("run-{}.log", Utc::now().format("%Y%m%d-%H%M%S"));
    let file_appender = tracing_appender::rolling::never(&log_dir, file_name);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    Ok((non_blocking, guard))
}

/// Install the global subscriber, writing to stderr or to a log file.
///
/// The returned guard (if any) must outlive all logging.
pub fn init_tracing(log_dir: Option<&Path>) -> Result<Option<tracing_appender::non_blocking::WorkerGuard>> {
    let filter = tracing_subscriber::EnvFilter::from_default_env();
    match log_dir {
        Some(dir) => {
            let (writer, guard) = create_run_log_writer(dir)?;
            tracing_subscriber::fmt()
                .with_writer(writer)
                .with_ansi(false)
                .with_env_filter(filter)
                .try_init()
                .ok();
            Ok(Some(guard))
        }
        None => {
            tracing_subscriber::fmt()
                .with_writer(std::io::stderr)
                .with_env_filter(filter)
                .try_init()
                .ok();
            Ok(None)
        }
    }
}
