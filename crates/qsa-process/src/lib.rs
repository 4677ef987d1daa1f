//! Process management: spawning, bounded output capture and version probes.

use anyhow::{Context, Result, bail};
use qsa_core::AppError;
use serde::Serialize;
use std::path::PathBuf;
use std::process::Stdio;
use std::time::Duration;
use tokio::io::{AsyncRead, AsyncReadExt};
use tokio::process::Command;
use tracing::{debug, warn};

/// Captured result of a finished tool process.
#[derive(Debug, Clone, Serialize)]
pub struct ToolOutput {
    /// Complete stdout, which must be valid UTF-8.
    pub output: String,
    /// Complete stderr, decoded lossily.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub stderr_output: String,
    /// Exit code (1 if signal-killed).
    pub exit_code: i32,
}

/// Spawn a tool process without waiting for it to complete.
///
/// - Stdin is closed, stdout and stderr are piped
/// - Isolates child in its own process group (via setsid)
/// - Enables kill_on_drop so a dropped (e.g. timed out) wait kills the child
pub fn spawn_tool(mut cmd: Command) -> Result<tokio::process::Child> {
    cmd.stdin(Stdio::null());
    cmd.stdout(Stdio::piped());
    cmd.stderr(Stdio::piped());
    cmd.kill_on_drop(true);

    // SAFETY: setsid() is async-signal-safe and we call it before exec,
    // so no Rust runtime state exists in the child yet.
    #[cfg(unix)]
    unsafe {
        cmd.pre_exec(|| {
            libc::setsid();
            Ok(())
        });
    }

    cmd.spawn().context("Failed to spawn command")
}

async fn drain<R: AsyncRead + Unpin>(pipe: Option<R>) -> std::io::Result<Vec<u8>> {
    let mut buf = Vec::new();
    if let Some(mut pipe) = pipe {
        pipe.read_to_end(&mut buf).await?;
    }
    Ok(buf)
}

/// Wait for a spawned child, draining stdout and stderr concurrently to EOF.
///
/// Fails if either pipe cannot be read or stdout is not valid UTF-8.
pub async fn wait_and_capture(mut child: tokio::process::Child) -> Result<ToolOutput> {
    let stdout = child.stdout.take();
    let stderr = child.stderr.take();

    let (stdout, stderr) = tokio::try_join!(drain(stdout), drain(stderr))
        .context("Failed to read tool output")?;
    let status = child.wait().await.context("Failed to wait for command")?;

    let exit_code = status.code().unwrap_or_else(|| {
        warn!("Process terminated by signal, using exit code 1");
        1
    });

    let output = String::from_utf8(stdout).context("Tool stdout is not valid UTF-8")?;
    let stderr_output = String::from_utf8_lossy(&stderr).into_owned();

    Ok(ToolOutput {
        output,
        stderr_output,
        exit_code,
    })
}

/// Spawn `cmd` and capture its output, bounded by `timeout`.
///
/// On expiry the child is killed and the error downcasts to
/// [`AppError::ToolTimeout`].
pub async fn run_with_timeout(cmd: Command, timeout: Duration) -> Result<ToolOutput> {
    let tool = program_name(&cmd);
    let child = spawn_tool(cmd)?;
    match tokio::time::timeout(timeout, wait_and_capture(child)).await {
        Ok(result) => result,
        Err(_) => Err(AppError::ToolTimeout {
            tool,
            secs: timeout.as_secs(),
        }
        .into()),
    }
}

/// Run `<executable> --version` and return the first non-empty stdout line.
///
/// Fails on spawn errors, non-zero exit, or when `timeout` elapses.
pub async fn probe_version(executable: &str, timeout: Duration) -> Result<String> {
    let mut cmd = Command::new(executable);
    cmd.arg("--version");
    let output = run_with_timeout(cmd, timeout).await?;
    if output.exit_code != 0 {
        bail!(
            "'{} --version' exited with code {}",
            executable,
            output.exit_code
        );
    }
    Ok(output
        .output
        .lines()
        .find(|line| !line.trim().is_empty())
        .unwrap_or_default()
        .trim()
        .to_string())
}

/// `true` when `<executable> --version` exits 0 within `timeout`.
pub async fn is_responsive(executable: &str, timeout: Duration) -> bool {
    match probe_version(executable, timeout).await {
        Ok(version) => {
            debug!(tool = %executable, version = %version, "Version probe succeeded");
            true
        }
        Err(e) => {
            debug!(tool = %executable, error = %format!("{e:#}"), "Version probe failed");
            false
        }
    }
}

/// Locate an executable on PATH (or verify an explicit path).
pub fn check_tool_installed(executable: &str) -> Result<PathBuf> {
    which::which(executable).map_err(|_| AppError::ToolNotInstalled(executable.to_string()).into())
}

fn program_name(cmd: &Command) -> String {
    cmd.as_std().get_program().to_string_lossy().to_string()
}

#[cfg(test)]
#[path = "lib_tests.rs"]
mod tests;
