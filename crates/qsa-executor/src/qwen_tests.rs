use super::*;
use mockito::Server;
use std::os::unix::fs::PermissionsExt;

const VERSION_BRANCH: &str = r#"if [ "$1" = "--version" ]; then echo "qwen-code 0.4.2"; exit 0; fi"#;

fn write_tool(dir: &Path, body: &str) -> String {
    let path = dir.join("qwen-code");
    std::fs::write(&path, format!("#!/bin/sh\n{VERSION_BRANCH}\n{body}\n")).unwrap();
    std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
    path.to_string_lossy().to_string()
}

fn config_with_tool(tool_path: &str) -> QwenConfig {
    QwenConfig {
        tool_path: tool_path.to_string(),
        ..Default::default()
    }
}

fn missing_tool_config() -> QwenConfig {
    config_with_tool("/nonexistent/qwen-code")
}

#[test]
fn test_disabled_rejects_matching_task() {
    let executor = QwenExecutor::new(QwenConfig::default(), false);
    let task = Task::new("generate documentation");
    assert!(!executor.can_handle(&task));
    assert_eq!(executor.matched_patterns(&task), vec!["documentation"]);
}

#[test]
fn test_enabled_bulk_format_is_eligible() {
    let executor = QwenExecutor::new(QwenConfig::default(), true);
    let task = Task::builder("请批量格式化").estimated_tokens(5000).build();
    assert!(executor.can_handle(&task));
}

#[test]
fn test_enabled_ordinary_task_is_not_eligible() {
    let executor = QwenExecutor::new(QwenConfig::default(), true);
    assert!(!executor.can_handle(&Task::new("fix the failing unit test")));
}

#[test]
fn test_argv_skips_missing_files() {
    let file = tempfile::NamedTempFile::new().unwrap();
    let existing = file.path().to_string_lossy().to_string();
    let task = Task::builder("重构")
        .context_files([existing.clone(), "/nonexistent/a.rs".to_string()])
        .build();

    let argv = cli_argv("qwen-code", &task);
    assert_eq!(argv, vec!["qwen-code", "--task", "重构", "--file", existing.as_str()]);
}

#[tokio::test]
async fn test_health_fails_without_tool_or_endpoint() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("broken-qwen");
    std::fs::write(&path, "#!/bin/sh\nexit 1\n").unwrap();
    std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();

    let executor = QwenExecutor::new(config_with_tool(&path.to_string_lossy()), true);
    assert!(!executor.cli_available().await);
    assert!(!executor.api_available().await);
    assert!(!executor.health_check().await);
}

#[tokio::test]
async fn test_health_ok_with_working_tool() {
    let dir = tempfile::tempdir().unwrap();
    let tool = write_tool(dir.path(), "exit 0");
    let executor = QwenExecutor::new(config_with_tool(&tool), true);
    assert!(executor.health_check().await);
}

#[tokio::test]
async fn test_health_ok_with_endpoint_only() {
    let mut server = Server::new_async().await;
    let _m = server
        .mock("GET", "/health")
        .with_status(200)
        .create_async()
        .await;

    let config = QwenConfig {
        api_endpoint: Some(server.url()),
        api_key: Some("sk-test".into()),
        ..missing_tool_config()
    };
    let executor = QwenExecutor::new(config, true);
    assert!(!executor.cli_available().await);
    assert!(executor.health_check().await);
}

#[tokio::test]
async fn test_hung_version_probe_is_bounded() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("hung-qwen");
    std::fs::write(&path, "#!/bin/sh\nexec sleep 5\n").unwrap();
    std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();

    let executor = QwenExecutor::new(config_with_tool(&path.to_string_lossy()), true)
        .with_probe_timeout(Duration::from_secs(1));
    assert!(!executor.health_check().await);
}

#[tokio::test]
async fn test_execute_cli_success() {
    let dir = tempfile::tempdir().unwrap();
    let tool = write_tool(dir.path(), r#"printf '%s\n' "$@""#);
    let context = dir.path().join("notes.md");
    std::fs::write(&context, "# notes").unwrap();
    let context = context.to_string_lossy().to_string();

    let task = Task::builder("生成文档")
        .context_files([context.clone(), "/nonexistent/b.md".to_string()])
        .build();
    let executor = QwenExecutor::new(config_with_tool(&tool), true);
    let result = executor.execute(&task).await.unwrap();

    assert!(result.success);
    assert_eq!(result.executor, "qwen-cli");
    assert_eq!(result.output, format!("--task\n生成文档\n--file\n{context}\n"));
    assert_eq!(result.metadata["command"], json!([tool, "--task", "生成文档"]));
}

#[tokio::test]
async fn test_execute_cli_nonzero_exit() {
    let dir = tempfile::tempdir().unwrap();
    let tool = write_tool(dir.path(), "echo 'model overloaded' >&2\nexit 2");
    let executor = QwenExecutor::new(config_with_tool(&tool), true);

    let result = executor.execute(&Task::new("docs")).await.unwrap();
    assert!(!result.success);
    assert_eq!(result.executor, "qwen-cli");
    assert_eq!(result.output, "Qwen CLI error: model overloaded\n");
    assert_eq!(result.metadata["error_code"], 2);
}

#[tokio::test]
async fn test_execute_cli_timeout() {
    let dir = tempfile::tempdir().unwrap();
    let tool = write_tool(dir.path(), "exec sleep 5");
    let config = QwenConfig {
        timeout: 1,
        ..config_with_tool(&tool)
    };
    let executor = QwenExecutor::new(config, true);

    let started = std::time::Instant::now();
    let result = executor.execute(&Task::new("docs")).await.unwrap();
    assert!(started.elapsed() < Duration::from_secs(4));

    assert!(!result.success);
    assert_eq!(result.executor, "qwen-cli");
    assert_eq!(result.output, "Qwen CLI timeout after 1s");
    assert_eq!(result.metadata["error"], "timeout");
    assert_eq!(result.metadata["timeout_secs"], 1);
}

#[tokio::test]
async fn test_execute_cli_spawn_failure() {
    let executor = QwenExecutor::new(missing_tool_config(), true);
    let result = executor.execute_cli(&Task::new("docs")).await;

    assert!(!result.success);
    assert_eq!(result.executor, "qwen-cli");
    assert!(result.output.starts_with("Qwen CLI execution failed: "));
    assert!(result.metadata.contains_key("error"));
}

#[tokio::test]
async fn test_execute_cli_invalid_utf8_is_failure() {
    let dir = tempfile::tempdir().unwrap();
    let tool = write_tool(dir.path(), r"printf 'first\n\377bad\nlast line\n'; exit 0");
    let executor = QwenExecutor::new(config_with_tool(&tool), true);

    let result = executor.execute_cli(&Task::new("docs")).await;
    assert!(!result.success);
    assert_eq!(result.executor, "qwen-cli");
    assert!(result.output.starts_with("Qwen CLI execution failed: "));
    assert!(result.output.contains("not valid UTF-8"));
    assert!(result.metadata.contains_key("error"));
}

#[tokio::test]
async fn test_execute_cli_invalid_utf8_before_large_output_does_not_time_out() {
    let dir = tempfile::tempdir().unwrap();
    let tool = write_tool(
        dir.path(),
        r"printf '\377\n'; head -c 200000 /dev/zero | tr '\0' a; exit 0",
    );
    let config = QwenConfig {
        timeout: 3,
        ..config_with_tool(&tool)
    };
    let executor = QwenExecutor::new(config, true);

    let result = executor.execute_cli(&Task::new("docs")).await;
    assert!(!result.success);
    assert!(result.output.starts_with("Qwen CLI execution failed: "));
    assert_ne!(result.metadata.get("error"), Some(&json!("timeout")));
}

#[tokio::test]
async fn test_execute_cli_large_output_with_stderr() {
    let dir = tempfile::tempdir().unwrap();
    let tool = write_tool(
        dir.path(),
        "head -c 200000 /dev/zero | tr '\\0' a\nhead -c 100000 /dev/zero | tr '\\0' w >&2\nexit 0",
    );
    let config = QwenConfig {
        timeout: 5,
        ..config_with_tool(&tool)
    };
    let executor = QwenExecutor::new(config, true);

    let result = executor.execute_cli(&Task::new("docs")).await;
    assert!(result.success);
    assert_eq!(result.executor, "qwen-cli");
    assert_eq!(result.output.len(), 200_000);
    assert!(result.output.bytes().all(|b| b == b'a'));
}

#[tokio::test]
async fn test_execute_cli_output_without_trailing_newline() {
    let dir = tempfile::tempdir().unwrap();
    let tool = write_tool(dir.path(), r"printf 'line one\nno newline'");
    let executor = QwenExecutor::new(config_with_tool(&tool), true);

    let result = executor.execute_cli(&Task::new("docs")).await;
    assert!(result.success);
    assert_eq!(result.output, "line one\nno newline");
}

#[tokio::test]
async fn test_execute_falls_back_to_api() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", "/execute")
        .match_header("authorization", "Bearer sk-test")
        .with_status(200)
        .with_body(r#"{"output":"api result","id":7}"#)
        .create_async()
        .await;

    let config = QwenConfig {
        api_endpoint: Some(server.url()),
        api_key: Some("sk-test".into()),
        ..missing_tool_config()
    };
    let result = QwenExecutor::new(config, true)
        .execute(&Task::new("docs"))
        .await
        .unwrap();

    mock.assert_async().await;
    assert!(result.success);
    assert_eq!(result.executor, "qwen-api");
    assert_eq!(result.output, "api result");
    assert_eq!(result.metadata["response_id"], 7);
}

#[tokio::test]
async fn test_execute_service_unavailable() {
    let result = QwenExecutor::new(missing_tool_config(), true)
        .execute(&Task::new("docs"))
        .await
        .unwrap();

    assert!(!result.success);
    assert_eq!(result.executor, "qwen");
    assert_eq!(result.output, "Qwen service unavailable");
    assert_eq!(result.metadata["fallback_reason"], "service_unavailable");
}
