//! `qsa explain`: show how a task would be classified, without running it.

use anyhow::Result;
use qsa_config::QwenConfig;
use qsa_core::{OutputFormat, Task};
use qsa_executor::{CodeExecutor, QwenExecutor};
use serde::Serialize;

#[derive(Debug, Serialize)]
struct Explanation {
    estimated_tokens: u64,
    context_files: usize,
    qwen_enabled: bool,
    matched_rules: Vec<&'static str>,
    qwen_eligible: bool,
}

fn explain(task: &Task, enabled: bool) -> Explanation {
    let qwen = QwenExecutor::new(QwenConfig::default(), enabled);
    Explanation {
        estimated_tokens: task.estimated_tokens(),
        context_files: task.context_files().len(),
        qwen_enabled: enabled,
        matched_rules: qwen.matched_patterns(task),
        qwen_eligible: qwen.can_handle(task),
    }
}

pub(crate) fn handle_explain(
    task: String,
    files: Vec<String>,
    enabled: bool,
    format: OutputFormat,
) -> Result<()> {
    let task = Task::builder(task).context_files(files).build();
    let explanation = explain(&task, enabled);

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&explanation)?),
        OutputFormat::Text => {
            println!("Estimated tokens: {}", explanation.estimated_tokens);
            println!("Context files:    {}", explanation.context_files);
            println!("Qwen enabled:     {}", explanation.qwen_enabled);
            if explanation.matched_rules.is_empty() {
                println!("Matched rules:    (none)");
            } else {
                println!("Matched rules:    {}", explanation.matched_rules.join(", "));
            }
            let target = if explanation.qwen_eligible {
                "qwen (claude on failure)"
            } else {
                "claude"
            };
            println!("Would route to:   {target}");
        }
    }
    Ok(())
}
