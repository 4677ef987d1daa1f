use clap::{Parser, Subcommand};
use qsa_core::{ExecutorKind, OutputFormat};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "qsa")]
#[command(about = "Qwen Sub-Agent: route coding tasks to Qwen with Claude fallback")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output format (text or json)
    #[arg(long, global = true, default_value = "text")]
    pub format: OutputFormat,

    /// Also write logs to {dir}/logs/run-{timestamp}.log
    #[arg(long, global = true)]
    pub log_dir: Option<PathBuf>,

    /// Enable the Qwen executor regardless of ENABLE_QWEN_INTEGRATION
    #[arg(long, global = true)]
    pub enable_qwen: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Route a single task and print the result
    Run {
        /// Task description
        task: String,

        /// Context files passed to the executor
        files: Vec<String>,

        /// Print the routing status report to stderr afterwards
        #[arg(long)]
        report: bool,

        /// Executor priority order (repeatable); defaults to qwen, claude
        #[arg(long = "executor", value_enum)]
        executors: Vec<ExecutorKind>,
    },

    /// Route every non-empty line of FILE as a task, then print the report
    Batch {
        file: PathBuf,
    },

    /// Show token estimate and matched Qwen rules without executing
    Explain {
        task: String,

        files: Vec<String>,
    },

    /// Check config, integration flag, local tool and remote endpoint
    Doctor,

    /// Show or initialize ~/.claude/qwen-config.json
    Config {
        #[command(subcommand)]
        cmd: ConfigCommands,
    },

    /// Read tasks from stdin line by line (quit, exit or q to stop)
    Interactive,
}

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Print the effective configuration
    Show,

    /// Write the default configuration template
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}
