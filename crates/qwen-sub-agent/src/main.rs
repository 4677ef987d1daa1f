use anyhow::Result;
use clap::Parser;

mod cli;
mod config_cmds;
mod doctor;
mod explain;
mod logging;
mod run_cmd;

use cli::{Cli, Commands, ConfigCommands};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let output_format = cli.format.clone();

    // Guard must live until exit so buffered log lines are flushed.
    let log_guard = logging::init_tracing(cli.log_dir.as_deref())?;

    let enabled = run_cmd::resolve_enabled(cli.enable_qwen);

    match cli.command {
        Commands::Run {
            task,
            files,
            report,
            executors,
        } => {
            let exit_code =
                run_cmd::handle_run(task, files, report, executors, enabled, output_format).await?;
            exit(exit_code, log_guard);
        }
        Commands::Batch { file } => {
            let exit_code = run_cmd::handle_batch(&file, enabled, output_format).await?;
            exit(exit_code, log_guard);
        }
        Commands::Explain { task, files } => {
            explain::handle_explain(task, files, enabled, output_format)?;
        }
        Commands::Doctor => {
            doctor::run_doctor(output_format).await?;
        }
        Commands::Config { cmd } => match cmd {
            ConfigCommands::Show => config_cmds::handle_config_show(output_format)?,
            ConfigCommands::Init { force } => config_cmds::handle_config_init(force)?,
        },
        Commands::Interactive => {
            let exit_code = run_cmd::handle_interactive(enabled).await?;
            exit(exit_code, log_guard);
        }
    }

    Ok(())
}

fn exit(code: i32, log_guard: Option<tracing_appender::non_blocking::WorkerGuard>) -> ! {
    drop(log_guard);
    std::process::exit(code);
}
