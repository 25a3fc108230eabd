mod checker;
mod cli;
mod config;
mod error;
mod logging;
mod prober;
mod report;
mod target;

use checker::Checker;
use cli::CommandLine;
use config::{CheckConfig, Settings};
use report::Reporter;

use std::process::ExitCode;
use tracing::info;

#[tokio::main(flavor = "multi_thread", worker_threads = 4)]
async fn main() -> ExitCode {
    let commands = CommandLine::parse_args();

    match run(commands).await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(commands: CommandLine) -> anyhow::Result<ExitCode> {
    let file_config = CheckConfig::discover(commands.config.as_deref()).await?;
    let settings = Settings::merge(file_config, commands)?;

    logging::init_logging(settings.log_level)?;

    if settings.targets.is_empty() {
        if settings.quiet {
            return Ok(ExitCode::SUCCESS);
        }
        CommandLine::print_usage();
        return Ok(ExitCode::FAILURE);
    }

    info!(
        "checking {} server(s), timeout {:?}, default port {}",
        settings.targets.len(),
        settings.timeout,
        settings.default_port
    );

    let checker = Checker::new(settings.timeout, settings.default_port);
    let mut reporter = Reporter::new(std::io::stdout(), settings.show_all);
    let summary = checker.run(settings.targets, &mut reporter).await?;

    if summary.timed_out {
        // leave in-flight connects behind
        std::process::exit(summary.exit_status().into());
    }

    info!("{} checked, {} failed", summary.checked, summary.failed);
    Ok(ExitCode::from(summary.exit_status()))
}
