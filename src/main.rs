//! reqcheck - Check updates of the requirements
//!
//! Reads requirements.txt from the project directory, looks up the latest
//! release of every dependency on PyPI, and prints which pins are behind.

use clap::Parser;
use reqcheck::cli::CliArgs;
use reqcheck::logging::init_logging;
use reqcheck::orchestrator::Orchestrator;
use reqcheck::output::{create_formatter, OutputConfig};
use std::io::{self, Write};
use std::process::ExitCode;

#[tokio::main]
async fn main() -> ExitCode {
    let args = CliArgs::parse();
    init_logging(&args);

    if args.no_color {
        colored::control::set_override(false);
    }

    // Run the main logic and handle errors
    match run(args).await {
        Ok(exit_code) => exit_code,
        Err(e) => {
            tracing::error!("{:#}", e);
            ExitCode::FAILURE
        }
    }
}

/// Main application logic
async fn run(args: CliArgs) -> anyhow::Result<ExitCode> {
    tracing::debug!(
        version = env!("CARGO_PKG_VERSION"),
        path = %args.path.display(),
        workers = args.workers,
        "starting"
    );

    let orchestrator = Orchestrator::new(args.clone())?;
    let result = orchestrator.run().await;

    let formatter = create_formatter(OutputConfig::from_cli(args.json, args.no_color));

    let mut stdout = io::stdout().lock();
    formatter.format(&result, &mut stdout)?;
    stdout.flush()?;

    // Lookup failures and skipped lines are reported, not fatal
    Ok(ExitCode::SUCCESS)
}
