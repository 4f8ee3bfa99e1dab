//! CLI argument parsing module for reqcheck

use crate::error::ConfigError;
use crate::pool::DEFAULT_WORKERS;
use crate::registry::DEFAULT_PYPI_URL;
use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;

/// Check updates of the requirements
#[derive(Parser, Debug, Clone)]
#[command(
    name = "reqcheck",
    version,
    about = "Check updates of the requirements"
)]
pub struct CliArgs {
    /// Path to the project containing requirements.txt
    #[arg(long, default_value = ".")]
    pub path: PathBuf,

    /// Number of concurrent registry lookups
    #[arg(short, long, default_value_t = DEFAULT_WORKERS)]
    pub workers: usize,

    /// Per-request timeout in seconds
    #[arg(long, default_value_t = 60)]
    pub timeout: u64,

    /// Base URL of the PyPI-compatible registry
    #[arg(long, default_value = DEFAULT_PYPI_URL)]
    pub registry_url: String,

    // Output options
    /// Output results in JSON format
    #[arg(long)]
    pub json: bool,

    /// Disable colored output
    #[arg(long)]
    pub no_color: bool,

    /// Enable verbose diagnostics on stderr
    #[arg(long)]
    pub verbose: bool,

    /// Hide the progress bar (warnings still go to stderr)
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,
}

impl CliArgs {
    /// Per-request timeout as a Duration
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout)
    }

    /// Whether a progress bar should be drawn
    pub fn show_progress(&self) -> bool {
        !self.quiet && !self.json
    }

    /// Reject values clap accepts but the checker cannot run with
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.workers == 0 {
            return Err(ConfigError::InvalidWorkerCount {
                value: self.workers,
            });
        }
        if self.timeout == 0 {
            return Err(ConfigError::InvalidTimeout {
                value: self.timeout,
            });
        }
        if !(self.registry_url.starts_with("http://") || self.registry_url.starts_with("https://"))
        {
            return Err(ConfigError::InvalidRegistryUrl {
                value: self.registry_url.clone(),
            });
        }
        Ok(())
    }
}
