//! Logging initialization for reqcheck.
//!
//! Diagnostics go to stderr through a `tracing-subscriber` fmt layer so the
//! report on stdout stays clean. `RUST_LOG` overrides the level chosen from
//! the CLI flags.

use crate::cli::CliArgs;
use tracing_subscriber::EnvFilter;

/// Default filter directive for the given flags.
///
/// `--quiet` only hides the progress bar; warnings are always shown.
pub fn default_level(args: &CliArgs) -> &'static str {
    if args.verbose {
        "debug"
    } else {
        "warn"
    }
}

/// Install the global subscriber. Call once, before any event is emitted.
pub fn init_logging(args: &CliArgs) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level(args)));

    // A second init (e.g. from tests) is not an error worth reporting
    let _ = tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(filter)
        .with_ansi(!args.no_color)
        .with_target(false)
        .compact()
        .try_init();
}
