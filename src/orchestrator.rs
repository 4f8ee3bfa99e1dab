//! Check orchestrator coordinating the whole workflow
//!
//! This module provides:
//! - Workflow coordination: read manifest → look up versions → aggregate
//! - Bounded-concurrency registry queries through [`FetchPool`]
//! - Recovery from a missing manifest and malformed lines

use crate::cli::CliArgs;
use crate::domain::UpdateReport;
use crate::error::{AppError, ManifestError};
use crate::manifest::RequirementsReader;
use crate::pool::FetchPool;
use crate::progress::Progress;
use crate::registry::{HttpClient, PyPIClient, RegistryClient};
use std::sync::Arc;
use tracing::{debug, warn};

/// Orchestrator for the check workflow
pub struct Orchestrator {
    /// CLI arguments for configuration
    args: CliArgs,
    /// Registry client shared by all workers
    client: Arc<dyn RegistryClient>,
}

/// Result of running the orchestrator
#[derive(Debug)]
pub struct CheckResult {
    /// Dependencies grouped by update status
    pub report: UpdateReport,
    /// Recovered manifest problems (missing file, skipped lines)
    pub errors: Vec<ManifestError>,
}

impl Orchestrator {
    /// Create a new orchestrator talking to the configured PyPI registry
    pub fn new(args: CliArgs) -> Result<Self, AppError> {
        args.validate()?;
        let http = HttpClient::with_timeout(args.timeout())?;
        debug!(
            registry = %args.registry_url,
            timeout_secs = http.timeout().as_secs(),
            "registry client ready"
        );
        let client = PyPIClient::with_base_url(http, args.registry_url.clone());
        Ok(Self::with_client(args, Arc::new(client)))
    }

    /// Create an orchestrator with a custom registry client (for testing)
    pub fn with_client(args: CliArgs, client: Arc<dyn RegistryClient>) -> Self {
        Self { args, client }
    }

    /// Run the check workflow
    pub async fn run(&self) -> CheckResult {
        self.run_with_progress(self.args.show_progress()).await
    }

    /// Run the check workflow with optional progress display
    pub async fn run_with_progress(&self, show_progress: bool) -> CheckResult {
        let mut progress = Progress::new(show_progress);
        let mut errors = Vec::new();

        // Step 1: Read the manifest
        let reader = match RequirementsReader::open(&self.args.path).await {
            Ok(reader) => reader,
            Err(e) => {
                warn!("{}", e);
                errors.push(e);
                return CheckResult {
                    report: UpdateReport::new(),
                    errors,
                };
            }
        };
        debug!(path = %reader.path().display(), "reading manifest");

        let (dependencies, line_errors) = reader.read_all().await;
        for e in line_errors {
            warn!("skipping: {}", e);
            errors.push(e);
        }

        // Step 2: Look up every dependency
        progress.start(dependencies.len() as u64, "Checking dependencies");
        let pool = FetchPool::new(Arc::clone(&self.client))
            .with_workers(self.args.workers)
            .with_progress(progress.clone());
        let records = pool.run(dependencies).await;
        progress.finish_and_clear();

        // Step 3: Aggregate
        let report = UpdateReport::from_records(records);
        debug!(
            with_updates = report.with_updates.len(),
            without_updates = report.without_updates.len(),
            "check complete"
        );

        CheckResult { report, errors }
    }
}
