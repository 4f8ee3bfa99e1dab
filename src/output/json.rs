//! JSON output formatter for machine processing

use crate::domain::Dependency;
use crate::orchestrator::CheckResult;
use crate::output::ReportFormatter;
use serde::Serialize;
use std::io::Write;

/// JSON formatter for machine-readable output
#[derive(Debug, Default)]
pub struct JsonFormatter;

impl JsonFormatter {
    /// Create a new JSON formatter
    pub fn new() -> Self {
        Self
    }
}

/// JSON representation of the full result
#[derive(Serialize)]
struct JsonOutput<'a> {
    /// Dependencies whose pin is not confirmed as latest
    with_updates: &'a [Dependency],
    /// Dependencies already at the latest version
    without_updates: &'a [Dependency],
    /// Manifest problems encountered while reading
    errors: Vec<String>,
}

impl ReportFormatter for JsonFormatter {
    fn format(&self, result: &CheckResult, writer: &mut dyn Write) -> std::io::Result<()> {
        let output = JsonOutput {
            with_updates: &result.report.with_updates,
            without_updates: &result.report.without_updates,
            errors: result.errors.iter().map(|e| e.to_string()).collect(),
        };

        serde_json::to_writer_pretty(&mut *writer, &output)?;
        writeln!(writer)
    }
}
