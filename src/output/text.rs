//! Text output formatter for human-readable display
//!
//! Prints both report groups as numbered lists:
//!
//! ```text
//! Packages with updates:
//! 1.
//! Package: 'flask'
//! Required version: 1.0.0
//! Last version: 2.0.0
//! -------------
//! ```

use crate::domain::{Dependency, ReportGroup};
use crate::orchestrator::CheckResult;
use crate::output::ReportFormatter;
use colored::Colorize;
use std::io::Write;

/// Line printed after every entry
pub const DIVIDER: &str = "-------------";

/// Shown in place of the last version when the lookup produced none
pub const ABSENT_VERSION: &str = "unknown";

/// Text formatter for human-readable output
pub struct TextFormatter {
    /// Whether to use colors
    color: bool,
}

impl TextFormatter {
    /// Create a new text formatter
    pub fn new(color: bool) -> Self {
        Self { color }
    }

    fn format_header(
        &self,
        group: &ReportGroup<'_>,
        writer: &mut dyn Write,
    ) -> std::io::Result<()> {
        let header = format!("{}:", group.title);
        if !self.color {
            return writeln!(writer, "{}", header);
        }
        if group.has_update {
            writeln!(writer, "{}", header.yellow().bold())
        } else {
            writeln!(writer, "{}", header.green().bold())
        }
    }

    fn format_entry(
        &self,
        number: usize,
        dependency: &Dependency,
        writer: &mut dyn Write,
    ) -> std::io::Result<()> {
        writeln!(writer, "{}.", number)?;
        if self.color {
            writeln!(writer, "Package: '{}'", dependency.name.bold())?;
            writeln!(writer, "Required version: {}", dependency.required_version)?;
            match &dependency.last_version {
                Some(last) if dependency.has_update() => {
                    writeln!(writer, "Last version: {}", last.bright_white().bold())?
                }
                Some(last) => writeln!(writer, "Last version: {}", last)?,
                None => writeln!(writer, "Last version: {}", ABSENT_VERSION.red())?,
            }
            writeln!(writer, "{}", DIVIDER.dimmed())
        } else {
            writeln!(writer, "Package: '{}'", dependency.name)?;
            writeln!(writer, "Required version: {}", dependency.required_version)?;
            writeln!(
                writer,
                "Last version: {}",
                dependency.last_version.as_deref().unwrap_or(ABSENT_VERSION)
            )?;
            writeln!(writer, "{}", DIVIDER)
        }
    }

    fn format_group(
        &self,
        group: &ReportGroup<'_>,
        writer: &mut dyn Write,
    ) -> std::io::Result<()> {
        self.format_header(group, writer)?;

        if group.dependencies.is_empty() {
            writeln!(writer, "  (none)")?;
        }
        for (index, dependency) in group.dependencies.iter().enumerate() {
            self.format_entry(index + 1, dependency, writer)?;
        }

        writeln!(writer)
    }
}

impl ReportFormatter for TextFormatter {
    fn format(&self, result: &CheckResult, writer: &mut dyn Write) -> std::io::Result<()> {
        for group in result.report.groups() {
            self.format_group(&group, writer)?;
        }
        Ok(())
    }
}
