//! Aggregated check results
//!
//! Partitions enriched dependencies into those that need attention and
//! those already at the latest published version.

use super::Dependency;
use serde::{Deserialize, Serialize};

/// Title of the group whose pins match the latest release
pub const WITHOUT_UPDATES_TITLE: &str = "Packages without updates";

/// Title of the group whose pins differ from (or could not be checked
/// against) the latest release
pub const WITH_UPDATES_TITLE: &str = "Packages with updates";

/// Result of checking every dependency of one manifest
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateReport {
    /// Dependencies whose required version is not confirmed as latest
    pub with_updates: Vec<Dependency>,
    /// Dependencies whose required version equals the latest version
    pub without_updates: Vec<Dependency>,
}

/// One titled group of the report
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReportGroup<'a> {
    /// Header printed above the group
    pub title: &'static str,
    /// Whether this is the has-update group
    pub has_update: bool,
    /// Members in arrival order
    pub dependencies: &'a [Dependency],
}

impl UpdateReport {
    /// Creates an empty report
    pub fn new() -> Self {
        Self::default()
    }

    /// Partitions records by [`Dependency::has_update`], keeping arrival order
    /// within each group
    pub fn from_records(records: impl IntoIterator<Item = Dependency>) -> Self {
        let (with_updates, without_updates): (Vec<_>, Vec<_>) =
            records.into_iter().partition(|d| d.has_update());
        Self {
            with_updates,
            without_updates,
        }
    }

    /// Total number of dependencies in the report
    pub fn total(&self) -> usize {
        self.with_updates.len() + self.without_updates.len()
    }

    /// Returns true if no dependency was checked
    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }

    /// Both groups in printing order: up-to-date first, then outdated
    pub fn groups(&self) -> [ReportGroup<'_>; 2] {
        [
            ReportGroup {
                title: WITHOUT_UPDATES_TITLE,
                has_update: false,
                dependencies: &self.without_updates,
            },
            ReportGroup {
                title: WITH_UPDATES_TITLE,
                has_update: true,
                dependencies: &self.with_updates,
            },
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn enriched(name: &str, required: &str, last: Option<&str>) -> Dependency {
        Dependency::new(name, required).with_last_version(last.map(String::from))
    }

    fn sample_records() -> Vec<Dependency> {
        vec![
            enriched("requests", "2.0.0", Some("2.0.0")),
            enriched("flask", "1.0.0", Some("2.0.0")),
            enriched("numpy", "1.0.0", None),
            enriched("click", "8.1.7", Some("8.1.7")),
        ]
    }

    #[test]
    fn test_from_records_partitions() {
        let report = UpdateReport::from_records(sample_records());
        let outdated: Vec<_> = report.with_updates.iter().map(|d| d.name.as_str()).collect();
        let current: Vec<_> = report
            .without_updates
            .iter()
            .map(|d| d.name.as_str())
            .collect();

        assert_eq!(outdated, vec!["flask", "numpy"]);
        assert_eq!(current, vec!["requests", "click"]);
        assert_eq!(report.total(), 4);
        assert!(!report.with_updates.is_empty());
    }

    #[test]
    fn test_from_records_is_pure() {
        let first = UpdateReport::from_records(sample_records());
        let second = UpdateReport::from_records(sample_records());
        assert_eq!(first, second);
    }

    #[test]
    fn test_failed_lookups_land_in_with_updates() {
        let records = vec![enriched("a", "1", None), enriched("b", "2", None)];
        let report = UpdateReport::from_records(records);
        assert_eq!(report.with_updates.len(), 2);
        assert!(report.without_updates.is_empty());
    }

    #[test]
    fn test_empty_report() {
        let report = UpdateReport::from_records(Vec::new());
        assert!(report.is_empty());
        assert!(report.with_updates.is_empty());
        assert_eq!(report, UpdateReport::new());
    }

    #[test]
    fn test_duplicates_are_kept() {
        let records = vec![
            enriched("flask", "1.0.0", Some("2.0.0")),
            enriched("flask", "1.0.0", Some("2.0.0")),
        ];
        let report = UpdateReport::from_records(records);
        assert_eq!(report.with_updates.len(), 2);
    }

    #[test]
    fn test_groups_order() {
        let report = UpdateReport::from_records(sample_records());
        let [first, second] = report.groups();
        assert_eq!(first.title, WITHOUT_UPDATES_TITLE);
        assert!(!first.has_update);
        assert_eq!(first.dependencies.len(), 2);
        assert_eq!(second.title, WITH_UPDATES_TITLE);
        assert!(second.has_update);
        assert_eq!(second.dependencies.len(), 2);
    }
}
