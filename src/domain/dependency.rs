//! Declared dependency records

use serde::{Deserialize, Serialize};
use std::fmt;

/// A dependency declared in requirements.txt, optionally enriched with the
/// latest version known to the registry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dependency {
    /// Package name
    pub name: String,
    /// Version exactly as written after the comparison operator
    pub required_version: String,
    /// Latest published version; `None` until a lookup succeeds
    pub last_version: Option<String>,
}

impl Dependency {
    /// Creates a new dependency that has not been looked up yet
    pub fn new(name: impl Into<String>, required_version: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            required_version: required_version.into(),
            last_version: None,
        }
    }

    /// Consumes the record and returns the enriched copy
    pub fn with_last_version(self, last_version: Option<String>) -> Self {
        Self {
            last_version,
            ..self
        }
    }

    /// Returns true unless the registry confirmed the required version is the latest.
    ///
    /// A missing `last_version` counts as an update: the tool cannot prove
    /// the pin is current.
    pub fn has_update(&self) -> bool {
        match &self.last_version {
            Some(last) => last != &self.required_version,
            None => true,
        }
    }
}

impl fmt::Display for Dependency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.last_version {
            Some(last) => write!(f, "{} {} (latest {})", self.name, self.required_version, last),
            None => write!(f, "{} {}", self.name, self.required_version),
        }
    }
}
