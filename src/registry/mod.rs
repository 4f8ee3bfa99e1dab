//! Registry clients for looking up the latest package version
//!
//! This module provides:
//! - HTTP client shared foundation
//! - PyPI JSON API client

mod client;
mod pypi;

pub use client::{HttpClient, DEFAULT_TIMEOUT};
pub use pypi::{PyPIClient, DEFAULT_PYPI_URL};

use crate::error::RegistryError;
use async_trait::async_trait;

/// Outcome of a single registry lookup
#[derive(Debug)]
pub enum VersionLookup {
    /// The registry reported this version as the latest
    Found(String),
    /// The registry answered but has no usable record (non-200 status)
    NotFound,
    /// The lookup itself failed (network, timeout, malformed body)
    Failed(RegistryError),
}

impl VersionLookup {
    /// The latest version, if the lookup produced one
    pub fn into_version(self) -> Option<String> {
        match self {
            VersionLookup::Found(version) => Some(version),
            VersionLookup::NotFound | VersionLookup::Failed(_) => None,
        }
    }
}

/// Trait for registry clients.
///
/// Implementations must never panic on network problems: every failure is
/// reported as [`VersionLookup::Failed`].
#[async_trait]
pub trait RegistryClient: Send + Sync {
    /// Get the registry name
    fn registry_name(&self) -> &'static str;

    /// Look up the latest published version of a package
    async fn lookup(&self, package: &str) -> VersionLookup;
}
