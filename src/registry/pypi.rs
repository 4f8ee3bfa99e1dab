//! PyPI JSON API client
//!
//! Fetches the latest release of a package from PyPI.
//! API endpoint: https://pypi.org/pypi/{package}/json

use crate::error::RegistryError;
use crate::registry::{HttpClient, RegistryClient, VersionLookup};
use async_trait::async_trait;
use reqwest::StatusCode;
use serde::Deserialize;
use tracing::debug;

/// Default PyPI base URL
pub const DEFAULT_PYPI_URL: &str = "https://pypi.org";

/// PyPI client
pub struct PyPIClient {
    client: HttpClient,
    base_url: String,
}

/// PyPI package metadata response
#[derive(Debug, Deserialize)]
struct PyPIResponse {
    info: PyPIInfo,
}

/// Package information block
#[derive(Debug, Deserialize)]
struct PyPIInfo {
    /// Latest version according to PyPI
    version: String,
}

impl PyPIClient {
    /// Create a client against the public PyPI
    pub fn new(client: HttpClient) -> Self {
        Self::with_base_url(client, DEFAULT_PYPI_URL)
    }

    /// Create a client against a PyPI-compatible mirror
    pub fn with_base_url(client: HttpClient, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { client, base_url }
    }

    /// Build the URL for a package
    fn build_url(&self, package: &str) -> String {
        format!("{}/pypi/{}/json", self.base_url, package)
    }
}

#[async_trait]
impl RegistryClient for PyPIClient {
    fn registry_name(&self) -> &'static str {
        "PyPI"
    }

    async fn lookup(&self, package: &str) -> VersionLookup {
        let url = self.build_url(package);
        debug!(package, %url, "fetching latest version");

        let response = match self.client.get(&url, package, self.registry_name()).await {
            Ok(response) => response,
            Err(e) => return VersionLookup::Failed(e),
        };

        if response.status() != StatusCode::OK {
            debug!(package, status = %response.status(), "package not found");
            return VersionLookup::NotFound;
        }

        match response.json::<PyPIResponse>().await {
            Ok(body) => VersionLookup::Found(body.info.version),
            Err(e) if e.is_timeout() => {
                VersionLookup::Failed(RegistryError::timeout(package, self.registry_name()))
            }
            Err(e) => VersionLookup::Failed(RegistryError::invalid_response(
                package,
                self.registry_name(),
                format!("failed to parse JSON: {}", e),
            )),
        }
    }
}
