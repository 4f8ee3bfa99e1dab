//! HTTP client shared foundation
//!
//! This module provides a shared HTTP client with:
//! - Configurable per-request timeout and User-Agent
//! - One request per lookup, no retries
//! - Transport error classification (timeout vs. network)

use crate::error::RegistryError;
use reqwest::{Client, Response};
use std::time::Duration;

/// Default timeout for a single registry request (60 seconds)
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

/// Default User-Agent header
const DEFAULT_USER_AGENT: &str = concat!("reqcheck/", env!("CARGO_PKG_VERSION"));

/// HTTP client wrapper shared by every worker.
///
/// Cloning is cheap; clones share the same connection pool.
#[derive(Clone, Debug)]
pub struct HttpClient {
    client: Client,
    timeout: Duration,
}

impl HttpClient {
    /// Create a new HTTP client with default settings
    pub fn new() -> Result<Self, RegistryError> {
        Self::with_config(DEFAULT_TIMEOUT, DEFAULT_USER_AGENT)
    }

    /// Create a new HTTP client with custom configuration
    pub fn with_config(timeout: Duration, user_agent: &str) -> Result<Self, RegistryError> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(user_agent)
            .build()
            .map_err(|e| RegistryError::ClientBuild {
                message: e.to_string(),
            })?;

        Ok(Self { client, timeout })
    }

    /// Create a client with the default User-Agent and the given timeout
    pub fn with_timeout(timeout: Duration) -> Result<Self, RegistryError> {
        Self::with_config(timeout, DEFAULT_USER_AGENT)
    }

    /// Per-request timeout
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Perform a single GET request.
    ///
    /// Any HTTP status is returned as `Ok`; only transport failures are errors.
    pub async fn get(
        &self,
        url: &str,
        package: &str,
        registry: &str,
    ) -> Result<Response, RegistryError> {
        self.client
            .get(url)
            .send()
            .await
            .map_err(|e| RegistryError::from_reqwest(&e, package, registry))
    }
}
