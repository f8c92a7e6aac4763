//! Configuration module
//!
//! Resolves how to reach the job service: the URL from the command line or
//! the secret store, plus an optional API token secret.

use anyhow::{Context, Result};
use jobwatch_client::ServiceClient;
use jobwatch_watcher::SecretStore;
use reqwest::Client;
use std::time::Duration;

/// Secret holding the service URL when `--service-url` is not given
pub const SERVICE_URL_SECRET: &str = "service_url";

/// Secret holding the bearer token, if the service wants one
pub const API_TOKEN_SECRET: &str = "api_token";

/// Bound on a single HTTP call unless `--request-timeout` says otherwise
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

/// CLI configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// URL of the job service
    pub service_url: String,
    /// Bearer token sent with every request
    pub api_token: Option<String>,
    /// Bound on each HTTP call to the service
    pub request_timeout: Duration,
}

impl Config {
    /// Builds the configuration from an optional URL and the secret store
    pub fn resolve(service_url: Option<String>, secrets: &SecretStore) -> Result<Self> {
        let service_url = match service_url {
            Some(url) => url,
            None => secrets.get(SERVICE_URL_SECRET).with_context(|| {
                format!(
                    "No service URL: pass --service-url or provide the {} secret",
                    SERVICE_URL_SECRET
                )
            })?,
        };

        if !service_url.starts_with("http://") && !service_url.starts_with("https://") {
            anyhow::bail!("service URL must start with http:// or https://");
        }

        let api_token = secrets
            .get_optional(API_TOKEN_SECRET)
            .context("Failed to read API token")?;

        Ok(Self {
            service_url,
            api_token,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
        })
    }

    /// Overrides the per-request timeout
    pub fn with_request_timeout(mut self, request_timeout: Duration) -> Self {
        self.request_timeout = request_timeout;
        self
    }

    /// Client for the configured service
    ///
    /// Every HTTP call is bounded by `request_timeout`, so a stalled service
    /// surfaces as a transient error instead of a hang.
    pub fn client(&self) -> Result<ServiceClient> {
        let http = Client::builder()
            .timeout(self.request_timeout)
            .build()
            .context("Failed to build HTTP client")?;

        let client = ServiceClient::with_client(&self.service_url, http);
        Ok(match &self.api_token {
            Some(token) => client.with_token(token),
            None => client,
        })
    }
}
