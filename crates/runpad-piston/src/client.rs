//! HTTP client for the execution service.
//!
//! ## Learning: `async_trait`
//!
//! Trait methods returning futures need boxing to be object safe.
//! `#[async_trait]` does that for us, so the controller can hold an
//! `Arc<dyn Executor>` and swap implementations freely.

use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;

use crate::wire::{ExecuteRequest, ExecuteResponse, Runtime, RuntimeInfo};
use crate::ExecResult;

/// Public Piston instance.
pub const DEFAULT_ENDPOINT: &str = "https://emkc.org/api/v2/piston/execute";

/// Per-request timeout unless configured otherwise.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Something that can run source code in a runtime.
#[async_trait]
pub trait Executor: Send + Sync {
    /// Submits `source` as a single file and returns the parsed response.
    ///
    /// Rejections reported by the service are `Ok` responses carrying a
    /// `message`; only transport and decoding problems are `Err`.
    async fn execute(&self, runtime: &Runtime, source: &str) -> ExecResult<ExecuteResponse>;
}

/// [`Executor`] backed by a Piston HTTP endpoint.
#[derive(Debug, Clone)]
pub struct PistonClient {
    client: Client,
    endpoint: String,
    timeout: Duration,
}

impl PistonClient {
    /// Creates a client for the given `.../execute` endpoint.
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            endpoint: endpoint.into(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Sets the per-request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Replaces the underlying HTTP client.
    pub fn with_client(mut self, client: Client) -> Self {
        self.client = client;
        self
    }

    /// Returns the execute endpoint.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Lists the runtimes installed on the service.
    pub async fn runtimes(&self) -> ExecResult<Vec<RuntimeInfo>> {
        let url = self.runtimes_url();
        tracing::debug!("Fetching runtimes from {}", url);

        let body = self
            .client
            .get(&url)
            .timeout(self.timeout)
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;

        Ok(serde_json::from_str(&body)?)
    }

    /// `.../execute` becomes `.../runtimes`.
    fn runtimes_url(&self) -> String {
        let trimmed = self.endpoint.trim_end_matches('/');
        let base = trimmed.strip_suffix("/execute").unwrap_or(trimmed);
        format!("{base}/runtimes")
    }
}

impl Default for PistonClient {
    fn default() -> Self {
        Self::new(DEFAULT_ENDPOINT)
    }
}

#[async_trait]
impl Executor for PistonClient {
    async fn execute(&self, runtime: &Runtime, source: &str) -> ExecResult<ExecuteResponse> {
        let request = ExecuteRequest::new(runtime, source);
        tracing::debug!(%runtime, endpoint = %self.endpoint, "Submitting execution request");

        let response = self
            .client
            .post(&self.endpoint)
            .json(&request)
            .timeout(self.timeout)
            .send()
            .await?;

        // Rejections come back as 4xx with a JSON `message`, so the body is
        // decoded regardless of status.
        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            tracing::debug!(%status, "Execution service returned an error status");
        }

        Ok(serde_json::from_str(&body)?)
    }
}
