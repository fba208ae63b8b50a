pub mod db;
pub mod equipment;
pub mod maps;
pub mod notifier;

use crate::errors::TransitError;
use reqwest::{Client as ReqwestClient, RequestBuilder, Response};
use serde::Deserialize;
use std::time::Duration;
use tracing::warn;

/// Pause between two attempts at the same downstream request.
const RETRY_PAUSE: Duration = Duration::from_millis(250);

/// Connection options shared by every downstream HTTP service.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct ServiceOptions {
    /// The base URL of the service.
    pub api_url: String,
    /// Per-request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// How many extra attempts are made after a transport error or a 5xx.
    #[serde(default)]
    pub retries: u32,
}

fn default_timeout_secs() -> u64 {
    10
}

impl ServiceOptions {
    pub fn new(api_url: impl Into<String>) -> Self {
        Self {
            api_url: api_url.into(),
            timeout_secs: default_timeout_secs(),
            retries: 0,
        }
    }

    /// Joins `path` onto the base URL.
    pub(crate) fn endpoint(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.api_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }

    /// Builds a reqwest client honouring the configured timeout.
    pub(crate) fn build_client(&self) -> Result<ReqwestClient, TransitError> {
        ReqwestClient::builder()
            .timeout(Duration::from_secs(self.timeout_secs))
            .build()
            .map_err(TransitError::ReqwestClientBuild)
    }
}

/// Sends the request produced by `build`, retrying transport errors and 5xx
/// responses up to `retries` more times.
///
/// The last outcome is returned as-is, so a 5xx that exhausted its retries
/// still comes back as `Ok(response)`.
pub(crate) async fn send_with_retries<F>(
    service: &str,
    retries: u32,
    build: F,
) -> Result<Response, reqwest::Error>
where
    F: Fn() -> RequestBuilder,
{
    let mut attempt = 0;
    loop {
        let result = build().send().await;
        let retryable = match &result {
            Ok(response) => response.status().is_server_error(),
            Err(e) => !e.is_builder(),
        };
        if !retryable || attempt >= retries {
            return result;
        }
        attempt += 1;
        match &result {
            Ok(response) => warn!(
                "{service} answered {}; retrying (attempt {attempt} of {retries}).",
                response.status()
            ),
            Err(e) => warn!("{service} request failed: {e}; retrying (attempt {attempt} of {retries})."),
        }
        tokio::time::sleep(RETRY_PAUSE).await;
    }
}
