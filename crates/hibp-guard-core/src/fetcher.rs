//! HTTP range client.
//!
//! [`RangeSource`] is the seam the cache fetches through; [`RangeClient`] is
//! the reqwest-backed implementation. Each lookup is a single
//! `GET {endpoint}{prefix}` with `Add-Padding: true`. There are no retries.
//! Timeouts, non-success statuses and transport failures map to
//! [`Error::Timeout`], [`Error::Status`] and [`Error::Network`].

use crate::{Error, Result};
use async_trait::async_trait;
use reqwest::Client;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;
use url::Url;

/// Public Pwned Passwords range endpoint. The prefix is appended verbatim.
pub const DEFAULT_ENDPOINT: &str = "https://api.pwnedpasswords.com/range/";

/// Default request timeout for range lookups.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

/// Header asking the range service to pad responses with zero-count rows.
pub const ADD_PADDING_HEADER: &str = "Add-Padding";

/// Source of raw range bodies keyed by hash prefix.
#[async_trait]
pub trait RangeSource: Send + Sync {
    /// Fetch the raw `SUFFIX:COUNT` body for a 5-character prefix.
    async fn fetch_range(&self, prefix: &str) -> Result<String>;
}

#[async_trait]
impl<T: RangeSource + ?Sized> RangeSource for Arc<T> {
    async fn fetch_range(&self, prefix: &str) -> Result<String> {
        self.as_ref().fetch_range(prefix).await
    }
}

/// HTTP client for the range API. Issues exactly one request per call.
#[derive(Debug, Clone)]
pub struct RangeClient {
    client: Client,
    endpoint: String,
}

impl RangeClient {
    /// Creates a client against the public endpoint with the default timeout
    pub fn new() -> Result<Self> {
        Self::with_endpoint(DEFAULT_ENDPOINT, DEFAULT_TIMEOUT)
    }

    /// Creates a client against a custom endpoint (mirrors, tests)
    pub fn with_endpoint(endpoint: &str, timeout: Duration) -> Result<Self> {
        Url::parse(endpoint).map_err(|e| Error::InvalidUrl(format!("{endpoint}: {e}")))?;

        let client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("hibp-guard/", env!("CARGO_PKG_VERSION")))
            .gzip(true)
            .brotli(true)
            .build()
            .map_err(Error::Network)?;

        Ok(Self {
            client,
            endpoint: endpoint.to_string(),
        })
    }

    /// The endpoint prefixes are appended to
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn classify(err: reqwest::Error) -> Error {
        if err.is_timeout() {
            Error::Timeout(err.to_string())
        } else {
            Error::Network(err)
        }
    }
}

#[async_trait]
impl RangeSource for RangeClient {
    async fn fetch_range(&self, prefix: &str) -> Result<String> {
        let url = format!("{}{prefix}", self.endpoint);
        debug!(prefix, "requesting range");

        let response = self
            .client
            .get(&url)
            .header(ADD_PADDING_HEADER, "true")
            .send()
            .await
            .map_err(Self::classify)?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::Status {
                status: status.as_u16(),
                prefix: prefix.to_string(),
            });
        }

        let body = response.text().await.map_err(Self::classify)?;
        debug!(prefix, bytes = body.len(), "range fetched");
        Ok(body)
    }
}
