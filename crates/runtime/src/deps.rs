//! Dependency injection traits for testability
//!
//! This module provides trait abstractions for all external dependencies,
//! allowing for easy mocking and testing.

use std::time::Duration;

use anyhow::Result;
use async_trait::async_trait;
use thiserror::Error;
use tracing::debug;

use crate::config::DEFAULT_REQUEST_TIMEOUT_SECS;
use crate::models::TargetRecord;

/// Fully read HTTP response handed back by a transport
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportResponse {
    /// HTTP status code
    pub status: u16,
    /// Raw response body
    pub body: Vec<u8>,
}

impl TransportResponse {
    /// Create a response from a status and body
    pub fn new(status: u16, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    /// Whether the status is within 200..=299
    pub const fn is_success(&self) -> bool {
        self.status >= 200 && self.status <= 299
    }
}

/// Failure to obtain any response at all
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{0}")]
pub struct TransportError(pub String);

/// HTTP transport operations
#[async_trait]
pub trait HttpTransport: Send + Sync {
    /// Send a prepared request exactly once and read the full response
    async fn execute(
        &self,
        request: reqwest::Request,
    ) -> std::result::Result<TransportResponse, TransportError>;
}

/// Persistence of the active target
pub trait ConfigStore: Send + Sync {
    /// Load the persisted target; unreadable or corrupt storage reads as `None`
    fn read(&self) -> Option<TargetRecord>;

    /// Replace the persisted target as a whole
    fn write(&self, record: &TargetRecord) -> Result<()>;
}

/// User interface operations
pub trait UserInterface: Send + Sync {
    /// Print a message
    fn print(&self, message: &str);

    /// Print a styled message
    fn print_styled(&self, message: &str, style: MessageStyle);
}

/// Message styling options
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageStyle {
    /// Warning style (typically yellow)
    Warning,
}

// Production implementations

/// Production transport backed by reqwest
#[derive(Clone)]
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    /// Transport verifying TLS peers, used for secret operations
    pub fn new() -> Result<Self> {
        Self::build(false)
    }

    /// Transport that skips TLS peer verification.
    ///
    /// Only the first-contact `/info` probe uses this: the client has no trust
    /// anchor for a target it has never seen (trust on first use).
    pub fn insecure() -> Result<Self> {
        Self::build(true)
    }

    fn build(accept_invalid_certs: bool) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS))
            .danger_accept_invalid_certs(accept_invalid_certs)
            .redirect(reqwest::redirect::Policy::none())
            .build()
            .map_err(|e| anyhow::anyhow!("Failed to build HTTP client: {}", e))?;

        Ok(Self { client })
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn execute(
        &self,
        request: reqwest::Request,
    ) -> std::result::Result<TransportResponse, TransportError> {
        let method = request.method().clone();
        let url = request.url().clone();
        debug!(%method, %url, "sending HTTP request");

        let response = self.client.execute(request).await.map_err(|e| {
            debug!(%method, %url, error = %e, "HTTP request failed");
            TransportError(e.to_string())
        })?;

        let status = response.status().as_u16();
        let body = response
            .bytes()
            .await
            .map_err(|e| TransportError(format!("Failed to read response body: {e}")))?;
        debug!(%method, %url, status, bytes = body.len(), "received HTTP response");

        Ok(TransportResponse::new(status, body.to_vec()))
    }
}
