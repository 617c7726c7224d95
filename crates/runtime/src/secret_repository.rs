//! Execution of secret requests against the targeted API
//!
//! Callers prepare a request, hand it to a [`SecretRepository`], and get back
//! either a decoded [`SecretBody`] or a classified [`ApiError`]. Raw transport
//! errors and raw non-2xx responses never escape this module.

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::{Method, Request, Url};
use tracing::debug;

use crate::deps::HttpTransport;
use crate::error::{ApiError, CmError};
use crate::models::{SecretBody, TargetRecord};

/// Secret request execution
#[async_trait]
pub trait SecretRepository: Send + Sync {
    /// Send one prepared request and classify the outcome
    async fn send_request(&self, request: Request) -> Result<SecretBody, ApiError>;
}

/// Production repository sending through an injected transport
pub struct RealSecretRepository {
    transport: Arc<dyn HttpTransport>,
}

impl RealSecretRepository {
    /// Create a repository over the given transport
    pub fn new(transport: Arc<dyn HttpTransport>) -> Self {
        Self { transport }
    }
}

#[async_trait]
impl SecretRepository for RealSecretRepository {
    async fn send_request(&self, request: Request) -> Result<SecretBody, ApiError> {
        let url = request.url().clone();

        let response = match self.transport.execute(request).await {
            Ok(response) => response,
            Err(e) => {
                debug!(%url, error = %e, "no response received");
                return Err(ApiError::network(e.0));
            }
        };

        if !response.is_success() {
            return Err(ApiError::from_response(response.status, &response.body));
        }

        let body = SecretBody::from_slice_lenient(&response.body);
        if body.is_empty() && !response.body.is_empty() {
            debug!(%url, status = response.status, "response body did not decode, using empty value");
        }
        Ok(body)
    }
}

/// Build a request for `path` relative to the targeted API
pub fn targeted_request(
    target: &TargetRecord,
    method: Method,
    path: &str,
) -> Result<Request, CmError> {
    let joined = format!(
        "{}/{}",
        target.api_url.trim_end_matches('/'),
        path.trim_start_matches('/')
    );
    let url = Url::parse(&joined).map_err(|_| CmError::InvalidRequestUrl { url: joined })?;
    Ok(Request::new(method, url))
}
