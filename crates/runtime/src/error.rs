//! Error taxonomy for target resolution and secret requests

use std::path::PathBuf;

use serde::Deserialize;
use thiserror::Error;

/// Classified outcome of a failed API call.
///
/// Exactly one variant is produced per failed call: either no response was
/// obtained at all, or a response arrived with a non-2xx status.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    /// No response was obtained (connection refused, TLS, DNS, timeout)
    #[error("No response received for the command")]
    Network {
        /// Transport-level description, kept for logs
        reason: String,
    },

    /// A response was obtained but its status was outside 200..=299
    #[error("{message}")]
    Api {
        /// HTTP status code of the response
        status: u16,
        /// Message parsed from the API's structured error body
        message: String,
    },
}

/// Structured error body returned by the API
#[derive(Debug, Default, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    error_description: Option<String>,
    #[serde(default)]
    detail: Option<String>,
}

impl ApiError {
    /// Build a network error from a transport failure description
    pub fn network(reason: impl Into<String>) -> Self {
        Self::Network {
            reason: reason.into(),
        }
    }

    /// Parse the API's error payload for a non-2xx response
    pub fn from_response(status: u16, body: &[u8]) -> Self {
        let parsed = serde_json::from_slice::<ErrorBody>(body).unwrap_or_default();

        let message = [parsed.error, parsed.error_description, parsed.detail]
            .into_iter()
            .flatten()
            .map(|m| m.trim().to_string())
            .find(|m| !m.is_empty())
            .or_else(|| {
                let text = String::from_utf8_lossy(body).trim().to_string();
                (!text.is_empty() && !text.starts_with('{')).then_some(text)
            })
            .unwrap_or_else(|| format!("The request failed with status {status}"));

        Self::Api { status, message }
    }

    /// HTTP status of an API error, `None` for network errors
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::Network { .. } => None,
            Self::Api { status, .. } => Some(*status),
        }
    }
}

/// Errors surfaced by cm commands
#[derive(Debug, Error)]
pub enum CmError {
    /// The target probe did not pass validation
    #[error("The targeted API does not appear to be valid.")]
    InvalidTarget,

    /// A request URL could not be built from the persisted target
    #[error("Could not build a request URL from '{url}'")]
    InvalidRequestUrl {
        /// The offending URL
        url: String,
    },

    /// The config file could not be written
    #[error("Failed to write config to {}", path.display())]
    Config {
        /// Path of the config file
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// A secret request failed
    #[error(transparent)]
    Api(#[from] ApiError),
}
