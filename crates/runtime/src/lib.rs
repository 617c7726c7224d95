//! Core functionality for the cm CLI
//!
//! This crate contains the foundational types used across the cm CLI:
//! the persisted target model, the error taxonomy, the dependency injection
//! interfaces, and the executor that runs secret requests against the API.

/// Configuration constants
pub mod config;
/// Dependency injection traits and implementations
pub mod deps;
/// Error types surfaced to the user
pub mod error;
/// Wire and persisted data models
pub mod models;
/// Execution and classification of secret requests
pub mod secret_repository;

#[cfg(test)]
pub mod test_helpers;

// Re-export commonly used types at the crate root
pub use config::{
    CONFIG_DIR_ENV_VAR, CONFIG_DIR_NAME, CONFIG_FILE_NAME, DEFAULT_REQUEST_TIMEOUT_SECS,
    DEFAULT_SCHEME, INFO_PATH,
};
pub use deps::{
    ConfigStore, HttpTransport, MessageStyle, ReqwestTransport, TransportError,
    TransportResponse, UserInterface,
};
pub use error::{ApiError, CmError};
pub use models::{AppInfo, AuthServerInfo, InfoResponse, SecretBody, TargetRecord};
pub use secret_repository::{RealSecretRepository, SecretRepository, targeted_request};
