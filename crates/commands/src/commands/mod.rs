//! Command implementations

/// Target the credential-manager API
pub mod api;
