//! Centralized configuration for the cm CLI
//!
//! This module provides a single source of truth for all configuration values
//! used throughout the application.
//!
//! # Environment Variables
//!
//! The following environment variables can be used to override defaults:
//! - `CM_CONFIG_DIR`: Directory holding `config.json` (default `~/.cm`)

/// Environment variable name for overriding the config directory
pub const CONFIG_DIR_ENV_VAR: &str = "CM_CONFIG_DIR";

/// Config directory created under the user's home directory
pub const CONFIG_DIR_NAME: &str = ".cm";

/// File name of the persisted target record
pub const CONFIG_FILE_NAME: &str = "config.json";

/// Path of the discovery endpoint probed when a target is set
pub const INFO_PATH: &str = "/info";

/// Scheme assumed for targets given without one
pub const DEFAULT_SCHEME: &str = "https";

/// Default request timeout in seconds
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;
