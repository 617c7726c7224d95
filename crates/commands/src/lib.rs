//! Command implementations for the cm CLI
//!
//! This crate contains the CLI command implementations for cm. Each command
//! takes its dependencies through a `*Dependencies` struct so it can be
//! exercised without a terminal, a network, or a home directory.

/// Command implementations module
pub mod commands;

#[cfg(test)]
pub mod test_helpers;

// Re-export all commands at the crate root for easier access
pub use commands::api;
