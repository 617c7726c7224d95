//! Common utilities for the cm CLI
//!
//! Production and test implementations of the dependency traits declared in
//! `cm_runtime::deps` that touch the terminal or the file system.

/// File-backed config store for the active target
pub mod config;
/// User interface implementations
pub mod ui;

pub use config::FileConfigStore;
pub use ui::{RealUserInterface, TestUserInterface};
