//! File-backed persistence of the active target
//!
//! The target lives in a single JSON file, `~/.cm/config.json` by default or
//! `$CM_CONFIG_DIR/config.json` when that variable is set.
//!
//! Writes go to a temporary file in the same directory which is then renamed
//! over the config file, so a reader sees either the old record or the new
//! one. After every write the file is owner read/write only: mode `0600` on
//! Unix, a protected single-entry DACL on Windows.
//!
//! # Example
//!
//! ```rust,no_run
//! use cm_common::config::FileConfigStore;
//! use cm_runtime::deps::ConfigStore;
//!
//! let store = FileConfigStore::from_env()?;
//! if let Some(target) = store.read() {
//!     println!("{}", target.api_url);
//! }
//! # Ok::<(), anyhow::Error>(())
//! ```

use std::ffi::OsString;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tempfile::NamedTempFile;
use tracing::{debug, info, warn};

use cm_runtime::config::{CONFIG_DIR_ENV_VAR, CONFIG_DIR_NAME, CONFIG_FILE_NAME};
use cm_runtime::deps::ConfigStore;
use cm_runtime::error::CmError;
use cm_runtime::models::TargetRecord;

/// Owner-only access for the config file
pub mod permissions;

/// Config store persisting the target record as JSON
#[derive(Debug, Clone)]
pub struct FileConfigStore {
    /// Path to the configuration file
    path: PathBuf,
}

impl FileConfigStore {
    /// Store backed by the file at `path`
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store at the default location, honouring `CM_CONFIG_DIR`
    pub fn from_env() -> Result<Self> {
        Ok(Self::new(Self::default_config_path()?))
    }

    /// Get the default configuration file path
    pub fn default_config_path() -> Result<PathBuf> {
        resolve_config_path(std::env::var_os(CONFIG_DIR_ENV_VAR), dirs::home_dir())
            .context("Could not determine home directory")
    }

    /// Get the path to the configuration file
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn config_error(&self, source: io::Error) -> CmError {
        CmError::Config {
            path: self.path.clone(),
            source,
        }
    }

    fn write_atomically(&self, record: &TargetRecord) -> std::result::Result<(), CmError> {
        let parent = self
            .path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));
        fs::create_dir_all(parent).map_err(|e| self.config_error(e))?;

        let contents = serde_json::to_vec_pretty(record)
            .map_err(|e| self.config_error(io::Error::from(e)))?;

        let mut temp = NamedTempFile::new_in(parent).map_err(|e| self.config_error(e))?;

        permissions::restrict_to_owner(temp.path()).map_err(|e| self.config_error(e))?;

        temp.write_all(&contents)
            .and_then(|()| temp.as_file().sync_all())
            .map_err(|e| self.config_error(e))?;

        temp.persist(&self.path)
            .map_err(|e| self.config_error(e.error))?;

        Ok(())
    }
}

impl ConfigStore for FileConfigStore {
    fn read(&self) -> Option<TargetRecord> {
        let contents = match fs::read(&self.path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "no config file, target is unset");
                return None;
            }
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "failed to read config, treating target as unset");
                return None;
            }
        };

        match serde_json::from_slice::<TargetRecord>(&contents) {
            Ok(record) if record.is_complete() => Some(record),
            Ok(_) => {
                warn!(path = %self.path.display(), "config has an incomplete target, treating target as unset");
                None
            }
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "failed to parse config, treating target as unset");
                None
            }
        }
    }

    fn write(&self, record: &TargetRecord) -> Result<()> {
        self.write_atomically(record)?;
        info!(path = %self.path.display(), api_url = %record.api_url, "persisted target");
        Ok(())
    }
}

/// `$CM_CONFIG_DIR/config.json` when set and non-empty, else `~/.cm/config.json`
fn resolve_config_path(env_dir: Option<OsString>, home: Option<PathBuf>) -> Option<PathBuf> {
    env_dir
        .filter(|dir| !dir.is_empty())
        .map(PathBuf::from)
        .or_else(|| home.map(|home| home.join(CONFIG_DIR_NAME)))
        .map(|dir| dir.join(CONFIG_FILE_NAME))
}
