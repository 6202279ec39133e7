//! Per-user storage location of the updater's own files.
//!
//! Only the configuration lives here. Staged installers go to the system
//! temporary directory instead, see [`crate::libs::update`].

use anyhow::{Context, Result};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

pub const VENDOR_NAME: &str = "lacodda";
pub const APP_NAME: &str = "nsis-updater";

#[derive(Debug, Clone)]
pub struct DataStorage {
    base_path: PathBuf,
}

impl DataStorage {
    /// Storage under the platform data directory:
    ///
    /// - **Windows**: `%LOCALAPPDATA%\lacodda\nsis-updater`
    /// - **macOS**: `~/Library/Application Support/lacodda/nsis-updater`
    /// - **Linux**: `~/.local/share/lacodda/nsis-updater`
    ///
    /// Falls back to the working directory when the variable is unset.
    pub fn new() -> Self {
        Self::under(platform_data_dir())
    }

    /// Storage under an explicit data directory.
    pub fn under(data_dir: impl AsRef<Path>) -> Self {
        Self {
            base_path: data_dir.as_ref().join(VENDOR_NAME).join(APP_NAME),
        }
    }

    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    /// Path of `file_name` in the storage directory, created on demand.
    pub fn get_path(&self, file_name: &str) -> Result<PathBuf> {
        fs::create_dir_all(&self.base_path)
            .with_context(|| format!("cannot create data directory {}", self.base_path.display()))?;
        Ok(self.base_path.join(file_name))
    }
}

impl Default for DataStorage {
    fn default() -> Self {
        Self::new()
    }
}

fn platform_data_dir() -> PathBuf {
    let from_env = |name: &str| env::var_os(name).map(PathBuf::from).unwrap_or_else(|| PathBuf::from("."));
    if cfg!(windows) {
        from_env("LOCALAPPDATA")
    } else if cfg!(target_os = "macos") {
        from_env("HOME").join("Library").join("Application Support")
    } else {
        from_env("HOME").join(".local").join("share")
    }
}
