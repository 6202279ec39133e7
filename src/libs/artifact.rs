//! Installer selection among the files attached to a release.
//!
//! A release usually carries more than the installer: portable builds,
//! blockmaps, checksums, debug symbols. The installer is the file whose name
//! ends with `<version>.<extension>` and contains the installer marker
//! (case-sensitive), e.g. `App-Setup-1.2.0.exe`. Names that are not a single
//! plain file name (separators, `.`/`..`, absolute paths) never match: the
//! name becomes the staged file name.

use super::error::{Result, UpdateError};
use crate::api::RegistryFile;
use serde::{Deserialize, Serialize};
use std::ffi::OsStr;
use std::path::{Component, Path};

/// How the installer asset is recognised and how it is run.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct InstallerConfig {
    /// Substring that identifies the installer among the release files.
    pub marker: String,
    /// File extension of the installer, without the dot.
    pub extension: String,
    /// Arguments passed to the installer for an unattended install.
    pub silent_args: Vec<String>,
}

impl Default for InstallerConfig {
    fn default() -> Self {
        Self {
            marker: "Setup".to_string(),
            extension: "exe".to_string(),
            silent_args: vec!["/S".to_string()],
        }
    }
}

impl InstallerConfig {
    fn matches(&self, file_name: &str, suffix: &str) -> bool {
        file_name.ends_with(suffix) && file_name.contains(&self.marker) && is_plain_file_name(file_name)
    }
}

/// True when `name` is exactly one normal path component on every platform.
pub fn is_plain_file_name(name: &str) -> bool {
    if name.contains(['/', '\\', ':']) {
        return false;
    }
    let mut components = Path::new(name).components();
    matches!((components.next(), components.next()), (Some(Component::Normal(part)), None) if part == OsStr::new(name))
}

/// Picks the installer for `version` out of `files`.
///
/// When several files match, the lexicographically smallest name wins so the
/// choice does not depend on the order the registry happens to list files in.
pub fn select_installer<'a>(files: &'a [RegistryFile], version: &str, config: &InstallerConfig) -> Result<&'a RegistryFile> {
    let suffix = format!("{}.{}", version, config.extension);
    let mut candidates: Vec<&RegistryFile> = files.iter().filter(|file| config.matches(&file.name, &suffix)).collect();
    candidates.sort_by(|a, b| a.name.cmp(&b.name));

    match candidates.as_slice() {
        [] => Err(UpdateError::NoSuitableArtifact {
            version: version.to_string(),
            candidates: files.iter().map(|file| file.name.clone()).collect(),
        }),
        [single] => Ok(single),
        [first, rest @ ..] => {
            tracing::warn!(
                version,
                selected = %first.name,
                ignored = ?rest.iter().map(|file| file.name.as_str()).collect::<Vec<_>>(),
                "several installer candidates match, picking the first by name"
            );
            Ok(first)
        }
    }
}
