//! Error types for update checks, downloads and install handoff.
//!
//! [`TransportError`] describes what went wrong on the wire, [`UpdateError`]
//! is what the controller reports to the host. Registry failures cross from
//! one to the other only through [`UpdateError::from_registry`].

use std::path::PathBuf;
use std::sync::Arc;
use thiserror::Error;

/// Result type alias for updater operations.
pub type Result<T> = std::result::Result<T, UpdateError>;

/// Failure raised by an HTTP transport.
#[derive(Error, Debug, Clone)]
pub enum TransportError {
    /// The server answered with a non-success status code.
    #[error("GET {url} failed with status {status}: {body}")]
    Status { url: String, status: u16, body: String },

    /// The request could not be sent or the connection broke.
    #[error("Request to {url} failed: {message}")]
    Request { url: String, message: String },

    /// The response body is not what the registry contract promises.
    #[error("Cannot decode response from {url}: {message}")]
    Decode { url: String, message: String },

    #[error("IO error: {0}")]
    Io(Arc<std::io::Error>),
}

impl From<std::io::Error> for TransportError {
    fn from(error: std::io::Error) -> Self {
        TransportError::Io(Arc::new(error))
    }
}

impl TransportError {
    /// `true` when the server reported the resource as missing (HTTP 404).
    pub fn is_not_found(&self) -> bool {
        matches!(self, TransportError::Status { status: 404, .. })
    }
}

/// Errors reported by the update controller.
///
/// Cloneable so the same failure can be both emitted to subscribers and
/// returned to the caller.
#[derive(Error, Debug, Clone)]
pub enum UpdateError {
    #[error("Update feed location is not set")]
    Configuration,

    #[error(
        "No published release found. Verify that user, repository and package are configured correctly, \
         or publish at least one version. {detail}"
    )]
    NotFound { detail: String },

    #[error(transparent)]
    Transport(TransportError),

    #[error("{origin} version is not a valid semver version: \"{value}\"")]
    InvalidVersion { origin: VersionOrigin, value: String },

    #[error("Cannot find suitable file for version {version} in: {candidates:?}")]
    NoSuitableArtifact { version: String, candidates: Vec<String> },

    #[error("Installation has already been triggered")]
    AlreadyInstalling,

    #[error("No update available, can't quit and install")]
    NoUpdateAvailable,

    #[error("An update check is already in progress")]
    CheckInProgress,

    #[error("Download failed: {0}")]
    Download(String),

    #[error("Cannot launch installer {}: {source}", path.display())]
    Launch {
        path: PathBuf,
        #[source]
        source: Arc<std::io::Error>,
    },
}

impl UpdateError {
    /// Classifies a failure coming back from the registry.
    ///
    /// A 404 means nothing has been published for the configured coordinates
    /// and is rewritten into an actionable message. Anything else keeps its
    /// original diagnostic.
    pub fn from_registry(error: TransportError) -> Self {
        if error.is_not_found() {
            UpdateError::NotFound { detail: error.to_string() }
        } else {
            UpdateError::Transport(error)
        }
    }
}

/// Which side of the comparison produced a malformed version string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VersionOrigin {
    /// The version returned by the update server.
    Latest,
    /// The version reported by the running application.
    Running,
}

impl std::fmt::Display for VersionOrigin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            VersionOrigin::Latest => write!(f, "Latest (from update server)"),
            VersionOrigin::Running => write!(f, "App"),
        }
    }
}
