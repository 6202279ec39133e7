//! Registry access for update checks.
//!
//! The updater never talks HTTP directly. It goes through the [`Transport`]
//! trait, which has a `reqwest` implementation in [`http`] and can be swapped
//! for an in-memory double in tests. On top of it [`bintray`] speaks the
//! registry's REST dialect: the "latest version" pointer, the per-version
//! file listing and the public download location.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use nsis_updater::api::{bintray::{BintrayClient, FeedLocation}, http::HttpTransport};
//!
//! # async fn run() -> nsis_updater::libs::error::Result<()> {
//! let feed = FeedLocation::new("lacodda", "generic", "my-app");
//! let client = BintrayClient::new(&feed, Arc::new(HttpTransport::default()));
//! let latest = client.get_latest_version().await?;
//! println!("latest: {}", latest.version);
//! # Ok(())
//! # }
//! ```

use crate::libs::error::TransportError;
use async_trait::async_trait;
use std::path::Path;

pub mod bintray;
pub mod http;

pub use bintray::{BintrayClient, FeedLocation, RegistryFile, VersionInfo};
pub use http::{HttpConfig, HttpTransport};

/// Minimal HTTP surface the updater depends on.
///
/// Implementations own TLS, redirects, retries and timeouts. They must report
/// non-success statuses as [`TransportError::Status`] so that a 404 can be
/// told apart from every other failure.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Issues a GET request and parses the body as JSON.
    async fn get_json(&self, url: &str) -> Result<serde_json::Value, TransportError>;

    /// Streams the body of a GET request into `destination`, returning the
    /// number of bytes written.
    async fn download(&self, url: &str, destination: &Path) -> Result<u64, TransportError>;
}
