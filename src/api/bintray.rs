//! Bintray registry client.
//!
//! Resolves the latest published version of a package and lists the files
//! attached to a version. Every failure goes through
//! [`UpdateError::from_registry`] so a missing release (404) is reported
//! with an actionable message instead of a bare transport error.
//!
//! ## Endpoints
//!
//! - `GET {api_url}/packages/{user}/{repo}/{package}/versions/_latest`
//! - `GET {api_url}/packages/{user}/{repo}/{package}/versions/{version}/files`
//! - downloads from `{download_url}/{user}/{repo}/{file}`

use super::Transport;
use crate::libs::config::ConfigModule;
use crate::libs::error::{Result, TransportError, UpdateError};
use crate::libs::messages::Message;
use crate::msg_print;
use dialoguer::{theme::ColorfulTheme, Input};
use reqwest::Url;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

pub const DEFAULT_API_URL: &str = "https://api.bintray.com";
pub const DEFAULT_DOWNLOAD_URL: &str = "https://dl.bintray.com";

/// Version name the registry resolves to the newest published version.
const LATEST_VERSION: &str = "_latest";

/// Coordinates of the release feed.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct FeedLocation {
    /// Registry subject (user or organization) owning the repository.
    pub user: String,
    /// Repository holding the package.
    pub repo: String,
    /// Package whose versions are published.
    pub package: String,
    /// REST API root.
    #[serde(default = "default_api_url")]
    pub api_url: String,
    /// Public download root.
    #[serde(default = "default_download_url")]
    pub download_url: String,
}

fn default_api_url() -> String {
    DEFAULT_API_URL.to_string()
}

fn default_download_url() -> String {
    DEFAULT_DOWNLOAD_URL.to_string()
}

impl FeedLocation {
    pub fn new(user: &str, repo: &str, package: &str) -> Self {
        Self {
            user: user.to_string(),
            repo: repo.to_string(),
            package: package.to_string(),
            api_url: default_api_url(),
            download_url: default_download_url(),
        }
    }

    /// Points both the API and the download root at `base_url`.
    pub fn with_base_url(mut self, base_url: &str) -> Self {
        let base_url = base_url.trim_end_matches('/');
        self.api_url = base_url.to_string();
        self.download_url = base_url.to_string();
        self
    }

    pub fn module() -> ConfigModule {
        ConfigModule {
            key: "feed".to_string(),
            name: "Release feed".to_string(),
        }
    }

    pub fn init(config: &Option<Self>) -> anyhow::Result<Self> {
        let config = config.clone().unwrap_or_else(|| Self::new("", "", ""));
        msg_print!(Message::ConfigModuleFeed);
        Ok(Self {
            user: Input::with_theme(&ColorfulTheme::default())
                .with_prompt(Message::PromptFeedUser.to_string())
                .default(config.user)
                .interact_text()?,
            repo: Input::with_theme(&ColorfulTheme::default())
                .with_prompt(Message::PromptFeedRepo.to_string())
                .default(config.repo)
                .interact_text()?,
            package: Input::with_theme(&ColorfulTheme::default())
                .with_prompt(Message::PromptFeedPackage.to_string())
                .default(config.package)
                .interact_text()?,
            api_url: Input::with_theme(&ColorfulTheme::default())
                .with_prompt(Message::PromptFeedApiUrl.to_string())
                .default(config.api_url)
                .interact_text()?,
            download_url: Input::with_theme(&ColorfulTheme::default())
                .with_prompt(Message::PromptFeedDownloadUrl.to_string())
                .default(config.download_url)
                .interact_text()?,
        })
    }

    /// `{api_url}/packages/{user}/{repo}/{package}/{tail..}`
    fn api_endpoint(&self, tail: &[&str]) -> Result<String> {
        let package = [self.user.as_str(), self.repo.as_str(), self.package.as_str()];
        join_segments(&self.api_url, std::iter::once("packages").chain(package).chain(tail.iter().copied()))
    }
}

/// Appends percent-encoded path segments to `base`.
fn join_segments<'a>(base: &str, segments: impl IntoIterator<Item = &'a str>) -> Result<String> {
    let invalid = |message: String| {
        UpdateError::Transport(TransportError::Request {
            url: base.to_string(),
            message,
        })
    };
    let mut url = Url::parse(base).map_err(|e| invalid(format!("invalid base URL: {e}")))?;
    url.path_segments_mut()
        .map_err(|_| invalid("base URL cannot carry a path".to_string()))?
        .pop_if_empty()
        .extend(segments);
    Ok(url.into())
}

impl std::fmt::Display for FeedLocation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}/{}", self.user, self.repo, self.package)
    }
}

/// Version pointer returned by the registry. The string is not validated.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct VersionInfo {
    pub version: String,
}

#[derive(Deserialize, Debug)]
struct VersionResponse {
    name: String,
}

/// One entry of a version's file listing.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct RegistryFile {
    pub name: String,
    #[serde(default)]
    pub size: Option<u64>,
    #[serde(default)]
    pub sha256: Option<String>,
}

impl RegistryFile {
    pub fn named(name: &str) -> Self {
        Self {
            name: name.to_string(),
            size: None,
            sha256: None,
        }
    }
}

/// Registry client bound to one [`FeedLocation`].
#[derive(Clone)]
pub struct BintrayClient {
    feed: FeedLocation,
    transport: Arc<dyn Transport>,
}

impl BintrayClient {
    pub fn new(feed: &FeedLocation, transport: Arc<dyn Transport>) -> Self {
        Self {
            feed: feed.clone(),
            transport,
        }
    }

    pub fn feed(&self) -> &FeedLocation {
        &self.feed
    }

    /// Queries the registry's "latest" pointer.
    pub async fn get_latest_version(&self) -> Result<VersionInfo> {
        let url = self.feed.api_endpoint(&["versions", LATEST_VERSION])?;
        let response: VersionResponse = self.get(&url).await?;
        tracing::debug!(feed = %self.feed, version = %response.name, "latest version resolved");
        Ok(VersionInfo { version: response.name })
    }

    /// Lists the files attached to `version`.
    pub async fn get_version_files(&self, version: &str) -> Result<Vec<RegistryFile>> {
        let url = self.feed.api_endpoint(&["versions", version, "files"])?;
        let files: Vec<RegistryFile> = self.get(&url).await?;
        tracing::debug!(feed = %self.feed, version, count = files.len(), "version files listed");
        Ok(files)
    }

    /// Fully-qualified public download URL of a file in the repository.
    pub fn download_url(&self, file_name: &str) -> Result<String> {
        join_segments(&self.feed.download_url, [self.feed.user.as_str(), self.feed.repo.as_str(), file_name])
    }

    async fn get<T: DeserializeOwned>(&self, url: &str) -> Result<T> {
        let value = self.transport.get_json(url).await.map_err(UpdateError::from_registry)?;
        serde_json::from_value(value).map_err(|e| {
            UpdateError::from_registry(TransportError::Decode {
                url: url.to_string(),
                message: e.to_string(),
            })
        })
    }
}

impl std::fmt::Debug for BintrayClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BintrayClient").field("feed", &self.feed).finish_non_exhaustive()
    }
}
