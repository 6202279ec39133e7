//! Configuration management for the updater.
//!
//! Settings are stored as JSON in the platform data directory and split into
//! optional modules, each of which can be configured on its own:
//!
//! - **Feed**: registry coordinates of the release feed
//! - **Installer**: how the installer asset is recognised and run
//! - **HTTP**: user agent and request timeout of the transport
//!
//! A missing module falls back to its defaults, except the feed: without one
//! every check fails with a configuration error.
//!
//! ## Usage Examples
//!
//! ```rust,no_run
//! use nsis_updater::libs::config::Config;
//!
//! // Load existing configuration or create default
//! let config = Config::read()?;
//!
//! if let Some(feed) = &config.feed {
//!     println!("Feed: {}", feed);
//! }
//! # Ok::<(), anyhow::Error>(())
//! ```

use super::artifact::InstallerConfig;
use super::data_storage::DataStorage;
use crate::api::{FeedLocation, HttpConfig};
use crate::libs::messages::Message;
use crate::msg_print;
use anyhow::Result;
use dialoguer::{theme::ColorfulTheme, Input, MultiSelect};
use serde::{Deserialize, Serialize};
use std::fs::{self, File};
use std::path::PathBuf;

/// Configuration file name used for storing application settings.
pub const CONFIG_FILE_NAME: &str = "config.json";

/// A configurable module, as offered by the setup wizard.
#[derive(Debug, Clone)]
pub struct ConfigModule {
    /// Unique identifier for the module used in configuration routing
    pub key: String,
    /// Display name shown to users during interactive setup
    pub name: String,
}

/// Main configuration container.
///
/// Unconfigured modules are omitted from the JSON output.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
pub struct Config {
    /// Release feed the updater checks.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub feed: Option<FeedLocation>,

    /// Installer recognition and silent-install arguments.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub installer: Option<InstallerConfig>,

    /// HTTP transport settings.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub http: Option<HttpConfig>,
}

impl Config {
    /// Path of the configuration file in the platform data directory.
    ///
    /// - **Windows**: `%LOCALAPPDATA%\lacodda\nsis-updater\config.json`
    /// - **macOS**: `~/Library/Application Support/lacodda/nsis-updater/config.json`
    /// - **Linux**: `~/.local/share/lacodda/nsis-updater/config.json`
    pub fn path() -> Result<PathBuf> {
        DataStorage::new().get_path(CONFIG_FILE_NAME)
    }

    /// Reads configuration from the filesystem.
    ///
    /// A missing file yields the default configuration; a file that exists
    /// but cannot be parsed is an error.
    pub fn read() -> Result<Config> {
        let config_file_path = Self::path()?;
        if !config_file_path.exists() {
            return Ok(Config::default());
        }

        let config_str = fs::read_to_string(config_file_path)?;
        let config: Config = serde_json::from_str(&config_str)?;
        Ok(config)
    }

    /// Writes the configuration as pretty-printed JSON.
    pub fn save(&self) -> Result<()> {
        let config_file = File::create(Self::path()?)?;
        serde_json::to_writer_pretty(&config_file, &self)?;
        Ok(())
    }

    /// Runs the interactive setup wizard, starting from the stored values.
    pub fn init() -> Result<Self> {
        let mut config = Self::read().unwrap_or_default();

        let node_descriptions = vec![
            FeedLocation::module(),
            ConfigModule {
                key: "installer".to_string(),
                name: "Installer".to_string(),
            },
            ConfigModule {
                key: "http".to_string(),
                name: "HTTP".to_string(),
            },
        ];

        let selected_nodes = MultiSelect::with_theme(&ColorfulTheme::default())
            .with_prompt(Message::PromptSelectModules.to_string())
            .items(&node_descriptions.iter().map(|module| &module.name).collect::<Vec<_>>())
            .interact()?;

        for &selection in &selected_nodes {
            match node_descriptions[selection].key.as_str() {
                "feed" => config.feed = Some(FeedLocation::init(&config.feed)?),
                "installer" => {
                    let default = config.installer.clone().unwrap_or_default();
                    msg_print!(Message::ConfigModuleInstaller);
                    let silent_args: String = Input::with_theme(&ColorfulTheme::default())
                        .with_prompt(Message::PromptInstallerSilentArgs.to_string())
                        .default(default.silent_args.join(" "))
                        .interact_text()?;
                    config.installer = Some(InstallerConfig {
                        marker: Input::with_theme(&ColorfulTheme::default())
                            .with_prompt(Message::PromptInstallerMarker.to_string())
                            .default(default.marker)
                            .interact_text()?,
                        extension: Input::with_theme(&ColorfulTheme::default())
                            .with_prompt(Message::PromptInstallerExtension.to_string())
                            .default(default.extension)
                            .interact_text()?,
                        silent_args: silent_args.split_whitespace().map(str::to_string).collect(),
                    });
                }
                "http" => {
                    let default = config.http.clone().unwrap_or_default();
                    msg_print!(Message::ConfigModuleHttp);
                    let timeout_secs: u64 = Input::with_theme(&ColorfulTheme::default())
                        .with_prompt(Message::PromptHttpTimeout.to_string())
                        .default(default.timeout_secs.unwrap_or(0))
                        .interact_text()?;
                    config.http = Some(HttpConfig {
                        user_agent: Input::with_theme(&ColorfulTheme::default())
                            .with_prompt(Message::PromptHttpUserAgent.to_string())
                            .default(default.user_agent)
                            .interact_text()?,
                        timeout_secs: (timeout_secs > 0).then_some(timeout_secs),
                    });
                }
                _ => {}
            }
        }

        Ok(config)
    }
}
