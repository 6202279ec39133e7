//! Display implementation for updater messages.
//!
//! All user-facing text of the command-line host lives here, so commands
//! only ever name a [`Message`] variant and never format text inline.

use super::types::Message;
use std::fmt::{Display, Formatter, Result};

impl Display for Message {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        let text = match self {
            // === CONFIGURATION MESSAGES ===
            Message::ConfigSavedTo(path) => format!("Configuration saved to {}", path),
            Message::ConfigDeleted(path) => format!("Configuration {} removed", path),
            Message::ConfigNotFound(path) => format!("No configuration found at {}", path),
            Message::ConfigModuleFeed => "Release feed settings".to_string(),
            Message::ConfigModuleInstaller => "Installer settings".to_string(),
            Message::ConfigModuleHttp => "HTTP settings".to_string(),
            Message::FeedNotConfigured => "No release feed configured. Run `init` and select \"Release feed\" first.".to_string(),
            Message::FeedConfigured(feed) => format!("Release feed: {}", feed),

            // === PROMPTS ===
            Message::PromptSelectModules => "Select modules to configure".to_string(),
            Message::PromptFeedUser => "Enter the registry user or organization".to_string(),
            Message::PromptFeedRepo => "Enter the repository name".to_string(),
            Message::PromptFeedPackage => "Enter the package name".to_string(),
            Message::PromptFeedApiUrl => "Enter the registry API URL".to_string(),
            Message::PromptFeedDownloadUrl => "Enter the download URL".to_string(),
            Message::PromptInstallerMarker => "Enter the marker identifying the installer file".to_string(),
            Message::PromptInstallerExtension => "Enter the installer file extension".to_string(),
            Message::PromptInstallerSilentArgs => "Enter the silent install arguments".to_string(),
            Message::PromptHttpUserAgent => "Enter the HTTP user agent".to_string(),
            Message::PromptHttpTimeout => "Enter the request timeout in seconds (0 for none)".to_string(),

            // === UPDATE MESSAGES ===
            Message::CheckingForUpdate(version) => format!("Checking for updates (running v{})...", version),
            Message::UpdateAvailable { app_name, latest, installer } => {
                format!("A new version of {} is available: v{} ({})", app_name, latest, installer)
            }
            Message::NoUpdateRequired(latest) => format!("No update required. You are using the latest version (v{})!", latest),
            Message::DownloadingInstaller(url) => format!("Downloading installer from {}", url),
            Message::InstallerStaged(path) => format!("Installer downloaded to {}", path),
            Message::InstallerLaunching(path) => format!("Launching installer {} and quitting...", path),
            Message::InstallHint(command) => format!("Install it now by running: {}", command),
            Message::UpdateEventError(message) => format!("Updater error: {}", message),
            Message::UpdateCheckFailed(error) => format!("Update check failed: {}", error),
            Message::DownloadFailed(error) => format!("Installer download failed: {}", error),
            Message::InstallFailed(error) => format!("Cannot install the update: {}", error),
        };

        write!(f, "{}", text)
    }
}
