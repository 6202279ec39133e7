#[derive(Debug, Clone)]
pub enum Message {
    // === CONFIGURATION MESSAGES ===
    ConfigSavedTo(String),  // path
    ConfigDeleted(String),  // path
    ConfigNotFound(String), // path
    ConfigModuleFeed,
    ConfigModuleInstaller,
    ConfigModuleHttp,
    FeedNotConfigured,
    FeedConfigured(String), // feed coordinates

    // === PROMPTS ===
    PromptSelectModules,
    PromptFeedUser,
    PromptFeedRepo,
    PromptFeedPackage,
    PromptFeedApiUrl,
    PromptFeedDownloadUrl,
    PromptInstallerMarker,
    PromptInstallerExtension,
    PromptInstallerSilentArgs,
    PromptHttpUserAgent,
    PromptHttpTimeout,

    // === UPDATE MESSAGES ===
    CheckingForUpdate(String), // running version
    UpdateAvailable {
        app_name: String,
        latest: String,
        installer: String,
    },
    NoUpdateRequired(String),        // latest version
    DownloadingInstaller(String),    // url
    InstallerStaged(String),         // path
    InstallerLaunching(String),      // path
    InstallHint(String),             // command to rerun with --install
    UpdateEventError(String),        // message
    UpdateCheckFailed(String),       // error
    DownloadFailed(String),          // error
    InstallFailed(String),           // error
}
