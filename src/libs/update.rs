//! Update controller: check, download and install handoff.
//!
//! The [`Updater`] drives one application through the update lifecycle:
//!
//! ```text
//! Idle ──check──▶ Checking ──newer──▶ Downloading ──done──▶ ReadyToInstall ──quit_and_install──▶ Installing
//!   ▲                │                    │
//!   └── up to date ──┘                    │
//!   └── check failed ┘                    │
//!   └──────────── download failed ────────┘
//! ```
//!
//! A check resolves the latest version on the registry, compares it with the
//! version the host reports and, when it is newer, selects the installer and
//! starts staging it into a private temporary directory. The check returns as
//! soon as the download has started; the download itself is exposed as a
//! [`DownloadHandle`].
//!
//! Every failure is emitted as an [`UpdateEvent::Error`] and returned to the
//! caller. Nothing here panics or exits the process except
//! [`HostApp::quit`] after a successful install handoff.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use nsis_updater::api::{FeedLocation, HttpTransport};
//! use nsis_updater::libs::host::ProcessHost;
//! use nsis_updater::libs::update::Updater;
//!
//! # async fn run() -> nsis_updater::libs::error::Result<()> {
//! let updater = Updater::new(Arc::new(ProcessHost::new("1.0.0")), Arc::new(HttpTransport::default()));
//! updater.set_feed_location(FeedLocation::new("acme", "generic", "desktop"));
//!
//! let result = updater.check_for_updates().await?;
//! if let Some(download) = result.download {
//!     download.wait().await?;
//!     updater.quit_and_install()?;
//! }
//! # Ok(())
//! # }
//! ```

use super::artifact::{is_plain_file_name, select_installer, InstallerConfig};
use super::config::Config;
use super::error::{Result, UpdateError, VersionOrigin};
use super::event::{EventBus, FileInfo, UpdateEvent};
use super::host::HostApp;
use super::launcher::{DetachedLauncher, Launcher};
use super::version::{is_newer, parse_version};
use crate::api::{BintrayClient, FeedLocation, HttpTransport, Transport, VersionInfo};
use parking_lot::Mutex;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::mpsc::UnboundedReceiver;
use tokio::task::JoinHandle;

/// Prefix of the per-download staging directory.
const STAGING_PREFIX: &str = "up-";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdaterState {
    Idle,
    Checking,
    Downloading,
    ReadyToInstall,
    Installing,
}

#[derive(Debug)]
struct Status {
    state: UpdaterState,
    update_available: bool,
    /// Only set once a download has completed for the available update.
    staged_installer_path: Option<PathBuf>,
    /// One-way latch, never reset.
    install_triggered: bool,
}

impl Default for Status {
    fn default() -> Self {
        Self {
            state: UpdaterState::Idle,
            update_available: false,
            staged_installer_path: None,
            install_triggered: false,
        }
    }
}

/// Outcome of one check cycle.
#[derive(Debug)]
pub struct UpdateCheckResult {
    pub version_info: VersionInfo,
    /// Present only when a newer version was found.
    pub file_info: Option<FileInfo>,
    /// Present only when a newer version was found.
    pub download: Option<DownloadHandle>,
}

impl UpdateCheckResult {
    pub fn is_update_available(&self) -> bool {
        self.file_info.is_some()
    }
}

/// In-flight download of the installer.
///
/// Dropping the handle does not cancel the download, it keeps running and
/// still stages the installer.
#[derive(Debug)]
pub struct DownloadHandle {
    handle: JoinHandle<Result<PathBuf>>,
}

impl DownloadHandle {
    /// Waits for the download and returns the staged installer path.
    ///
    /// A download task that panicked or was aborted yields
    /// [`UpdateError::Download`]; the controller is already back to `Idle`.
    pub async fn wait(self) -> Result<PathBuf> {
        match self.handle.await {
            Ok(result) => result,
            Err(e) => Err(UpdateError::Download(e.to_string())),
        }
    }

    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }
}

/// Resets the controller when the download task ends without a result.
struct UnfinishedDownload {
    status: Arc<Mutex<Status>>,
    events: EventBus,
    armed: bool,
}

impl Drop for UnfinishedDownload {
    fn drop(&mut self) {
        if !self.armed {
            return;
        }
        {
            let mut status = self.status.lock();
            if status.state != UpdaterState::Downloading {
                return;
            }
            status.update_available = false;
            status.state = UpdaterState::Idle;
        }
        tracing::warn!("installer download ended unexpectedly");
        self.events
            .emit_error(UpdateError::Download("download task ended before completion".to_string()));
    }
}

pub struct Updater {
    host: Arc<dyn HostApp>,
    launcher: Arc<dyn Launcher>,
    transport: Arc<dyn Transport>,
    installer: InstallerConfig,
    staging_root: PathBuf,
    client: Mutex<Option<BintrayClient>>,
    status: Arc<Mutex<Status>>,
    events: EventBus,
}

impl Updater {
    /// Creates an updater with no feed configured.
    pub fn new(host: Arc<dyn HostApp>, transport: Arc<dyn Transport>) -> Self {
        Self {
            host,
            launcher: Arc::new(DetachedLauncher),
            transport,
            installer: InstallerConfig::default(),
            staging_root: std::env::temp_dir(),
            client: Mutex::new(None),
            status: Arc::new(Mutex::new(Status::default())),
            events: EventBus::new(),
        }
    }

    /// Builds an updater from the stored configuration, feed included when
    /// one has been set up.
    pub fn from_config(config: &Config, host: Arc<dyn HostApp>) -> Result<Self> {
        let http = config.http.clone().unwrap_or_default();
        let transport = HttpTransport::new(&http).map_err(UpdateError::Transport)?;
        let updater = Self::new(host, Arc::new(transport)).with_installer(config.installer.clone().unwrap_or_default());
        if let Some(feed) = &config.feed {
            updater.set_feed_location(feed.clone());
        }
        Ok(updater)
    }

    pub fn with_launcher(mut self, launcher: Arc<dyn Launcher>) -> Self {
        self.launcher = launcher;
        self
    }

    pub fn with_installer(mut self, installer: InstallerConfig) -> Self {
        self.installer = installer;
        self
    }

    /// Directory under which staging directories are created. Defaults to
    /// the system temporary directory.
    pub fn with_staging_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.staging_root = root.into();
        self
    }

    /// Points the updater at a feed and rebuilds the registry client.
    ///
    /// A check already in flight keeps using the client it started with.
    pub fn set_feed_location(&self, feed: FeedLocation) {
        tracing::info!(feed = %feed, "feed location set");
        *self.client.lock() = Some(BintrayClient::new(&feed, Arc::clone(&self.transport)));
    }

    pub fn feed_location(&self) -> Option<FeedLocation> {
        self.client.lock().as_ref().map(|client| client.feed().clone())
    }

    pub fn subscribe(&self) -> UnboundedReceiver<UpdateEvent> {
        self.events.subscribe()
    }

    pub fn state(&self) -> UpdaterState {
        self.status.lock().state
    }

    pub fn is_update_available(&self) -> bool {
        self.status.lock().update_available
    }

    pub fn staged_installer_path(&self) -> Option<PathBuf> {
        self.status.lock().staged_installer_path.clone()
    }

    /// Runs one check cycle.
    ///
    /// # Errors
    ///
    /// - [`UpdateError::Configuration`] when no feed is set (no state change)
    /// - [`UpdateError::CheckInProgress`] while another check or download runs
    /// - [`UpdateError::AlreadyInstalling`] once the installer has been launched,
    ///   not emitted
    /// - any registry, version or artifact selection failure of the cycle
    ///
    /// All but `AlreadyInstalling` are also emitted as an `error` event.
    pub async fn check_for_updates(&self) -> Result<UpdateCheckResult> {
        let Some(client) = self.client.lock().clone() else {
            return Err(self.fail(UpdateError::Configuration));
        };

        let resume_state = {
            let mut status = self.status.lock();
            match status.state {
                UpdaterState::Checking | UpdaterState::Downloading => {
                    drop(status);
                    return Err(self.fail(UpdateError::CheckInProgress));
                }
                UpdaterState::Installing => return Err(UpdateError::AlreadyInstalling),
                previous => {
                    status.state = UpdaterState::Checking;
                    previous
                }
            }
        };

        self.events.emit(UpdateEvent::CheckingForUpdate);

        match self.run_check(&client).await {
            Ok(result) => Ok(result),
            Err(UpdateError::AlreadyInstalling) => Err(UpdateError::AlreadyInstalling),
            Err(error) => {
                {
                    let mut status = self.status.lock();
                    if status.state != UpdaterState::Installing {
                        status.state = resume_state;
                    }
                }
                Err(self.fail(error))
            }
        }
    }

    async fn run_check(&self, client: &BintrayClient) -> Result<UpdateCheckResult> {
        let version_info = client.get_latest_version().await?;
        let latest = parse_version(VersionOrigin::Latest, &version_info.version)?;
        let running = parse_version(VersionOrigin::Running, &self.host.version())?;

        if !is_newer(&running, &latest) {
            {
                // The staged installer may have been launched meanwhile.
                let mut status = self.status.lock();
                if status.state != UpdaterState::Installing {
                    status.update_available = false;
                    status.staged_installer_path = None;
                    status.state = UpdaterState::Idle;
                }
            }
            tracing::info!(running = %running, latest = %latest, "application is up to date");
            self.events.emit(UpdateEvent::UpdateNotAvailable {
                version_info: version_info.clone(),
            });
            return Ok(UpdateCheckResult {
                version_info,
                file_info: None,
                download: None,
            });
        }

        let files = client.get_version_files(&version_info.version).await?;
        let installer = select_installer(&files, &version_info.version, &self.installer)?;
        let file_info = FileInfo {
            name: installer.name.clone(),
            url: client.download_url(&installer.name)?,
        };

        {
            let mut status = self.status.lock();
            if status.state == UpdaterState::Installing {
                return Err(UpdateError::AlreadyInstalling);
            }
            status.update_available = true;
            status.staged_installer_path = None;
            status.state = UpdaterState::Downloading;
        }
        tracing::info!(running = %running, latest = %latest, installer = %file_info.name, "update available");
        self.events.emit(UpdateEvent::UpdateAvailable {
            version_info: version_info.clone(),
            file_info: file_info.clone(),
        });

        let download = self.start_download(version_info.clone(), file_info.clone());
        Ok(UpdateCheckResult {
            version_info,
            file_info: Some(file_info),
            download: Some(download),
        })
    }

    fn start_download(&self, version_info: VersionInfo, file_info: FileInfo) -> DownloadHandle {
        let transport = Arc::clone(&self.transport);
        let status = Arc::clone(&self.status);
        let events = self.events.clone();
        let staging_root = self.staging_root.clone();

        let handle = tokio::spawn(async move {
            let mut unfinished = UnfinishedDownload {
                status: Arc::clone(&status),
                events: events.clone(),
                armed: true,
            };
            let result = stage_installer(transport.as_ref(), &staging_root, &file_info).await;
            unfinished.armed = false;

            let mut guard = status.lock();
            match result {
                Ok(path) => {
                    guard.staged_installer_path = Some(path.clone());
                    guard.state = UpdaterState::ReadyToInstall;
                    drop(guard);
                    tracing::info!(path = %path.display(), "installer staged");
                    events.emit(UpdateEvent::UpdateDownloaded {
                        version_info,
                        path: path.clone(),
                    });
                    Ok(path)
                }
                Err(error) => {
                    guard.update_available = false;
                    guard.state = UpdaterState::Idle;
                    drop(guard);
                    tracing::warn!(%error, "installer download failed");
                    events.emit_error(error.clone());
                    Err(error)
                }
            }
        });

        DownloadHandle { handle }
    }

    /// Launches the staged installer detached and quits the host.
    ///
    /// # Errors
    ///
    /// - [`UpdateError::NoUpdateAvailable`] when no installer is staged, emitted
    /// - [`UpdateError::AlreadyInstalling`] on repeated calls, not emitted
    /// - [`UpdateError::Launch`] when the installer cannot be started, emitted;
    ///   the install is not retried
    pub fn quit_and_install(&self) -> Result<()> {
        let installer_path = {
            let mut status = self.status.lock();
            let staged = if status.update_available {
                status.staged_installer_path.clone()
            } else {
                None
            };
            let Some(path) = staged else {
                drop(status);
                return Err(self.fail(UpdateError::NoUpdateAvailable));
            };

            if status.install_triggered {
                return Err(UpdateError::AlreadyInstalling);
            }
            status.install_triggered = true;
            status.state = UpdaterState::Installing;
            path
        };

        if let Err(source) = self.launcher.spawn_detached(&installer_path, &self.installer.silent_args) {
            return Err(self.fail(UpdateError::Launch {
                path: installer_path,
                source: Arc::new(source),
            }));
        }

        self.host.quit();
        Ok(())
    }

    fn fail(&self, error: UpdateError) -> UpdateError {
        let message = self.events.emit_error(error.clone());
        tracing::warn!(%message, "update cycle failed");
        error
    }
}

impl std::fmt::Debug for Updater {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Updater")
            .field("feed", &self.feed_location())
            .field("status", &*self.status.lock())
            .field("installer", &self.installer)
            .finish_non_exhaustive()
    }
}

async fn stage_installer(transport: &dyn Transport, staging_root: &Path, file_info: &FileInfo) -> Result<PathBuf> {
    if !is_plain_file_name(&file_info.name) {
        return Err(UpdateError::Download(format!("refusing to stage {:?} outside the staging directory", file_info.name)));
    }

    let staging_dir = tempfile::Builder::new()
        .prefix(STAGING_PREFIX)
        .tempdir_in(staging_root)
        .map_err(|e| UpdateError::Download(format!("cannot create staging directory in {}: {e}", staging_root.display())))?
        .keep();

    let installer_path = staging_dir.join(&file_info.name);
    if let Err(e) = transport.download(&file_info.url, &installer_path).await {
        if let Err(cleanup) = tokio::fs::remove_dir_all(&staging_dir).await {
            tracing::debug!(dir = %staging_dir.display(), error = %cleanup, "staging directory not removed");
        }
        return Err(UpdateError::Transport(e));
    }
    Ok(installer_path)
}
