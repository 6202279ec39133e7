//! Update check command.
//!
//! Embeds the [`Updater`] the way a desktop shell would: one check, a wait
//! for the installer download, and the install handoff when requested.

use crate::{
    libs::{
        config::Config,
        event::UpdateEvent,
        host::ProcessHost,
        messages::Message,
        update::Updater,
    },
    msg_bail_anyhow, msg_debug, msg_error_anyhow, msg_info, msg_success,
};
use anyhow::Result;
use clap::Args;
use std::sync::Arc;
use tokio::sync::mpsc::UnboundedReceiver;

include!(concat!(env!("OUT_DIR"), "/app_metadata.rs"));

#[derive(Debug, Args)]
pub struct CheckArgs {
    /// Version reported as running instead of this binary's own
    #[arg(long, value_name = "VERSION")]
    app_version: Option<String>,

    /// Launch the installer and quit once it has been downloaded
    #[arg(long)]
    install: bool,
}

pub async fn cmd(args: CheckArgs) -> Result<()> {
    let config = Config::read()?;
    let Some(feed) = config.feed.clone() else {
        msg_bail_anyhow!(Message::FeedNotConfigured);
    };

    let version = args.app_version.unwrap_or_else(|| APP_METADATA_VERSION.to_string());
    let updater = Updater::from_config(&config, Arc::new(ProcessHost::new(&version)))?;
    let mut events = updater.subscribe();

    msg_debug!(Message::FeedConfigured(feed.to_string()));
    msg_info!(Message::CheckingForUpdate(version));

    let checked = updater.check_for_updates().await;
    drain_events(&mut events);
    let result = checked.map_err(|e| msg_error_anyhow!(Message::UpdateCheckFailed(e.to_string())))?;

    let (Some(file_info), Some(download)) = (result.file_info, result.download) else {
        msg_success!(Message::NoUpdateRequired(result.version_info.version));
        return Ok(());
    };

    msg_info!(Message::UpdateAvailable {
        app_name: feed.package.clone(),
        latest: result.version_info.version.clone(),
        installer: file_info.name.clone(),
    });
    msg_info!(Message::DownloadingInstaller(file_info.url.clone()));

    let downloaded = download.wait().await;
    drain_events(&mut events);
    let installer_path = downloaded.map_err(|e| msg_error_anyhow!(Message::DownloadFailed(e.to_string())))?;
    msg_success!(Message::InstallerStaged(installer_path.display().to_string()));

    if !args.install {
        msg_info!(Message::InstallHint(format!("{} check --install", APP_METADATA_NAME)));
        return Ok(());
    }

    msg_info!(Message::InstallerLaunching(installer_path.display().to_string()));
    updater
        .quit_and_install()
        .map_err(|e| msg_error_anyhow!(Message::InstallFailed(e.to_string())))?;

    Ok(())
}

/// Logs the events emitted so far. Errors are reported by the caller from
/// the returned result, so they only show up in debug mode here.
fn drain_events(events: &mut UnboundedReceiver<UpdateEvent>) {
    while let Ok(event) = events.try_recv() {
        match &event {
            UpdateEvent::Error { message, .. } => msg_debug!(Message::UpdateEventError(message.clone())),
            other => msg_debug!(other),
        }
    }
}
