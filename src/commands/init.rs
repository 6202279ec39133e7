//! Configuration initialization command.
//!
//! Runs the interactive setup wizard for the release feed, installer
//! recognition and HTTP settings, or removes the stored configuration.

use crate::{
    libs::{config::Config, messages::Message},
    msg_info, msg_success, msg_warning,
};
use anyhow::Result;
use clap::Args;

#[derive(Debug, Args)]
pub struct InitArgs {
    /// Remove existing configuration instead of creating new one
    #[arg(short, long)]
    delete: bool,
}

pub fn cmd(init_args: InitArgs) -> Result<()> {
    let path = Config::path()?;

    if init_args.delete {
        if !path.exists() {
            msg_warning!(Message::ConfigNotFound(path.display().to_string()));
            return Ok(());
        }
        std::fs::remove_file(&path)?;
        msg_info!(Message::ConfigDeleted(path.display().to_string()));
        return Ok(());
    }

    Config::init()?.save()?;

    msg_success!(Message::ConfigSavedTo(path.display().to_string()));
    Ok(())
}
