//! # nsis-updater
//!
//! Background update checks for desktop applications distributed as NSIS
//! installers through a Bintray-style release registry.
//!
//! ## Features
//!
//! - **Update Checks**: Resolves the latest published version and compares it with the running one
//! - **Installer Selection**: Picks the installer among the files attached to a release
//! - **Download Staging**: Downloads the installer into a private temporary directory in the background
//! - **Install Handoff**: Launches the installer detached and quits the running application
//! - **Notifications**: Reports every transition to subscribed observers
//!
//! ## Usage
//!
//! ```rust,no_run
//! use nsis_updater::commands::Cli;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     Cli::menu().await
//! }
//! ```

pub mod api;
pub mod commands;
pub mod libs;
