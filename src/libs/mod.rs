//! Core library modules of the updater.
//!
//! - **Controller**: [`update::Updater`] and its state machine
//! - **Rules**: installer selection, version ordering, error classification
//! - **Seams**: host application, installer launcher, notifications
//! - **Infrastructure**: configuration, data storage, messaging

pub mod artifact;
pub mod config;
pub mod data_storage;
pub mod error;
pub mod event;
pub mod host;
pub mod launcher;
pub mod messages;
pub mod update;
pub mod version;
