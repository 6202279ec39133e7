//! Notifications emitted by the updater.
//!
//! Hosts subscribe through [`EventBus::subscribe`] and receive every event
//! emitted after that point, once per state transition. Delivery is
//! fire-and-forget: a subscriber that dropped its receiver is pruned on the
//! next emit.

use super::error::UpdateError;
use crate::api::VersionInfo;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::mpsc::{unbounded_channel, UnboundedReceiver, UnboundedSender};

/// Resolved installer artifact.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct FileInfo {
    pub name: String,
    pub url: String,
}

#[derive(Debug, Clone)]
pub enum UpdateEvent {
    CheckingForUpdate,
    UpdateAvailable { version_info: VersionInfo, file_info: FileInfo },
    UpdateNotAvailable { version_info: VersionInfo },
    UpdateDownloaded { version_info: VersionInfo, path: PathBuf },
    /// Carries both the error and its rendered message.
    Error { error: UpdateError, message: String },
}

impl UpdateEvent {
    pub fn error(error: UpdateError) -> Self {
        let message = error.to_string();
        UpdateEvent::Error { error, message }
    }

    /// Wire name of the event.
    pub fn name(&self) -> &'static str {
        match self {
            UpdateEvent::CheckingForUpdate => "checking-for-update",
            UpdateEvent::UpdateAvailable { .. } => "update-available",
            UpdateEvent::UpdateNotAvailable { .. } => "update-not-available",
            UpdateEvent::UpdateDownloaded { .. } => "update-downloaded",
            UpdateEvent::Error { .. } => "error",
        }
    }
}

impl fmt::Display for UpdateEvent {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            UpdateEvent::Error { message, .. } => write!(f, "{}: {}", self.name(), message),
            _ => write!(f, "{}", self.name()),
        }
    }
}

/// Fan-out of [`UpdateEvent`]s to any number of subscribers.
#[derive(Clone, Default)]
pub struct EventBus {
    subscribers: Arc<Mutex<Vec<UnboundedSender<UpdateEvent>>>>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&self) -> UnboundedReceiver<UpdateEvent> {
        let (tx, rx) = unbounded_channel();
        self.subscribers.lock().push(tx);
        rx
    }

    pub fn emit(&self, event: UpdateEvent) {
        tracing::debug!(event = event.name(), "emit");
        self.subscribers.lock().retain(|tx| tx.send(event.clone()).is_ok());
    }

    /// Emits an `error` event. The rendered message is returned for logging.
    pub fn emit_error(&self, error: UpdateError) -> String {
        let event = UpdateEvent::error(error);
        let message = event.to_string();
        self.emit(event);
        message
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers.lock().len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_subscriber_gets_each_event_once() {
        let bus = EventBus::new();
        let mut first = bus.subscribe();
        let mut second = bus.subscribe();

        bus.emit(UpdateEvent::CheckingForUpdate);

        assert!(matches!(first.try_recv(), Ok(UpdateEvent::CheckingForUpdate)));
        assert!(first.try_recv().is_err());
        assert!(matches!(second.try_recv(), Ok(UpdateEvent::CheckingForUpdate)));
        assert!(second.try_recv().is_err());
    }

    #[test]
    fn dropped_subscribers_are_pruned() {
        let bus = EventBus::new();
        let kept = bus.subscribe();
        drop(bus.subscribe());
        assert_eq!(bus.subscriber_count(), 2);

        bus.emit(UpdateEvent::CheckingForUpdate);
        assert_eq!(bus.subscriber_count(), 1);
        drop(kept);
    }

    #[test]
    fn error_event_carries_object_and_message() {
        let bus = EventBus::new();
        let mut rx = bus.subscribe();
        bus.emit_error(UpdateError::Configuration);

        match rx.try_recv() {
            Ok(UpdateEvent::Error { error, message }) => {
                assert!(matches!(error, UpdateError::Configuration));
                assert_eq!(message, "Update feed location is not set");
            }
            other => panic!("unexpected event: {other:?}"),
        }
    }
}
