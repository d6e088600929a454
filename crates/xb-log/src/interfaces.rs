//! Seams to the rest of the node.
//!
//! The loggers never resolve paths or talk to the UI themselves; they call
//! into these traits. [`crate::config::AppConfig`] implements the path
//! traits, and [`ChannelNotifier`] is the usual UI sink.

use std::path::PathBuf;

use crossbeam_channel::{Receiver, Sender, TrySendError};
use tracing::trace;

/// Supplies the base directory for the general log.
pub trait DataDirectory: Send + Sync {
    /// Node data directory. With `create`, the directory is created if
    /// missing (failures are left for the caller's own I/O to surface).
    fn data_directory(&self, create: bool) -> PathBuf;
}

/// Supplies the base directory for the transaction log.
pub trait LogSettings: Send + Sync {
    /// Explicit log directory; empty when not configured.
    fn log_path(&self) -> String;
    /// Application directory, used when `log_path` is empty.
    fn app_path(&self) -> String;
}

/// Receives the raw text of every general log record.
///
/// Fire-and-forget: implementations must not block on a slow consumer and
/// callers make no assumption that delivery happened.
pub trait UiNotifier: Send + Sync {
    fn notify_log_message(&self, text: &str);
}

impl DataDirectory for PathBuf {
    fn data_directory(&self, create: bool) -> PathBuf {
        if create {
            let _ = std::fs::create_dir_all(self);
        }
        self.clone()
    }
}

/// Notifier for headless nodes.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullNotifier;

impl UiNotifier for NullNotifier {
    fn notify_log_message(&self, _text: &str) {}
}

/// Forwards log text to a UI thread over a bounded channel.
///
/// When the channel is full or the UI side has gone away, the message is
/// dropped.
#[derive(Debug, Clone)]
pub struct ChannelNotifier {
    tx: Sender<String>,
}

impl ChannelNotifier {
    /// Create a notifier and the receiver the UI thread drains.
    pub fn bounded(capacity: usize) -> (Self, Receiver<String>) {
        let (tx, rx) = crossbeam_channel::bounded(capacity);
        (Self { tx }, rx)
    }
}

impl UiNotifier for ChannelNotifier {
    fn notify_log_message(&self, text: &str) {
        match self.tx.try_send(text.to_owned()) {
            Ok(()) => {}
            Err(TrySendError::Full(_)) => trace!("UI log channel full, dropping message"),
            Err(TrySendError::Disconnected(_)) => trace!("UI log channel closed, dropping message"),
        }
    }
}
