//! Dock error taxonomy
//!
//! None of these are fatal to the process. Callers log them and carry on.

use thiserror::Error;

use crate::task::AppKey;

/// Errors surfaced by dock operations
#[derive(Debug, Error)]
pub enum DockError {
    /// Event channel missing or nobody listening (retried indefinitely)
    #[error("event channel unavailable: {0}")]
    ChannelUnavailable(String),

    /// Malformed snapshot or event payload (current cycle skipped)
    #[error("failed to decode {what}: {reason}")]
    Decode { what: &'static str, reason: String },

    /// Outbound focus/close/launch failed (logged, not retried)
    #[error("command `{command}` failed: {reason}")]
    CommandFailed { command: String, reason: String },

    /// Reorder target vanished before the drop
    #[error("reorder rejected: {0} is not in the dock")]
    ReorderRejected(AppKey),

    /// Operation on a key the registry doesn't know
    #[error("unknown task: {0}")]
    UnknownTask(AppKey),

    /// Pinning refused because the pinned list is full
    #[error("cannot pin more than {max} apps")]
    PinLimitReached { max: usize },

    /// Pinned list could not be persisted or read
    #[error("config sync failed: {0}")]
    ConfigSync(String),
}

impl DockError {
    pub(crate) fn command(command: impl Into<String>, reason: impl ToString) -> Self {
        Self::CommandFailed {
            command: command.into(),
            reason: reason.to_string(),
        }
    }
}
