//! Notification errors.

use thiserror::Error;

/// Notification delivery errors. Always recoverable: one channel's
/// failure never aborts a cycle or the other channels.
#[derive(Debug, Error)]
pub enum NotifyError {
    /// A channel could not deliver the alert.
    #[error("{channel} delivery failed: {message}")]
    Delivery { channel: &'static str, message: String },
}

impl NotifyError {
    pub fn delivery(channel: &'static str, message: impl Into<String>) -> Self {
        NotifyError::Delivery {
            channel,
            message: message.into(),
        }
    }
}
