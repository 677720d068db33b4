//! Notification port.

use super::adapter_error::AdapterError;
use async_trait::async_trait;

/// Outcome of a notification attempt that did not error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationOutcome {
    Sent,
    /// No sender is configured. Not an error.
    NotConfigured,
}

/// Sends a short message to the user out of band (e.g. email).
#[async_trait]
pub trait NotificationPort: Send + Sync {
    async fn send(&self, message: &str) -> Result<NotificationOutcome, AdapterError>;
}

/// Notifier used when nothing is configured.
pub struct NoNotifier;

#[async_trait]
impl NotificationPort for NoNotifier {
    async fn send(&self, _message: &str) -> Result<NotificationOutcome, AdapterError> {
        Ok(NotificationOutcome::NotConfigured)
    }
}
