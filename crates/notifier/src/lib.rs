//! Notification delivery.
//!
//! A [`Notifier`] pushes a text message to the single configured chat.
//! Callers in the poll loop use [`Notifier::deliver`], which never fails:
//! delivery errors are logged and dropped so a flaky chat transport cannot
//! stop polling.

pub mod telegram;

use async_trait::async_trait;
use thiserror::Error;

pub use telegram::TelegramNotifier;

#[derive(Debug, Error)]
pub enum DeliveryError {
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("message rejected with HTTP {status}: {description}")]
    Rejected { status: u16, description: String },
}

#[async_trait]
pub trait Notifier: Send + Sync {
    /// Send `text` to the destination, reporting any failure.
    async fn send(&self, text: &str) -> Result<(), DeliveryError>;

    /// Best-effort send. Failures end up in the log only.
    async fn deliver(&self, text: &str) {
        tracing::debug!("Sending notification");
        match self.send(text).await {
            Ok(()) => tracing::debug!("Notification delivered"),
            Err(e) => tracing::error!(error = %e, "Failed to deliver notification"),
        }
    }
}
