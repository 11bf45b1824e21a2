//! Notification delivery for balance changes

mod telegram;

pub use telegram::TelegramNotifier;

use async_trait::async_trait;

use crate::models::WatchTarget;

/// Destination for rendered balance-change messages
#[async_trait]
pub trait NotificationSink: Send + Sync {
    /// Deliver `text` to the target's chat
    async fn deliver(&self, target: &WatchTarget, text: &str) -> Result<(), NotificationError>;
}

#[async_trait]
impl<T: NotificationSink + ?Sized> NotificationSink for std::sync::Arc<T> {
    async fn deliver(&self, target: &WatchTarget, text: &str) -> Result<(), NotificationError> {
        (**self).deliver(target, text).await
    }
}

/// Notification errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum NotificationError {
    /// The request could not be sent or its response not read
    #[error("transport error: {0}")]
    Transport(String),

    /// The API answered with a status other than 200
    #[error("unexpected status code {status} from notification API{}", suffix(.description))]
    Status {
        /// HTTP status code
        status: u16,
        /// Error description reported by the API, if any
        description: Option<String>,
    },
}

fn suffix(description: &Option<String>) -> String {
    description
        .as_deref()
        .map(|d| format!(": {d}"))
        .unwrap_or_default()
}
