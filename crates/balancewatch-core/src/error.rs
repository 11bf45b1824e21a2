//! Error types for BalanceWatch

use thiserror::Error;

use crate::notifier::NotificationError;

/// Result type alias using BalanceWatch's Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for BalanceWatch operations
///
/// Every variant is fatal to the watcher. Transient provider outages are not
/// errors: they surface as skipped cycles instead.
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Layered settings could not be read or deserialized
    #[error("Settings error: {0}")]
    Settings(#[from] ::config::ConfigError),

    /// Invalid endpoint URL
    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),

    /// Request to a remote endpoint failed before a response body was read
    #[error("Request to {endpoint} failed: {source}")]
    Transport {
        /// Endpoint label (never the full URL, which carries credentials)
        endpoint: &'static str,
        /// Underlying client error, stripped of its URL
        #[source]
        source: reqwest::Error,
    },

    /// Notification could not be delivered
    #[error("Notification error: {0}")]
    Notification(#[from] NotificationError),
}

impl Error {
    /// Create a config error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create a transport error for the given endpoint.
    ///
    /// The request URL is removed from the source error because it embeds
    /// the provider API key.
    pub fn transport(endpoint: &'static str, source: reqwest::Error) -> Self {
        Self::Transport {
            endpoint,
            source: source.without_url(),
        }
    }
}
