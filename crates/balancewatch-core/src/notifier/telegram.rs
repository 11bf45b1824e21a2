//! Telegram Bot API delivery

use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use tracing::{debug, info};

use crate::config::TelegramConfig;
use crate::error::{Error, Result};
use crate::models::WatchTarget;

use super::{NotificationError, NotificationSink};

/// Sends messages through a Telegram bot
#[derive(Debug, Clone)]
pub struct TelegramNotifier {
    client: Client,
    api_base_url: String,
}

impl TelegramNotifier {
    /// Create a new notifier
    pub fn new(config: &TelegramConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| Error::config(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            api_base_url: config.api_base_url.trim_end_matches('/').to_string(),
        })
    }
}

#[async_trait]
impl NotificationSink for TelegramNotifier {
    async fn deliver(
        &self,
        target: &WatchTarget,
        text: &str,
    ) -> std::result::Result<(), NotificationError> {
        let url = format!("{}/bot{}/sendMessage", self.api_base_url, target.bot_token);

        let response = self
            .client
            .get(&url)
            .query(&[("chat_id", target.chat_id.as_str()), ("text", text)])
            .header(CONTENT_TYPE, "application/json")
            .send()
            .await
            .map_err(|e| NotificationError::Transport(e.without_url().to_string()))?;

        let status = response.status();
        if status != StatusCode::OK {
            let body = response.text().await.unwrap_or_default();
            let description = serde_json::from_str::<TelegramResponse>(&body)
                .ok()
                .and_then(|r| r.description);
            debug!(%status, body = %body, "Telegram rejected message");

            return Err(NotificationError::Status {
                status: status.as_u16(),
                description,
            });
        }

        info!(chat_id = %target.chat_id, "Telegram notification sent");
        Ok(())
    }
}

// Telegram error envelope
#[derive(Debug, Deserialize)]
struct TelegramResponse {
    description: Option<String>,
}
