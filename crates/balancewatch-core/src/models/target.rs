//! Watch target model

use std::fmt;

use crate::config::TargetConfig;
use crate::error::{Error, Result};

/// The account being watched and where changes are reported
///
/// Built once at startup from validated settings and never mutated.
#[derive(Clone, PartialEq, Eq)]
pub struct WatchTarget {
    /// Address to monitor
    pub address: String,
    /// Balance provider API key
    pub api_key: String,
    /// Ledger symbol as given by the operator (e.g. `ltc`)
    pub coin: String,
    /// Telegram chat or channel id
    pub chat_id: String,
    /// Telegram bot token
    pub bot_token: String,
    /// Display name used in messages
    pub name: String,
}

impl WatchTarget {
    /// Validate raw settings into a target.
    ///
    /// Fails on the first missing or blank value, naming the flag that
    /// supplies it.
    pub fn from_config(config: &TargetConfig) -> Result<Self> {
        let address = required(config.address.as_deref(), "an address", "address")?;
        let api_key = required(config.api_key.as_deref(), "an API key", "apikey")?;
        let chat_id = required(config.chat_id.as_deref(), "a chat ID", "chatid")?;
        let coin = required(config.coin.as_deref(), "a coin", "coin")?;
        let bot_token = required(config.token.as_deref(), "a token", "token")?;
        let name = required(config.name.as_deref(), "a name", "name")?;

        Ok(Self {
            address,
            api_key,
            coin,
            chat_id,
            bot_token,
            name,
        })
    }

    /// Upper-cased ledger symbol for display
    pub fn symbol(&self) -> String {
        self.coin.to_uppercase()
    }
}

fn required(value: Option<&str>, what: &str, flag: &str) -> Result<String> {
    match value.map(str::trim) {
        Some(value) if !value.is_empty() => Ok(value.to_string()),
        _ => Err(Error::config(format!("Please specify {what} using --{flag}"))),
    }
}

impl fmt::Debug for WatchTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WatchTarget")
            .field("address", &self.address)
            .field("api_key", &"<redacted>")
            .field("coin", &self.coin)
            .field("chat_id", &self.chat_id)
            .field("bot_token", &"<redacted>")
            .field("name", &self.name)
            .finish()
    }
}
