//! # BalanceWatch
//!
//! Watches the balance of a single ledger address and reports deposits and
//! withdrawals to a Telegram chat.
//!
//! ## Architecture
//!
//! - **Provider**: block explorer client with a liveness probe and a balance query
//! - **Notifier**: Telegram Bot API delivery
//! - **Watcher**: the poll-compare-notify loop and the state it carries
//! - **Format**: exact-decimal rendering of balance changes
//!
//! ## Quick Start
//!
//! ```bash
//! balancewatch watch --address <ADDR> --apikey <KEY> --coin ltc \
//!     --chatid <CHAT> --token <BOT_TOKEN> --name savings
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]

pub mod config;
pub mod error;
pub mod format;
pub mod models;
pub mod notifier;
pub mod provider;
pub mod watcher;

#[cfg(test)]
pub(crate) mod test_support;

pub use config::Config;
pub use error::{Error, Result};

/// Re-exports for convenience
pub mod prelude {
    pub use crate::config::Config;
    pub use crate::error::{Error, Result};
    pub use crate::models::*;
    pub use crate::notifier::{NotificationSink, TelegramNotifier};
    pub use crate::provider::{BalanceProvider, ChainzProvider};
    pub use crate::watcher::{CycleOutcome, CycleReport, Watcher};
}
