//! Balance providers
//!
//! A provider answers two questions: is the service healthy enough to ask,
//! and what is the current balance of the target address.

mod chainz;

pub use chainz::ChainzProvider;

use async_trait::async_trait;

use crate::error::Result;
use crate::models::{Observation, WatchTarget};

/// Source of balance readings
///
/// `Err` means the request itself failed and is fatal to the watcher. A
/// provider that answers with junk is reported as
/// `Ok(false)` / `Ok(Observation::Unavailable)` instead.
#[async_trait]
pub trait BalanceProvider: Send + Sync {
    /// Cheap health probe, checked before every balance query
    async fn is_available(&self) -> Result<bool>;

    /// Read the current balance of the target
    async fn fetch_balance(&self, target: &WatchTarget) -> Result<Observation>;
}

#[async_trait]
impl<T: BalanceProvider + ?Sized> BalanceProvider for std::sync::Arc<T> {
    async fn is_available(&self) -> Result<bool> {
        (**self).is_available().await
    }

    async fn fetch_balance(&self, target: &WatchTarget) -> Result<Observation> {
        (**self).fetch_balance(target).await
    }
}
