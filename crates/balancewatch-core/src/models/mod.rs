//! Data models for BalanceWatch

mod notification;
mod observation;
mod target;

pub use notification::*;
pub use observation::*;
pub use target::*;
