//! Human-readable rendering of balance changes

use rust_decimal::Decimal;

use crate::models::{Direction, Notification};

/// Render a notification as the message sent to the operator.
///
/// Amounts are printed in normalized form, so `150.25000000` reads as
/// `150.25` and `120.00` as `120`.
pub fn render(notification: &Notification, name: &str, symbol: &str) -> String {
    let symbol = symbol.to_uppercase();
    let verb = match notification.direction {
        Direction::Deposit => "deposited to",
        Direction::Withdrawal => "withdrawn from",
    };

    format!(
        "{} {symbol} have been {verb} {name}, totalling now {} {symbol}",
        amount(notification.delta),
        amount(notification.new_total),
    )
}

/// Normalized decimal text, without trailing fractional zeros
pub fn amount(value: Decimal) -> String {
    value.normalize().to_string()
}
