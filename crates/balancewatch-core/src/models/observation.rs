//! Balance observations and the state carried between cycles

use std::str::FromStr;

use rust_decimal::Decimal;

use crate::config::StartupMode;

/// A single balance reading
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Observation {
    /// The provider returned a numeric balance
    Amount(Decimal),
    /// The provider answered, but not with a number
    Unavailable,
}

impl Observation {
    /// Interpret a balance response body.
    ///
    /// Providers in maintenance mode answer with text instead of a number,
    /// which maps to [`Observation::Unavailable`] rather than an error. The
    /// body is parsed straight into a `Decimal`; it never passes through a
    /// binary float. Balances are never negative, so a negative number is
    /// treated as junk too; this keeps deltas between readings in range.
    pub fn from_body(body: &str) -> Self {
        let body = body.trim();

        match Decimal::from_str(body).or_else(|_| Decimal::from_scientific(body)) {
            Ok(amount) if !amount.is_sign_negative() || amount.is_zero() => Self::Amount(amount),
            _ => Self::Unavailable,
        }
    }

    /// The amount, if one was read
    pub fn amount(&self) -> Option<Decimal> {
        match self {
            Self::Amount(amount) => Some(*amount),
            Self::Unavailable => None,
        }
    }
}

/// The last successfully observed balance
///
/// Only ever advanced with a numeric reading; outages leave it untouched.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ObservationState {
    /// `None` until the first reading has been recorded
    pub last_amount: Option<Decimal>,
}

impl ObservationState {
    /// Initial state for the given startup behaviour
    pub fn initial(mode: StartupMode) -> Self {
        match mode {
            StartupMode::Seed => Self { last_amount: None },
            StartupMode::CompareFromZero => Self {
                last_amount: Some(Decimal::ZERO),
            },
        }
    }

    /// State after a successful reading of `amount`
    #[must_use]
    pub fn advance(self, amount: Decimal) -> Self {
        Self {
            last_amount: Some(amount),
        }
    }
}
