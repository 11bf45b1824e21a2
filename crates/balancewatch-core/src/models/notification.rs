//! Balance change notifications

use std::cmp::Ordering;
use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Which way the balance moved
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// The balance increased
    Deposit,
    /// The balance decreased
    Withdrawal,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Deposit => write!(f, "deposit"),
            Self::Withdrawal => write!(f, "withdrawal"),
        }
    }
}

/// A detected balance change
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    /// Deposit or withdrawal
    pub direction: Direction,
    /// Absolute size of the change
    pub delta: Decimal,
    /// Balance after the change
    pub new_total: Decimal,
}

impl Notification {
    /// Compare two readings, returning `None` when they are equal.
    ///
    /// Readings come from [`super::Observation::from_body`] and are never
    /// negative, so the delta always fits in a `Decimal`.
    pub fn between(previous: Decimal, current: Decimal) -> Option<Self> {
        let (direction, delta) = match current.cmp(&previous) {
            Ordering::Equal => return None,
            Ordering::Greater => (Direction::Deposit, current - previous),
            Ordering::Less => (Direction::Withdrawal, previous - current),
        };

        Some(Self {
            direction,
            delta,
            new_total: current,
        })
    }
}
