//! Cycle results

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

use crate::models::{Notification, ObservationState};
use crate::notifier::NotificationError;

/// Why a cycle made no comparison
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// The liveness probe reported the provider as down
    ProviderDown,
    /// The balance response was not a number
    Unreadable,
}

/// What a single cycle did
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CycleOutcome {
    /// No reading was obtained; state untouched
    Skipped(SkipReason),
    /// First reading recorded without notifying
    Seeded(Decimal),
    /// Reading equal to the previous one
    Unchanged(Decimal),
    /// Change detected and delivered
    Notified(Notification),
    /// Change detected but the message could not be delivered.
    /// The new amount is still recorded.
    DeliveryFailed {
        /// The change that was not reported
        notification: Notification,
        /// Delivery error
        error: NotificationError,
    },
}

/// State after a cycle, with what happened during it
#[derive(Debug, Clone)]
pub struct CycleReport {
    /// State to feed into the next cycle
    pub state: ObservationState,
    /// What the cycle did
    pub outcome: CycleOutcome,
    /// When the cycle finished
    pub finished_at: DateTime<Utc>,
}

impl CycleReport {
    pub(crate) fn new(state: ObservationState, outcome: CycleOutcome) -> Self {
        Self {
            state,
            outcome,
            finished_at: Utc::now(),
        }
    }

    /// The change found in this cycle, delivered or not
    pub fn notification(&self) -> Option<&Notification> {
        match &self.outcome {
            CycleOutcome::Notified(notification)
            | CycleOutcome::DeliveryFailed { notification, .. } => Some(notification),
            _ => None,
        }
    }
}
