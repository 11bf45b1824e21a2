//! Poll loop
//!
//! The watcher runs one cycle immediately and then one per tick: probe the
//! provider, read the balance, compare it with the last reading and report
//! any change. Cycles never overlap, and the state flows from one cycle into
//! the next by value.

mod outcome;

pub use outcome::{CycleOutcome, CycleReport, SkipReason};

use std::time::Duration;

use tokio::time::{interval, sleep, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use crate::config::WatcherConfig;
use crate::error::{Error, Result};
use crate::format;
use crate::models::{Notification, Observation, ObservationState, WatchTarget};
use crate::notifier::NotificationSink;
use crate::provider::BalanceProvider;

/// Periodically observes one target and reports balance changes
pub struct Watcher<P, N> {
    target: WatchTarget,
    provider: P,
    notifier: N,
    config: WatcherConfig,
}

impl<P, N> Watcher<P, N>
where
    P: BalanceProvider,
    N: NotificationSink,
{
    /// Create a new watcher
    pub fn new(target: WatchTarget, provider: P, notifier: N, config: WatcherConfig) -> Self {
        Self {
            target,
            provider,
            notifier,
            config,
        }
    }

    /// The watched target
    pub fn target(&self) -> &WatchTarget {
        &self.target
    }

    /// State before the first cycle, per the configured startup mode
    pub fn initial_state(&self) -> ObservationState {
        ObservationState::initial(self.config.startup)
    }

    /// Run one poll-compare-notify cycle against `state`.
    ///
    /// Returns `Err` only for fatal failures (the provider could not be
    /// reached). Outages and delivery failures are reported in the outcome.
    pub async fn run_cycle(&self, state: ObservationState) -> Result<CycleReport> {
        if !self.provider.is_available().await? {
            warn!("API seems down, skipping this round");
            return Ok(CycleReport::new(
                state,
                CycleOutcome::Skipped(SkipReason::ProviderDown),
            ));
        }

        let amount = match self.provider.fetch_balance(&self.target).await? {
            Observation::Amount(amount) => amount,
            Observation::Unavailable => {
                warn!("Balance unreadable, skipping this round");
                return Ok(CycleReport::new(
                    state,
                    CycleOutcome::Skipped(SkipReason::Unreadable),
                ));
            }
        };

        let next = state.advance(amount);

        let Some(previous) = state.last_amount else {
            info!(amount = %format::amount(amount), "Recorded initial balance");
            return Ok(CycleReport::new(next, CycleOutcome::Seeded(amount)));
        };

        let Some(notification) = Notification::between(previous, amount) else {
            debug!(amount = %format::amount(amount), "Balance unchanged");
            return Ok(CycleReport::new(next, CycleOutcome::Unchanged(amount)));
        };

        let text = format::render(&notification, &self.target.name, &self.target.coin);

        let outcome = match self.notifier.deliver(&self.target, &text).await {
            Ok(()) => {
                info!(
                    direction = %notification.direction,
                    delta = %format::amount(notification.delta),
                    total = %format::amount(notification.new_total),
                    "Balance change reported"
                );
                CycleOutcome::Notified(notification)
            }
            Err(e) => {
                error!(
                    direction = %notification.direction,
                    delta = %format::amount(notification.delta),
                    error = %e,
                    "Failed to deliver balance change"
                );
                CycleOutcome::DeliveryFailed {
                    notification,
                    error: e,
                }
            }
        };

        Ok(CycleReport::new(next, outcome))
    }

    /// Run cycles until `shutdown` is cancelled.
    ///
    /// A stop request is honoured between cycles. A cycle already in flight
    /// may finish within the configured grace period and is abandoned after
    /// it. Returns the last recorded state.
    pub async fn run(&self, shutdown: CancellationToken) -> Result<ObservationState> {
        info!(
            address = %self.target.address,
            symbol = %self.target.symbol(),
            interval = %humantime::format_duration(self.config.interval),
            startup = ?self.config.startup,
            "Starting balance watcher"
        );

        let mut ticker = interval(self.config.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        let mut state = self.initial_state();
        let mut cycles: u64 = 0;

        loop {
            tokio::select! {
                biased;
                () = shutdown.cancelled() => break,
                _ = ticker.tick() => {}
            }

            let cycle = self.run_cycle(state);
            tokio::pin!(cycle);

            let report = tokio::select! {
                report = &mut cycle => report?,
                () = grace_expired(&shutdown, self.config.shutdown_grace) => {
                    warn!(
                        grace = %humantime::format_duration(self.config.shutdown_grace),
                        "Abandoning cycle still running after shutdown grace period"
                    );
                    break;
                }
            };

            cycles += 1;
            state = report.state;

            if let CycleOutcome::DeliveryFailed { error, .. } = report.outcome {
                if self.config.exit_on_delivery_failure {
                    return Err(Error::Notification(error));
                }
            }
        }

        info!(
            cycles,
            last_amount = ?state.last_amount.map(format::amount),
            "Balance watcher stopped"
        );
        Ok(state)
    }
}

async fn grace_expired(shutdown: &CancellationToken, grace: Duration) {
    shutdown.cancelled().await;
    sleep(grace).await;
}
