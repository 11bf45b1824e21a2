//! Fakes and fixtures shared by unit tests

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use parking_lot::Mutex;
use rust_decimal::Decimal;
use tokio_util::sync::CancellationToken;

use crate::config::TargetConfig;
use crate::error::{Error, Result};
use crate::models::{Observation, WatchTarget};
use crate::notifier::{NotificationError, NotificationSink};
use crate::provider::BalanceProvider;

pub fn dec(s: &str) -> Decimal {
    s.parse().unwrap()
}

pub fn target() -> WatchTarget {
    WatchTarget::from_config(&TargetConfig {
        address: Some("LTCaddr".to_string()),
        api_key: Some("secret-key".to_string()),
        coin: Some("ltc".to_string()),
        chat_id: Some("-100123".to_string()),
        token: Some("123:bot-token".to_string()),
        name: Some("savings".to_string()),
    })
    .unwrap()
}

/// A real client error, as produced when a request cannot be built or sent
pub fn transport_error() -> Error {
    let source = reqwest::Client::new()
        .get("not a url")
        .build()
        .unwrap_err();
    Error::transport("balance query", source)
}

/// Scripted reading of `s`
pub fn reading(s: &str) -> Step {
    Step::Amount(dec(s))
}

/// One scripted provider response
#[derive(Debug, Clone, Copy)]
pub enum Step {
    Down,
    Amount(Decimal),
    Unreadable,
    Fail,
}

/// Provider that replays a script, one step per cycle.
///
/// Once the script runs out it cancels `done` (if set) and reports the
/// provider as down.
#[derive(Default)]
pub struct ScriptedProvider {
    steps: Mutex<VecDeque<Step>>,
    current: Mutex<Option<Step>>,
    done: Option<CancellationToken>,
    pub probes: AtomicUsize,
    pub queries: AtomicUsize,
}

impl ScriptedProvider {
    pub fn new(steps: impl IntoIterator<Item = Step>) -> Self {
        Self {
            steps: Mutex::new(steps.into_iter().collect()),
            ..Self::default()
        }
    }

    pub fn cancel_when_done(mut self, token: CancellationToken) -> Self {
        self.done = Some(token);
        self
    }

    pub fn probes(&self) -> usize {
        self.probes.load(Ordering::SeqCst)
    }

    pub fn queries(&self) -> usize {
        self.queries.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl BalanceProvider for ScriptedProvider {
    async fn is_available(&self) -> Result<bool> {
        self.probes.fetch_add(1, Ordering::SeqCst);
        let step = self.steps.lock().pop_front();
        if step.is_none() {
            if let Some(done) = &self.done {
                done.cancel();
            }
        }
        *self.current.lock() = step;

        match step {
            None | Some(Step::Down) => Ok(false),
            Some(Step::Fail) => Err(transport_error()),
            Some(_) => Ok(true),
        }
    }

    async fn fetch_balance(&self, _target: &WatchTarget) -> Result<Observation> {
        self.queries.fetch_add(1, Ordering::SeqCst);

        match *self.current.lock() {
            Some(Step::Amount(amount)) => Ok(Observation::Amount(amount)),
            _ => Ok(Observation::Unavailable),
        }
    }
}

/// Sink that records every message, optionally failing all deliveries
#[derive(Default)]
pub struct RecordingSink {
    pub sent: Mutex<Vec<String>>,
    failure: Option<NotificationError>,
}

impl RecordingSink {
    pub fn failing(error: NotificationError) -> Self {
        Self {
            failure: Some(error),
            ..Self::default()
        }
    }

    pub fn messages(&self) -> Vec<String> {
        self.sent.lock().clone()
    }
}

#[async_trait]
impl NotificationSink for RecordingSink {
    async fn deliver(&self, _target: &WatchTarget, text: &str) -> std::result::Result<(), NotificationError> {
        self.sent.lock().push(text.to_string());
        match &self.failure {
            Some(error) => Err(error.clone()),
            None => Ok(()),
        }
    }
}
