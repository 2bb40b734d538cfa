//! Timer-driven polling of a [`WeatherSource`].
//!
//! Each tick spawns one fetch, so a slow request can overlap the next one.
//! Requests are numbered and a response is applied only if it is newer than
//! the last applied one. A request still pending after
//! [`REQUEST_TIMEOUT_INTERVALS`] intervals is dropped and reported as
//! [`ClientFetchError::TimedOut`], which bounds how many are in flight.

use std::{sync::Arc, time::Duration};

use tokio::{
    sync::watch,
    task::JoinSet,
    time::{self, MissedTickBehavior},
};
use tokio_util::sync::CancellationToken;

use crate::{
    client::WeatherSource,
    config::REQUEST_TIMEOUT_INTERVALS,
    error::ClientFetchError,
    model::{HistoryEntry, LocationInfo, Snapshot, WeatherEnvelope},
};

/// What the dashboard shows.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DashboardState {
    pub current: Option<Snapshot>,
    pub history: Vec<HistoryEntry>,
    pub location: Option<LocationInfo>,
    /// Message of the last failed poll; cleared by the next success.
    pub error: Option<String>,
    last_applied: Option<u64>,
}

impl DashboardState {
    /// True until the first response (success or failure) arrives.
    pub fn is_loading(&self) -> bool {
        self.last_applied.is_none()
    }

    /// Fold the response of request `seq` into the state.
    ///
    /// Returns false when the response is stale and was dropped. A failure
    /// keeps the last good reading and history.
    pub fn apply(&mut self, seq: u64, result: Result<WeatherEnvelope, ClientFetchError>) -> bool {
        if self.last_applied.is_some_and(|last| seq <= last) {
            return false;
        }
        self.last_applied = Some(seq);

        match result {
            Ok(env) => {
                self.current = Some(env.current);
                self.history = env.history;
                self.location = Some(env.location);
                self.error = None;
            }
            Err(err) => {
                self.error = Some(err.to_string());
            }
        }
        true
    }
}

pub struct Poller {
    source: Arc<dyn WeatherSource>,
    interval: Duration,
    timeout: Duration,
}

impl Poller {
    pub fn new(source: Arc<dyn WeatherSource>, interval: Duration) -> Self {
        Self {
            source,
            interval,
            timeout: interval.saturating_mul(REQUEST_TIMEOUT_INTERVALS),
        }
    }

    /// Poll immediately, then once per interval, until `token` is cancelled.
    ///
    /// Every applied response is published on `updates`. Requests still in
    /// flight at cancellation are aborted.
    pub async fn run(self, token: CancellationToken, updates: watch::Sender<DashboardState>) {
        let mut ticker = time::interval(self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        let mut in_flight = JoinSet::new();
        let mut next_seq: u64 = 0;

        loop {
            tokio::select! {
                biased;

                _ = token.cancelled() => break,

                Some(joined) = in_flight.join_next() => match joined {
                    Ok((seq, result)) => {
                        if let Err(err) = &result {
                            tracing::warn!(seq, error = %err, "Weather poll failed");
                        }
                        updates.send_if_modified(|state| {
                            let applied = state.apply(seq, result);
                            if !applied {
                                tracing::debug!(seq, "Dropped stale weather response");
                            }
                            applied
                        });
                    }
                    Err(err) => tracing::error!(error = %err, "Weather poll task failed"),
                },

                _ = ticker.tick() => {
                    let seq = next_seq;
                    next_seq += 1;
                    let source = self.source.clone();
                    let timeout = self.timeout;
                    in_flight.spawn(async move {
                        let result = time::timeout(timeout, source.fetch())
                            .await
                            .unwrap_or_else(|_| Err(ClientFetchError::TimedOut(timeout)));
                        (seq, result)
                    });
                }
            }
        }

        in_flight.shutdown().await;
        tracing::debug!("Weather poller stopped");
    }
}
