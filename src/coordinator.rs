//! Periodic refresh of one station's telemetry
//!
//! A single writer (the coordinator) replaces the snapshot wholesale on each
//! successful poll; readers observe it through a `watch` channel. A failed poll
//! keeps the previous snapshot and only records the failure.

use crate::api::{PollingFetcher, TelemetrySnapshot};
use crate::error::{FetchError, Result, StarChargeError};
use crate::logging::{StructuredLogger, get_logger};
use chrono::{DateTime, Utc};
use once_cell::sync::OnceCell;
use serde::Serialize;
use std::sync::Arc;
use tokio::sync::{Mutex, watch};
use tokio::time::{Duration, Instant, MissedTickBehavior, interval_at};

/// What readers see after each refresh
#[derive(Debug, Clone, Default, Serialize)]
pub struct CoordinatorState {
    /// Most recently accepted payload
    pub snapshot: Option<Arc<TelemetrySnapshot>>,
    pub last_update_success: bool,
    pub last_error: Option<String>,
    /// Time of the last attempt, successful or not
    pub last_update: Option<DateTime<Utc>>,
    pub last_success: Option<DateTime<Utc>>,
    pub total_polls: u64,
    pub failed_polls: u64,
}

pub struct StationCoordinator {
    fetcher: PollingFetcher,
    update_interval: Duration,
    state_tx: watch::Sender<Arc<CoordinatorState>>,
    // Held for the duration of a fetch so only one is ever in flight
    in_flight: Mutex<()>,
    logger: StructuredLogger,
    // Station-tagged logger, set once the station id is known
    station_logger: OnceCell<StructuredLogger>,
}

impl StationCoordinator {
    pub fn new(fetcher: PollingFetcher, update_interval: Duration) -> Self {
        let (state_tx, _) = watch::channel(Arc::new(CoordinatorState::default()));
        Self {
            fetcher,
            update_interval,
            state_tx,
            in_flight: Mutex::new(()),
            logger: get_logger("coordinator"),
            station_logger: OnceCell::new(),
        }
    }

    /// Tag all further log lines with `station_id`. Only the first call wins.
    pub fn set_station_id(&self, station_id: &str) {
        let _ = self.station_logger.set(self.logger.for_station(station_id));
    }

    pub(crate) fn logger(&self) -> &StructuredLogger {
        self.station_logger.get().unwrap_or(&self.logger)
    }

    pub fn subscribe(&self) -> watch::Receiver<Arc<CoordinatorState>> {
        self.state_tx.subscribe()
    }

    pub fn state(&self) -> Arc<CoordinatorState> {
        self.state_tx.borrow().clone()
    }

    pub fn snapshot(&self) -> Option<Arc<TelemetrySnapshot>> {
        self.state_tx.borrow().snapshot.clone()
    }

    /// Poll once and publish the outcome.
    ///
    /// State is only written after the fetch has completed, so dropping this
    /// future mid-request leaves the published state untouched.
    pub async fn refresh(&self) -> std::result::Result<Arc<TelemetrySnapshot>, FetchError> {
        let _guard = self.in_flight.lock().await;
        let result = self.fetcher.fetch().await;
        let now = Utc::now();

        let previous = self.state();
        let mut next = (*previous).clone();
        next.total_polls = next.total_polls.saturating_add(1);
        next.last_update = Some(now);

        let outcome = match result {
            Ok(snapshot) => {
                let snapshot = Arc::new(snapshot);
                if let Some(station_id) = snapshot.stub_id() {
                    self.set_station_id(&station_id);
                }
                if previous.total_polls > 0 && !previous.last_update_success {
                    self.logger().info("Fetching StarCharge data recovered");
                }
                next.snapshot = Some(snapshot.clone());
                next.last_update_success = true;
                next.last_error = None;
                next.last_success = Some(now);
                Ok(snapshot)
            }
            Err(e) => {
                self.logger()
                    .error(&format!("Error fetching StarCharge data: {}", e));
                next.last_update_success = false;
                next.last_error = Some(e.to_string());
                next.failed_polls = next.failed_polls.saturating_add(1);
                Err(e)
            }
        };

        self.state_tx.send_replace(Arc::new(next));
        outcome
    }

    /// First poll at setup time; the entry is not ready until it succeeds
    pub async fn first_refresh(&self) -> Result<Arc<TelemetrySnapshot>> {
        self.refresh().await.map_err(|e| {
            StarChargeError::api(format!("StarCharge not ready, first refresh failed: {}", e))
        })
    }

    /// Poll every `update_interval` until `shutdown` flips to true (or its
    /// sender goes away). An in-flight fetch is abandoned on shutdown.
    pub async fn run(&self, mut shutdown: watch::Receiver<bool>) {
        let mut ticker = interval_at(Instant::now() + self.update_interval, self.update_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        self.logger().info(&format!(
            "Polling every {}s",
            self.update_interval.as_secs_f64()
        ));

        loop {
            tokio::select! {
                biased;
                _ = shutdown.wait_for(|stop| *stop) => break,
                _ = ticker.tick() => {}
            }

            tokio::select! {
                biased;
                _ = shutdown.wait_for(|stop| *stop) => {
                    self.logger().info("Shutdown during fetch; abandoning request");
                    break;
                }
                // Failures are already recorded in the published state
                _ = self.refresh() => {}
            }
        }

        self.logger().info("Coordinator stopped");
    }
}
