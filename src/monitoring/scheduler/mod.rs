//! Periodic snapshot scheduler
//!
//! One background task ticks at a fixed interval and spawns a snapshot run.
//! Runs are single-flight: a tick that arrives while a run is still in progress
//! is counted and dropped, never queued.


use crate::config::MonitoringConfig;
use crate::monitoring::alerts::{AlertEvaluator, AlertSeverity};
use crate::monitoring::facade::MetricsFacade;
use chrono::{DateTime, Utc};
use futures::FutureExt;
use parking_lot::{Mutex, RwLock};
use serde::Serialize;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, error, info, warn};

/// Run counters
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SchedulerStats {
    pub runs_completed: u64,
    pub runs_failed: u64,
    pub ticks_skipped: u64,
    pub last_run_at: Option<DateTime<Utc>>,
    pub last_error: Option<String>,
}

struct Inner {
    facade: MetricsFacade,
    evaluator: Arc<AlertEvaluator>,
    interval: Duration,
    retention: chrono::Duration,
    in_flight: AtomicBool,
    stats: RwLock<SchedulerStats>,
}

/// Clears the in-flight flag when a run ends, including by panic
struct FlightGuard(Arc<Inner>);

impl Drop for FlightGuard {
    fn drop(&mut self) {
        self.0.in_flight.store(false, Ordering::Release);
    }
}

struct Running {
    shutdown: watch::Sender<bool>,
    handle: JoinHandle<()>,
}

/// Background job taking a snapshot every `interval`
pub struct SnapshotScheduler {
    inner: Arc<Inner>,
    running: Mutex<Option<Running>>,
}

impl SnapshotScheduler {
    pub fn new(
        facade: MetricsFacade,
        evaluator: Arc<AlertEvaluator>,
        interval: Duration,
        retention: chrono::Duration,
    ) -> Self {
        Self {
            inner: Arc::new(Inner {
                facade,
                evaluator,
                interval,
                retention,
                in_flight: AtomicBool::new(false),
                stats: RwLock::new(SchedulerStats::default()),
            }),
            running: Mutex::new(None),
        }
    }

    pub fn from_config(
        facade: MetricsFacade,
        evaluator: Arc<AlertEvaluator>,
        config: &MonitoringConfig,
    ) -> Self {
        Self::new(
            facade,
            evaluator,
            config.snapshot_interval(),
            config.snapshot_retention(),
        )
    }

    pub fn interval(&self) -> Duration {
        self.inner.interval
    }

    /// Start ticking; the first tick fires immediately. Calling it twice is a no-op.
    pub fn start(&self) {
        let mut running = self.running.lock();
        if running.is_some() {
            warn!("Snapshot scheduler already running");
            return;
        }

        let (shutdown, mut shutdown_rx) = watch::channel(false);
        let inner = Arc::clone(&self.inner);

        let handle = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(inner.interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

            loop {
                tokio::select! {
                    _ = ticker.tick() => {
                        Inner::trigger(&inner);
                    }
                    changed = shutdown_rx.changed() => {
                        if changed.is_err() || *shutdown_rx.borrow() {
                            break;
                        }
                    }
                }
            }
            debug!("Snapshot scheduler loop exited");
        });

        info!(
            interval_secs = self.inner.interval.as_secs(),
            "Snapshot scheduler started"
        );
        *running = Some(Running { shutdown, handle });
    }

    /// Stop ticking and wait for the timer task to exit. A run already in
    /// progress is left to finish on its own.
    pub async fn stop(&self) {
        let running = self.running.lock().take();
        if let Some(Running { shutdown, handle }) = running {
            let _ = shutdown.send(true);
            if let Err(e) = handle.await {
                warn!("Snapshot scheduler task ended abnormally: {}", e);
            }
            info!("Snapshot scheduler stopped");
        }
    }

    pub fn is_running(&self) -> bool {
        self.running.lock().is_some()
    }

    /// Whether a snapshot run is in progress right now
    pub fn is_in_flight(&self) -> bool {
        self.inner.in_flight.load(Ordering::Acquire)
    }

    /// Start one run now unless one is already in progress
    pub fn trigger(&self) -> Option<JoinHandle<()>> {
        Inner::trigger(&self.inner)
    }

    pub fn stats(&self) -> SchedulerStats {
        self.inner.stats.read().clone()
    }
}

impl Inner {
    fn trigger(inner: &Arc<Inner>) -> Option<JoinHandle<()>> {
        if inner
            .in_flight
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            inner.stats.write().ticks_skipped += 1;
            debug!("Snapshot run still in progress, skipping tick");
            return None;
        }

        let guard = FlightGuard(Arc::clone(inner));
        Some(tokio::spawn(async move {
            let inner = Arc::clone(&guard.0);
            if let Err(payload) = AssertUnwindSafe(inner.run()).catch_unwind().await {
                let message = payload
                    .downcast_ref::<&str>()
                    .map(|s| s.to_string())
                    .or_else(|| payload.downcast_ref::<String>().cloned())
                    .unwrap_or_else(|| "unknown panic".to_string());
                error!("Snapshot run panicked: {}", message);
                inner.record_failure(format!("run panicked: {}", message));
            }
            drop(guard);
        }))
    }

    async fn run(&self) {
        let started = Utc::now();

        let snapshot = match self.facade.snapshot_now().await {
            Ok(snapshot) => snapshot,
            Err(e) => {
                error!("Scheduled snapshot failed: {}", e);
                self.record_failure(e.to_string());
                return;
            }
        };

        let degraded = snapshot.metrics.degraded_categories();
        if !degraded.is_empty() {
            warn!(?degraded, id = %snapshot.id, "Snapshot persisted with degraded categories");
        }

        for alert in self.evaluator.evaluate(&snapshot.metrics) {
            match alert.severity {
                AlertSeverity::Critical => error!(
                    threshold = %alert.threshold_ref,
                    observed = alert.observed_value,
                    "[{}] {}", alert.severity, alert.message
                ),
                AlertSeverity::Warning => warn!(
                    threshold = %alert.threshold_ref,
                    observed = alert.observed_value,
                    "[{}] {}", alert.severity, alert.message
                ),
                AlertSeverity::Info => info!(
                    threshold = %alert.threshold_ref,
                    observed = alert.observed_value,
                    "[{}] {}", alert.severity, alert.message
                ),
            }
        }

        let cutoff = snapshot.taken_at - self.retention;
        match self.facade.snapshot_store().prune(cutoff).await {
            Ok(0) => {}
            Ok(removed) => info!(removed, %cutoff, "Pruned expired snapshots"),
            Err(e) => error!("Snapshot pruning failed: {}", e),
        }

        let mut stats = self.stats.write();
        stats.runs_completed += 1;
        stats.last_run_at = Some(started);
        stats.last_error = None;
    }

    fn record_failure(&self, message: String) {
        let mut stats = self.stats.write();
        stats.runs_failed += 1;
        stats.last_run_at = Some(Utc::now());
        stats.last_error = Some(message);
    }
}

impl std::fmt::Debug for SnapshotScheduler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SnapshotScheduler")
            .field("interval", &self.inner.interval)
            .field("running", &self.is_running())
            .field("stats", &self.stats())
            .finish()
    }
}
