//! Server builder and run_server function
//!
//! The builder wires configuration, storage, collectors, the evaluator and the
//! scheduler into an [`AppState`]. Tests inject their own executor, snapshot
//! store and host probe; production connects to the configured database.

use crate::config::Config;
use crate::monitoring::collectors::{CollectorRegistry, HostProbe, default_probe};
use crate::monitoring::{AlertEvaluator, MetricsFacade, SnapshotScheduler, ThresholdTable};
use crate::server::server::HttpServer;
use crate::server::state::AppState;
use crate::storage::database::{Database, QueryExecutor};
use crate::storage::snapshots::{SeaOrmSnapshotStore, SnapshotStore};
use crate::utils::error::Result;
use std::path::Path;
use std::sync::Arc;
use tracing::{info, warn};

/// Assembles the application state
#[derive(Default)]
pub struct ServerBuilder {
    config: Option<Config>,
    executor: Option<Arc<dyn QueryExecutor>>,
    snapshots: Option<Arc<dyn SnapshotStore>>,
    probe: Option<Arc<dyn HostProbe>>,
}

impl ServerBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(mut self, config: Config) -> Self {
        self.config = Some(config);
        self
    }

    /// Use this executor instead of connecting to the configured database
    pub fn with_executor(mut self, executor: Arc<dyn QueryExecutor>) -> Self {
        self.executor = Some(executor);
        self
    }

    pub fn with_snapshot_store(mut self, snapshots: Arc<dyn SnapshotStore>) -> Self {
        self.snapshots = Some(snapshots);
        self
    }

    pub fn with_probe(mut self, probe: Arc<dyn HostProbe>) -> Self {
        self.probe = Some(probe);
        self
    }

    /// Build the state without starting the scheduler
    pub async fn build_state(self) -> Result<AppState> {
        let config = self.config.unwrap_or_default();
        config.validate()?;

        let (executor, snapshots) = match (self.executor, self.snapshots) {
            (Some(executor), Some(snapshots)) => (executor, snapshots),
            (executor, snapshots) => {
                let database = Database::new(&config.storage.database).await?;
                database.migrate().await?;
                let snapshots = snapshots.unwrap_or_else(|| {
                    Arc::new(SeaOrmSnapshotStore::new(database.connection().clone()))
                });
                let executor = executor.unwrap_or_else(|| Arc::new(database));
                (executor, snapshots)
            }
        };

        let probe = self.probe.unwrap_or_else(default_probe);
        let registry = CollectorRegistry::new(&config.monitoring, probe);
        let facade = MetricsFacade::new(
            registry,
            executor,
            snapshots,
            config.monitoring.collector_timeout(),
        );

        let table = match &config.alerts.thresholds_file {
            Some(path) => ThresholdTable::from_file(path).await?,
            None => ThresholdTable::new(config.alerts.thresholds.clone())?,
        };
        info!(thresholds = table.len(), "Threshold table loaded");
        let evaluator = Arc::new(AlertEvaluator::new(table));

        let scheduler = Arc::new(SnapshotScheduler::from_config(
            facade.clone(),
            Arc::clone(&evaluator),
            &config.monitoring,
        ));

        Ok(AppState::new(config, facade, evaluator, scheduler))
    }
}

/// Load `config_path`, falling back to defaults when the file does not exist
pub async fn load_config(config_path: &str) -> Result<Config> {
    if Path::new(config_path).exists() {
        let config = Config::from_file(config_path).await?;
        info!("Configuration file loaded successfully");
        Ok(config)
    } else {
        info!(
            "Configuration file {} not found, using default configuration",
            config_path
        );
        Ok(Config::default())
    }
}

/// Run the monitor until the HTTP server exits
pub async fn run_server(config_path: &str) -> Result<()> {
    info!("Starting admin monitor");

    let config = load_config(config_path).await?;
    let state = ServerBuilder::new()
        .with_config(config.clone())
        .build_state()
        .await?;

    if config.monitoring.scheduler_enabled {
        state.scheduler.start();
    } else {
        info!("Snapshot scheduler disabled by configuration");
    }

    if let Some(path) = &config.alerts.thresholds_file {
        spawn_threshold_reloader(Arc::clone(&state.evaluator), path.clone());
    }

    info!("API Endpoints:");
    info!("   GET  /health");
    info!("   GET  /api/monitor/system-metrics");
    info!("   GET  /api/monitor/{{category}}");
    info!("   GET  /api/monitor/alerts");
    info!("   GET  /api/monitor/history?timeRange=<1h|6h|24h|7d|30d>");

    let scheduler = Arc::clone(&state.scheduler);
    let result = HttpServer::new(config.server.clone(), state).start().await;
    scheduler.stop().await;
    result
}

/// Re-read the threshold file on SIGHUP
#[cfg(unix)]
fn spawn_threshold_reloader(evaluator: Arc<AlertEvaluator>, path: String) {
    use tokio::signal::unix::{SignalKind, signal};

    tokio::spawn(async move {
        let mut hangup = match signal(SignalKind::hangup()) {
            Ok(hangup) => hangup,
            Err(e) => {
                warn!("Threshold reload on SIGHUP unavailable: {}", e);
                return;
            }
        };

        while hangup.recv().await.is_some() {
            info!("SIGHUP received, reloading thresholds from {}", path);
            // a rejected file is logged by the evaluator and the old table stays
            let _ = evaluator.reload_from_file(&path).await;
        }
    });
}

#[cfg(not(unix))]
fn spawn_threshold_reloader(_evaluator: Arc<AlertEvaluator>, path: String) {
    warn!(
        "Threshold file {} is only read at startup on this platform",
        path
    );
}
