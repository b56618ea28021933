//! Application state shared across HTTP handlers

use crate::config::Config;
use crate::monitoring::{AlertEvaluator, MetricsFacade, SnapshotScheduler};
use std::sync::Arc;

/// HTTP server state shared across handlers
///
/// Every field is cheap to clone; actix clones the state once per worker.
#[derive(Clone)]
pub struct AppState {
    /// Monitor configuration (shared read-only)
    pub config: Arc<Config>,
    /// Collector orchestration
    pub facade: MetricsFacade,
    /// Current threshold table
    pub evaluator: Arc<AlertEvaluator>,
    /// Snapshot scheduler, exposed for its run statistics
    pub scheduler: Arc<SnapshotScheduler>,
}

impl AppState {
    pub fn new(
        config: Config,
        facade: MetricsFacade,
        evaluator: Arc<AlertEvaluator>,
        scheduler: Arc<SnapshotScheduler>,
    ) -> Self {
        Self {
            config: Arc::new(config),
            facade,
            evaluator,
            scheduler,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }
}
