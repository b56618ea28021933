//! Application state and metric set factories

use super::{FakeExecutor, StaticProbe};
use admin_monitor::Config;
use admin_monitor::monitoring::{Category, CategoryMetrics, Metric, MetricSet, MetricUnit};
use admin_monitor::server::builder::ServerBuilder;
use admin_monitor::server::state::AppState;
use admin_monitor::storage::snapshots::{MemorySnapshotStore, SnapshotStore};
use chrono::{DateTime, Utc};
use std::sync::Arc;

/// State wired to the fake executor, the given probe and an in-memory snapshot store
pub async fn test_state(config: Config, executor: FakeExecutor, probe: StaticProbe) -> AppState {
    test_state_with_store(config, executor, probe, Arc::new(MemorySnapshotStore::new())).await
}

pub async fn test_state_with_store(
    config: Config,
    executor: FakeExecutor,
    probe: StaticProbe,
    store: Arc<dyn SnapshotStore>,
) -> AppState {
    ServerBuilder::new()
        .with_config(config)
        .with_executor(Arc::new(executor))
        .with_snapshot_store(store)
        .with_probe(Arc::new(probe))
        .build_state()
        .await
        .expect("Failed to build application state")
}

/// Resource-only metric set
pub fn metric_set(at: DateTime<Utc>, cpu: Option<f64>, memory: Option<f64>) -> MetricSet {
    MetricSet::new(
        at,
        vec![CategoryMetrics {
            category: Category::Resource,
            metrics: vec![
                Metric::new("cpu", cpu, MetricUnit::Percent, Category::Resource, at),
                Metric::new("memory", memory, MetricUnit::Percent, Category::Resource, at),
            ],
            degraded: false,
            errors: vec![],
            details: None,
        }],
    )
}
