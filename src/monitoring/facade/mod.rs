//! Metrics facade
//!
//! Runs the registered collectors and merges their output. Collector futures
//! are polled in place rather than spawned, so dropping a request future drops
//! its in-flight queries with it.


use crate::monitoring::collectors::{CollectContext, Collector, CollectorRegistry};
use crate::monitoring::history::{BucketSeries, TimeRange, build_series};
use crate::monitoring::types::{Category, CategoryMetrics, CollectorError, MetricSet};
use crate::storage::database::QueryExecutor;
use crate::storage::snapshots::{Snapshot, SnapshotStore};
use crate::utils::error::{MonitorError, Result};
use chrono::{DateTime, Utc};
use futures::FutureExt;
use futures::future::join_all;
use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, info, warn};

/// Entry point for every metric read
#[derive(Clone)]
pub struct MetricsFacade {
    registry: CollectorRegistry,
    executor: Arc<dyn QueryExecutor>,
    snapshots: Arc<dyn SnapshotStore>,
    timeout: Duration,
    declared_keys: Arc<Vec<String>>,
}

impl MetricsFacade {
    pub fn new(
        registry: CollectorRegistry,
        executor: Arc<dyn QueryExecutor>,
        snapshots: Arc<dyn SnapshotStore>,
        timeout: Duration,
    ) -> Self {
        let declared_keys = Arc::new(registry.declared_keys());
        Self {
            registry,
            executor,
            snapshots,
            timeout,
            declared_keys,
        }
    }

    pub fn registry(&self) -> &CollectorRegistry {
        &self.registry
    }

    pub fn snapshot_store(&self) -> &Arc<dyn SnapshotStore> {
        &self.snapshots
    }

    /// Per-collector timeout
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    fn context(&self) -> CollectContext {
        CollectContext::new(Arc::clone(&self.executor), Utc::now())
    }

    /// Collect every category concurrently; degraded categories never fail the call
    pub async fn get_all(&self) -> MetricSet {
        let ctx = self.context();
        let categories = join_all(
            self.registry
                .iter()
                .map(|collector| self.collect_isolated(collector.as_ref(), &ctx)),
        )
        .await;

        let set = MetricSet::new(ctx.collected_at, categories);
        let degraded = set.degraded_categories();
        if degraded.is_empty() {
            debug!("Collected all {} categories", set.categories.len());
        } else {
            warn!(?degraded, "Metric set collected with degraded categories");
        }
        set
    }

    /// Collect one category by snake_case name or path segment
    pub async fn get_category(&self, name: &str) -> Result<CategoryMetrics> {
        let category = Category::from_name(name)
            .ok_or_else(|| MonitorError::not_found(format!("Unknown metric category '{}'", name)))?;
        self.get(category).await
    }

    pub async fn get(&self, category: Category) -> Result<CategoryMetrics> {
        let collector = self.registry.get(category).ok_or_else(|| {
            MonitorError::not_found(format!("Metric category '{}' is not registered", category))
        })?;
        let ctx = self.context();
        Ok(self.collect_isolated(collector.as_ref(), &ctx).await)
    }

    /// Bucket series for `token` ending now; unknown tokens fall back to `1h`
    pub async fn get_history(&self, token: &str) -> Result<BucketSeries> {
        self.get_history_at(token, Utc::now()).await
    }

    pub async fn get_history_at(&self, token: &str, now: DateTime<Utc>) -> Result<BucketSeries> {
        let range = TimeRange::resolve(token);
        let snapshots = self.snapshots.range(now - range.span(), now).await?;
        debug!(range = %range, samples = snapshots.len(), "Building history series");
        Ok(build_series(range, now, &self.declared_keys, &snapshots))
    }

    /// Collect everything and persist it as one snapshot
    pub async fn snapshot_now(&self) -> Result<Snapshot> {
        let snapshot = Snapshot::new(self.get_all().await);
        self.snapshots.append(&snapshot).await?;
        info!(id = %snapshot.id, taken_at = %snapshot.taken_at, "Snapshot persisted");
        Ok(snapshot)
    }

    /// Fail with [`MonitorError::StoreUnavailable`] when every store-backed
    /// category in `categories` is degraded and the store does not answer a ping
    pub async fn ensure_store_reachable<'a, I>(&self, categories: I) -> Result<()>
    where
        I: IntoIterator<Item = &'a CategoryMetrics>,
    {
        let mut store_backed = categories
            .into_iter()
            .filter(|c| c.category.uses_store())
            .peekable();
        if store_backed.peek().is_none() || !store_backed.all(|c| c.degraded) {
            return Ok(());
        }

        self.executor.ping().await.map_err(|e| {
            error!("Backing store unreachable: {}", e);
            MonitorError::store_unavailable(e.to_string())
        })
    }

    async fn collect_isolated(
        &self,
        collector: &dyn Collector,
        ctx: &CollectContext,
    ) -> CategoryMetrics {
        let category = collector.category();
        match AssertUnwindSafe(collector.collect(ctx, self.timeout))
            .catch_unwind()
            .await
        {
            Ok(metrics) => metrics,
            Err(payload) => {
                let message = panic_message(payload.as_ref());
                let err = MonitorError::aggregation(format!(
                    "collector '{}' panicked: {}",
                    category, message
                ));
                error!("{}", err);
                CategoryMetrics::degraded(
                    category,
                    collector.metric_specs(),
                    ctx.collected_at,
                    CollectorError::Panicked { message },
                )
            }
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    payload
        .downcast_ref::<&str>()
        .map(|s| s.to_string())
        .or_else(|| payload.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "unknown panic".to_string())
}

impl std::fmt::Debug for MetricsFacade {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MetricsFacade")
            .field("registry", &self.registry)
            .field("timeout", &self.timeout)
            .finish()
    }
}
