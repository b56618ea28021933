//! Metric collectors
//!
//! Each collector reads one category of metrics and never fails: a query error
//! or timeout yields a default set with every declared key null and the
//! category marked degraded.

mod connections;
mod content;
mod datastore;
mod probe;
mod query_performance;
mod resource;
mod security;

pub use connections::ConnectionsCollector;
pub use content::ContentAnalyticsCollector;
pub use datastore::DatastoreHealthCollector;
pub use probe::{HostProbe, HostSample, UnavailableProbe, default_probe};
#[cfg(feature = "metrics")]
pub use probe::SysinfoProbe;
pub use query_performance::QueryPerformanceCollector;
pub use resource::ResourceCollector;
pub use security::SecurityEventsCollector;

use crate::config::MonitoringConfig;
use crate::monitoring::types::{Category, CategoryMetrics, CollectorError, Metric, MetricSpec};
use crate::storage::database::{Query, QueryExecutor, Row};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, warn};

/// Shared inputs for one collection pass
#[derive(Clone)]
pub struct CollectContext {
    executor: Arc<dyn QueryExecutor>,
    /// Timestamp stamped on every metric of the pass
    pub collected_at: DateTime<Utc>,
}

impl CollectContext {
    pub fn new(executor: Arc<dyn QueryExecutor>, collected_at: DateTime<Utc>) -> Self {
        Self {
            executor,
            collected_at,
        }
    }

    /// Run a read query, turning any failure into a [`CollectorError::Query`]
    pub async fn query(
        &self,
        query: &Query,
        params: Vec<sea_orm::Value>,
    ) -> Result<Vec<Row>, CollectorError> {
        self.executor
            .execute(query, params)
            .await
            .map_err(|e| CollectorError::Query {
                query: query.name.to_string(),
                message: e.to_string(),
            })
    }

    /// First row of a single-row aggregate, if the store returned one
    pub async fn query_one(
        &self,
        query: &Query,
        params: Vec<sea_orm::Value>,
    ) -> Result<Option<Row>, CollectorError> {
        Ok(self.query(query, params).await?.into_iter().next())
    }
}

/// Raw values produced by a successful sample
#[derive(Debug, Default, Clone, PartialEq)]
pub struct CollectorOutput {
    values: HashMap<&'static str, Option<f64>>,
    details: Option<Value>,
}

impl CollectorOutput {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, key: &'static str, value: Option<f64>) -> &mut Self {
        self.values.insert(key, value);
        self
    }

    /// Count from an aggregate row; an absent row or column counts as zero
    pub fn set_count(&mut self, key: &'static str, row: Option<&Row>, column: &str) -> &mut Self {
        let count = row.and_then(|r| r.get_i64(column)).unwrap_or(0);
        self.set(key, Some(count as f64))
    }

    pub fn with_details(&mut self, details: Value) -> &mut Self {
        self.details = Some(details);
        self
    }

    pub fn value(&self, key: &str) -> Option<f64> {
        self.values.get(key).copied().flatten()
    }

    /// Shape the output into the declared metric list
    fn into_category(
        self,
        category: Category,
        specs: &[MetricSpec],
        collected_at: DateTime<Utc>,
    ) -> CategoryMetrics {
        let metrics = specs
            .iter()
            .map(|spec| {
                Metric::new(
                    spec.key,
                    self.values.get(spec.key).copied().flatten(),
                    spec.unit,
                    category,
                    collected_at,
                )
            })
            .collect();

        CategoryMetrics {
            category,
            metrics,
            degraded: false,
            errors: Vec::new(),
            details: self.details,
        }
    }
}

/// A source of one metric category
#[async_trait]
pub trait Collector: Send + Sync {
    fn category(&self) -> Category;

    /// Keys this collector always reports, in output order
    fn metric_specs(&self) -> &'static [MetricSpec];

    /// Read the raw values; performs no writes
    async fn sample(&self, ctx: &CollectContext) -> Result<CollectorOutput, CollectorError>;

    /// Sample under `timeout`, degrading instead of failing
    async fn collect(&self, ctx: &CollectContext, timeout: Duration) -> CategoryMetrics {
        let category = self.category();
        let started = Instant::now();

        let result = match tokio::time::timeout(timeout, self.sample(ctx)).await {
            Ok(result) => result,
            Err(_) => Err(CollectorError::Timeout {
                timeout_ms: timeout.as_millis() as u64,
            }),
        };

        match result {
            Ok(output) => {
                debug!(
                    category = %category,
                    elapsed_ms = started.elapsed().as_millis() as u64,
                    "Collector finished"
                );
                output.into_category(category, self.metric_specs(), ctx.collected_at)
            }
            Err(error) => {
                warn!(category = %category, "Collector degraded: {}", error);
                CategoryMetrics::degraded(category, self.metric_specs(), ctx.collected_at, error)
            }
        }
    }
}

/// Fixed set of collectors, built once at startup
#[derive(Clone)]
pub struct CollectorRegistry {
    collectors: Vec<Arc<dyn Collector>>,
}

impl CollectorRegistry {
    /// The standard six collectors in registration order
    pub fn new(config: &MonitoringConfig, probe: Arc<dyn HostProbe>) -> Self {
        Self::with_collectors(vec![
            Arc::new(ResourceCollector::new(probe)),
            Arc::new(DatastoreHealthCollector::new()),
            Arc::new(ConnectionsCollector::new()),
            Arc::new(QueryPerformanceCollector::new(config.slow_query_ms)),
            Arc::new(ContentAnalyticsCollector::new(&config.content)),
            Arc::new(SecurityEventsCollector::new(&config.security)),
        ])
    }

    pub fn with_collectors(collectors: Vec<Arc<dyn Collector>>) -> Self {
        Self { collectors }
    }

    pub fn get(&self, category: Category) -> Option<&Arc<dyn Collector>> {
        self.collectors.iter().find(|c| c.category() == category)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Arc<dyn Collector>> {
        self.collectors.iter()
    }

    pub fn categories(&self) -> Vec<Category> {
        self.collectors.iter().map(|c| c.category()).collect()
    }

    pub fn len(&self) -> usize {
        self.collectors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.collectors.is_empty()
    }

    /// Every declared key, qualified as `category.key`
    pub fn declared_keys(&self) -> Vec<String> {
        self.collectors
            .iter()
            .flat_map(|c| {
                let category = c.category();
                c.metric_specs()
                    .iter()
                    .map(move |spec| format!("{}.{}", category, spec.key))
            })
            .collect()
    }
}

impl std::fmt::Debug for CollectorRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CollectorRegistry")
            .field("categories", &self.categories())
            .finish()
    }
}
