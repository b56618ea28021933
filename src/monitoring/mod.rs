//! Metrics aggregation and alerting
//!
//! Leaf first: collectors read one category each, the facade merges them into
//! a [`MetricSet`], the evaluator checks a set against the threshold table,
//! the history bucketer turns stored snapshots into a fixed series, and the
//! scheduler persists a snapshot on a timer.

pub mod alerts;
pub mod collectors;
pub mod facade;
pub mod helpers;
pub mod history;
pub mod scheduler;
#[cfg(test)]
pub(crate) mod testing;
pub mod types;

pub use alerts::{Alert, AlertEvaluator, AlertSeverity, AlertThreshold, ThresholdTable};
pub use collectors::{Collector, CollectorRegistry};
pub use facade::MetricsFacade;
pub use history::{BucketSeries, TimeRange};
pub use scheduler::{SchedulerStats, SnapshotScheduler};
pub use types::{Category, CategoryMetrics, CollectorError, Metric, MetricSet, MetricUnit};
