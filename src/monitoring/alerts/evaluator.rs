//! Threshold evaluation

use super::table::ThresholdTable;
use super::types::{Alert, AlertThreshold};
use crate::monitoring::types::{Metric, MetricSet};
use crate::utils::error::Result;
use arc_swap::ArcSwap;
use std::path::Path;
use std::sync::Arc;
use tracing::{info, warn};

/// Every alert raised by `set` against `table`
///
/// Each threshold is checked independently, so several rules on one key may all
/// fire. Null values never fire.
pub fn evaluate(set: &MetricSet, table: &ThresholdTable) -> Vec<Alert> {
    let mut alerts = Vec::new();

    for metric in set.metrics() {
        let Some(observed) = metric.value else {
            continue;
        };

        for threshold in table.thresholds() {
            if threshold.applies_to(metric.category, &metric.key)
                && threshold.operator.matches(observed, threshold.value)
            {
                alerts.push(raise(metric, observed, threshold, set));
            }
        }
    }

    alerts
}

fn raise(metric: &Metric, observed: f64, threshold: &AlertThreshold, set: &MetricSet) -> Alert {
    Alert {
        threshold_ref: threshold.reference(),
        metric_key: metric.key.clone(),
        category: metric.category,
        observed_value: observed,
        threshold: threshold.value,
        operator: threshold.operator,
        severity: threshold.severity,
        message: format!(
            "{} is {} ({} {})",
            metric.qualified_key(),
            observed,
            threshold.operator.symbol(),
            threshold.value
        ),
        timestamp: set.collected_at,
    }
}

/// Evaluator holding the current threshold table
#[derive(Debug)]
pub struct AlertEvaluator {
    table: ArcSwap<ThresholdTable>,
}

impl AlertEvaluator {
    pub fn new(table: ThresholdTable) -> Self {
        Self {
            table: ArcSwap::from_pointee(table),
        }
    }

    /// Table in effect right now
    pub fn current(&self) -> Arc<ThresholdTable> {
        self.table.load_full()
    }

    pub fn evaluate(&self, set: &MetricSet) -> Vec<Alert> {
        evaluate(set, &self.table.load())
    }

    /// Replace the whole table
    pub fn reload(&self, table: ThresholdTable) {
        info!(thresholds = table.len(), "Threshold table reloaded");
        self.table.store(Arc::new(table));
    }

    /// Parse and validate `path`, then swap it in; on failure the previous table stays
    pub async fn reload_from_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        match ThresholdTable::from_file(path.as_ref()).await {
            Ok(table) => {
                self.reload(table);
                Ok(())
            }
            Err(e) => {
                warn!(
                    path = %path.as_ref().display(),
                    "Threshold reload rejected, keeping current table: {}",
                    e
                );
                Err(e)
            }
        }
    }
}
