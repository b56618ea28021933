//! Alerting configuration

use crate::monitoring::alerts::{AlertSeverity, AlertThreshold, ComparisonOperator};
use serde::{Deserialize, Serialize};

/// Alert threshold table as written in the configuration file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AlertsConfig {
    /// Threshold rules, evaluated independently
    #[serde(default = "default_thresholds")]
    pub thresholds: Vec<AlertThreshold>,
    /// Separate threshold file; replaces `thresholds` when set and is re-read on SIGHUP
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thresholds_file: Option<String>,
}

impl Default for AlertsConfig {
    fn default() -> Self {
        Self {
            thresholds: default_thresholds(),
            thresholds_file: None,
        }
    }
}

/// Built-in thresholds used when the configuration names none
pub fn default_thresholds() -> Vec<AlertThreshold> {
    use AlertSeverity::*;
    use ComparisonOperator::*;

    vec![
        AlertThreshold::new("cpu", Gte, 80.0, Warning),
        AlertThreshold::new("cpu", Gte, 95.0, Critical),
        AlertThreshold::new("memory", Gte, 85.0, Warning),
        AlertThreshold::new("memory", Gte, 95.0, Critical),
        AlertThreshold::new("disk", Gte, 90.0, Warning),
        AlertThreshold::new("datastore_health.cache_hit_ratio", Lt, 0.9, Warning),
        AlertThreshold::new("connections.utilization", Gte, 80.0, Warning),
        AlertThreshold::new("query_performance.slow_queries", Gte, 5.0, Warning),
        AlertThreshold::new("security_events.critical_events", Gte, 1.0, Critical),
    ]
}
