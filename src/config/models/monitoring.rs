//! Monitoring configuration

use super::*;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Collector, history and scheduler settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonitoringConfig {
    /// Per-collector timeout in milliseconds
    #[serde(default = "default_collector_timeout_ms")]
    pub collector_timeout_ms: u64,
    /// Seconds between scheduled snapshots
    #[serde(default = "default_snapshot_interval_secs")]
    pub snapshot_interval_secs: u64,
    /// Snapshots older than this are pruned after each run
    #[serde(default = "default_snapshot_retention_days")]
    pub snapshot_retention_days: u32,
    /// Run the snapshot scheduler at all
    #[serde(default = "default_true")]
    pub scheduler_enabled: bool,
    /// Range token used when a history request names none
    #[serde(default = "default_time_range")]
    pub default_time_range: String,
    /// In-flight queries at or above this duration count as slow
    #[serde(default = "default_slow_query_ms")]
    pub slow_query_ms: u64,
    /// Content analytics source
    #[serde(default)]
    pub content: ContentConfig,
    /// Security event source
    #[serde(default)]
    pub security: SecurityConfig,
}

impl Default for MonitoringConfig {
    fn default() -> Self {
        Self {
            collector_timeout_ms: default_collector_timeout_ms(),
            snapshot_interval_secs: default_snapshot_interval_secs(),
            snapshot_retention_days: default_snapshot_retention_days(),
            scheduler_enabled: true,
            default_time_range: default_time_range(),
            slow_query_ms: default_slow_query_ms(),
            content: ContentConfig::default(),
            security: SecurityConfig::default(),
        }
    }
}

impl MonitoringConfig {
    pub fn collector_timeout(&self) -> Duration {
        Duration::from_millis(self.collector_timeout_ms)
    }

    pub fn snapshot_interval(&self) -> Duration {
        Duration::from_secs(self.snapshot_interval_secs)
    }

    pub fn snapshot_retention(&self) -> chrono::Duration {
        chrono::Duration::days(i64::from(self.snapshot_retention_days))
    }
}

/// Table holding the records counted by the content analytics collector
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContentConfig {
    #[serde(default = "default_content_table")]
    pub table: String,
    /// Soft-delete timestamp column; NULL means the record is live
    #[serde(default = "default_deleted_column")]
    pub deleted_column: String,
    #[serde(default = "default_created_column")]
    pub created_column: String,
}

impl Default for ContentConfig {
    fn default() -> Self {
        Self {
            table: default_content_table(),
            deleted_column: default_deleted_column(),
            created_column: default_created_column(),
        }
    }
}

/// Table holding security events (event_type, severity, source, message, occurred_at)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SecurityConfig {
    #[serde(default = "default_security_table")]
    pub table: String,
    /// Maximum number of events returned by the anomaly listing
    #[serde(default = "default_event_limit")]
    pub event_limit: u32,
}

impl Default for SecurityConfig {
    fn default() -> Self {
        Self {
            table: default_security_table(),
            event_limit: default_event_limit(),
        }
    }
}

fn default_content_table() -> String {
    "records".to_string()
}

fn default_deleted_column() -> String {
    "deleted_at".to_string()
}

fn default_created_column() -> String {
    "created_at".to_string()
}

fn default_security_table() -> String {
    "security_events".to_string()
}

fn default_event_limit() -> u32 {
    200
}
