//! Configuration data models
//!
//! This module defines all configuration structures used throughout the monitor.

pub mod alerts;
pub mod monitoring;
pub mod server;
pub mod storage;

// Re-export all configuration types
pub use alerts::*;
pub use monitoring::*;
pub use server::*;
pub use storage::*;

/// Default values for configuration
pub fn default_host() -> String {
    "0.0.0.0".to_string()
}

/// Default server port
pub fn default_port() -> u16 {
    8090
}

pub fn default_max_connections() -> u32 {
    10
}

pub fn default_connection_timeout() -> u64 {
    5
}

pub fn default_collector_timeout_ms() -> u64 {
    3_000
}

pub fn default_snapshot_interval_secs() -> u64 {
    300
}

pub fn default_snapshot_retention_days() -> u32 {
    30
}

pub fn default_time_range() -> String {
    "1h".to_string()
}

pub fn default_slow_query_ms() -> u64 {
    1_000
}

pub fn default_true() -> bool {
    true
}
