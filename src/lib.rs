//! # admin-monitor
//!
//! Metrics aggregation and alerting for an administrative monitoring backend.
//!
//! Six independent collectors (host resources, datastore health, connection
//! state, query performance, content analytics and security events) feed a
//! facade that merges them into one [`MetricSet`]. A failing or slow collector
//! only degrades its own category. On top of that sit a threshold
//! [`AlertEvaluator`], a fixed-bucket history view over persisted snapshots,
//! and a single-flight [`SnapshotScheduler`].
//!
//! ```rust,no_run
//! use admin_monitor::server::builder::run_server;
//!
//! #[tokio::main]
//! async fn main() -> admin_monitor::Result<()> {
//!     run_server("config/monitor.yaml").await
//! }
//! ```

#![warn(clippy::all)]
#![allow(clippy::module_inception)]

pub mod config;
pub mod monitoring;
pub mod server;
pub mod storage;
pub mod utils;

pub use config::Config;
pub use monitoring::{
    AlertEvaluator, Category, CategoryMetrics, MetricSet, MetricsFacade, SnapshotScheduler,
};
pub use utils::error::{MonitorError, Result};
