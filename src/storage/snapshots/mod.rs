//! Durable snapshots of aggregate metric sets
//!
//! Snapshots are append-only: a row is never updated after it is written, and
//! the only deletion is retention pruning.

mod database;
mod memory;

pub use database::SeaOrmSnapshotStore;
pub use memory::MemorySnapshotStore;

use crate::monitoring::types::MetricSet;
use crate::utils::error::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Payload format written by this build
pub const SNAPSHOT_SCHEMA_VERSION: i32 = 1;

/// Immutable persisted copy of a metric set
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    pub id: String,
    pub taken_at: DateTime<Utc>,
    pub schema_version: i32,
    pub metrics: MetricSet,
}

impl Snapshot {
    /// Wrap a freshly collected set; the snapshot takes the set's collection time
    pub fn new(metrics: MetricSet) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            taken_at: metrics.collected_at,
            schema_version: SNAPSHOT_SCHEMA_VERSION,
            metrics,
        }
    }
}

/// Snapshot persistence
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SnapshotStore: Send + Sync {
    /// Persist one snapshot
    async fn append(&self, snapshot: &Snapshot) -> Result<()>;

    /// Snapshots with `from <= taken_at <= to`, oldest first
    async fn range(&self, from: DateTime<Utc>, to: DateTime<Utc>) -> Result<Vec<Snapshot>>;

    /// Delete snapshots taken before `older_than`, returning how many were removed
    async fn prune(&self, older_than: DateTime<Utc>) -> Result<u64>;
}
