//! In-process snapshot store, used when no durable store is wanted and in tests

use super::{Snapshot, SnapshotStore};
use crate::utils::error::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use parking_lot::RwLock;

/// Snapshot store holding everything in memory, ordered by `taken_at`
#[derive(Debug, Default)]
pub struct MemorySnapshotStore {
    snapshots: RwLock<Vec<Snapshot>>,
}

impl MemorySnapshotStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.snapshots.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshots.read().is_empty()
    }
}

#[async_trait]
impl SnapshotStore for MemorySnapshotStore {
    async fn append(&self, snapshot: &Snapshot) -> Result<()> {
        let mut snapshots = self.snapshots.write();
        let at = snapshots.partition_point(|s| s.taken_at <= snapshot.taken_at);
        snapshots.insert(at, snapshot.clone());
        Ok(())
    }

    async fn range(&self, from: DateTime<Utc>, to: DateTime<Utc>) -> Result<Vec<Snapshot>> {
        Ok(self
            .snapshots
            .read()
            .iter()
            .filter(|s| s.taken_at >= from && s.taken_at <= to)
            .cloned()
            .collect())
    }

    async fn prune(&self, older_than: DateTime<Utc>) -> Result<u64> {
        let mut snapshots = self.snapshots.write();
        let before = snapshots.len();
        snapshots.retain(|s| s.taken_at >= older_than);
        Ok((before - snapshots.len()) as u64)
    }
}
