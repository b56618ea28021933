//! Snapshot store backed by the `metric_snapshots` table

use super::{SNAPSHOT_SCHEMA_VERSION, Snapshot, SnapshotStore};
use crate::storage::database::entities::metric_snapshot;
use crate::utils::error::{MonitorError, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
};
use tracing::{debug, warn};

/// SeaORM implementation of [`SnapshotStore`]
#[derive(Debug, Clone)]
pub struct SeaOrmSnapshotStore {
    db: DatabaseConnection,
}

impl SeaOrmSnapshotStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    fn decode(model: metric_snapshot::Model) -> Option<Snapshot> {
        if model.schema_version != SNAPSHOT_SCHEMA_VERSION {
            warn!(
                id = %model.id,
                version = model.schema_version,
                "Skipping snapshot with unsupported schema version"
            );
            return None;
        }

        match serde_json::from_str(&model.payload) {
            Ok(metrics) => Some(Snapshot {
                id: model.id,
                taken_at: model.taken_at,
                schema_version: model.schema_version,
                metrics,
            }),
            Err(e) => {
                warn!(id = %model.id, "Skipping unreadable snapshot payload: {}", e);
                None
            }
        }
    }
}

#[async_trait]
impl SnapshotStore for SeaOrmSnapshotStore {
    async fn append(&self, snapshot: &Snapshot) -> Result<()> {
        let payload = serde_json::to_string(&snapshot.metrics)?;

        let model = metric_snapshot::ActiveModel {
            id: Set(snapshot.id.clone()),
            taken_at: Set(snapshot.taken_at),
            schema_version: Set(snapshot.schema_version),
            payload: Set(payload),
        };

        model
            .insert(&self.db)
            .await
            .map_err(|e| MonitorError::from_snapshot_store("Failed to append snapshot", e))?;

        debug!(id = %snapshot.id, "Snapshot appended");
        Ok(())
    }

    async fn range(&self, from: DateTime<Utc>, to: DateTime<Utc>) -> Result<Vec<Snapshot>> {
        let models = metric_snapshot::Entity::find()
            .filter(metric_snapshot::Column::TakenAt.gte(from))
            .filter(metric_snapshot::Column::TakenAt.lte(to))
            .order_by_asc(metric_snapshot::Column::TakenAt)
            .all(&self.db)
            .await
            .map_err(|e| MonitorError::from_snapshot_store("Failed to read snapshots", e))?;

        Ok(models.into_iter().filter_map(Self::decode).collect())
    }

    async fn prune(&self, older_than: DateTime<Utc>) -> Result<u64> {
        let result = metric_snapshot::Entity::delete_many()
            .filter(metric_snapshot::Column::TakenAt.lt(older_than))
            .exec(&self.db)
            .await
            .map_err(|e| MonitorError::from_snapshot_store("Failed to prune snapshots", e))?;

        Ok(result.rows_affected)
    }
}
