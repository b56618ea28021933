//! Snapshot persistence against a migrated SQLite database

#[cfg(test)]
mod tests {
    use crate::common::{TestDatabase, metric_set};
    use admin_monitor::monitoring::Category;
    use admin_monitor::storage::database::entities::metric_snapshot;
    use admin_monitor::storage::snapshots::{Snapshot, SnapshotStore};
    use chrono::{DateTime, Duration, TimeZone, Utc};
    use sea_orm::{ActiveModelTrait, Set};

    fn base_time() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap()
    }

    #[tokio::test]
    async fn test_range_is_inclusive_and_oldest_first() {
        let db = TestDatabase::new().await;
        let store = db.snapshot_store();
        let base = base_time();

        // appended out of order on purpose
        for minutes in [10, 0, 5, 20] {
            let at = base + Duration::minutes(minutes);
            let set = metric_set(at, Some(minutes as f64), Some(50.0));
            store.append(&Snapshot::new(set)).await.unwrap();
        }

        let found = store
            .range(base, base + Duration::minutes(10))
            .await
            .unwrap();
        let cpu: Vec<_> = found
            .iter()
            .map(|s| s.metrics.value(Category::Resource, "cpu"))
            .collect();
        assert_eq!(cpu, vec![Some(0.0), Some(5.0), Some(10.0)]);
    }

    #[tokio::test]
    async fn test_payload_survives_storage() {
        let db = TestDatabase::new().await;
        let store = db.snapshot_store();

        let snapshot = Snapshot::new(metric_set(base_time(), Some(12.5), None));
        store.append(&snapshot).await.unwrap();

        let found = store.range(base_time(), base_time()).await.unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].id, snapshot.id);
        assert_eq!(found[0].metrics, snapshot.metrics);
    }

    #[tokio::test]
    async fn test_prune_removes_only_older_snapshots() {
        let db = TestDatabase::new().await;
        let store = db.snapshot_store();
        let base = base_time();

        for days in [0, 10, 40, 45] {
            let at = base - Duration::days(days);
            store
                .append(&Snapshot::new(metric_set(at, Some(1.0), None)))
                .await
                .unwrap();
        }

        let removed = store.prune(base - Duration::days(30)).await.unwrap();
        assert_eq!(removed, 2);

        let left = store
            .range(base - Duration::days(365), base)
            .await
            .unwrap();
        assert_eq!(left.len(), 2);

        assert_eq!(store.prune(base - Duration::days(30)).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_unreadable_rows_are_skipped() {
        let db = TestDatabase::new().await;
        let store = db.snapshot_store();
        let base = base_time();

        store
            .append(&Snapshot::new(metric_set(base, Some(3.0), None)))
            .await
            .unwrap();

        let future_version = metric_snapshot::ActiveModel {
            id: Set("future".to_string()),
            taken_at: Set(base + Duration::minutes(1)),
            schema_version: Set(99),
            payload: Set("{}".to_string()),
        };
        future_version.insert(db.db().connection()).await.unwrap();

        let garbage = metric_snapshot::ActiveModel {
            id: Set("garbage".to_string()),
            taken_at: Set(base + Duration::minutes(2)),
            schema_version: Set(1),
            payload: Set("not json".to_string()),
        };
        garbage.insert(db.db().connection()).await.unwrap();

        let found = store
            .range(base, base + Duration::minutes(5))
            .await
            .unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].metrics.value(Category::Resource, "cpu"), Some(3.0));
    }
}
