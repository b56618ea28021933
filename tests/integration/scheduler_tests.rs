//! Scheduler runs against a SQLite-backed snapshot store

#[cfg(test)]
mod tests {
    use crate::common::fixtures::test_state_with_store;
    use crate::common::{FakeExecutor, StaticProbe, TestDatabase, metric_set};
    use admin_monitor::Config;
    use admin_monitor::storage::snapshots::{Snapshot, SnapshotStore};
    use chrono::{Duration, Utc};
    use std::sync::Arc;

    #[tokio::test]
    async fn test_triggered_run_persists_and_prunes() {
        let db = TestDatabase::new().await;
        let store = Arc::new(db.snapshot_store());

        let now = Utc::now();
        let expired = now - Duration::days(45);
        store
            .append(&Snapshot::new(metric_set(expired, Some(1.0), None)))
            .await
            .unwrap();

        let state = test_state_with_store(
            Config::default(),
            FakeExecutor::new(),
            StaticProbe::memory_percent(50.0),
            store.clone(),
        )
        .await;

        let handle = state.scheduler.trigger().expect("scheduler should be idle");
        handle.await.unwrap();

        let stats = state.scheduler.stats();
        assert_eq!(stats.runs_completed, 1);
        assert_eq!(stats.runs_failed, 0);
        assert!(stats.last_run_at.is_some());
        assert!(!state.scheduler.is_in_flight());

        let kept = store
            .range(now - Duration::days(365), Utc::now())
            .await
            .unwrap();
        assert_eq!(kept.len(), 1);
        assert!(kept[0].taken_at >= now);
    }

    #[tokio::test]
    async fn test_run_records_failure_when_store_rejects_writes() {
        let db = TestDatabase::new().await;
        let store = Arc::new(db.snapshot_store());

        let state = test_state_with_store(
            Config::default(),
            FakeExecutor::new(),
            StaticProbe::zeros(),
            store,
        )
        .await;

        db.db().connection().clone().close().await.unwrap();

        state.scheduler.trigger().unwrap().await.unwrap();

        let stats = state.scheduler.stats();
        assert_eq!(stats.runs_completed, 0);
        assert_eq!(stats.runs_failed, 1);
        assert!(stats.last_error.is_some());
    }

    #[tokio::test]
    async fn test_start_and_stop_are_idempotent() {
        let db = TestDatabase::new().await;
        let mut config = Config::default();
        config.monitoring.snapshot_interval_secs = 3600;

        let state = test_state_with_store(
            config,
            FakeExecutor::new(),
            StaticProbe::zeros(),
            Arc::new(db.snapshot_store()),
        )
        .await;

        state.scheduler.start();
        state.scheduler.start();
        assert!(state.scheduler.is_running());

        state.scheduler.stop().await;
        state.scheduler.stop().await;
        assert!(!state.scheduler.is_running());
    }
}
