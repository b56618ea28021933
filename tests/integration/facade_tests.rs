//! Facade integration tests

#[cfg(test)]
mod tests {
    use crate::common::{FakeExecutor, StaticProbe, metric_set, test_state};
    use admin_monitor::Config;
    use admin_monitor::monitoring::{Category, CollectorError};
    use admin_monitor::storage::snapshots::{Snapshot, SnapshotStore};
    use chrono::{Duration, Utc};
    use std::time::Duration as StdDuration;

    #[tokio::test]
    async fn test_every_category_is_present_in_registration_order() {
        let state = test_state(Config::default(), FakeExecutor::new(), StaticProbe::zeros()).await;
        let set = state.facade.get_all().await;

        let categories: Vec<Category> = set.categories.iter().map(|c| c.category).collect();
        assert_eq!(categories, Category::ALL.to_vec());
    }

    #[tokio::test]
    async fn test_slow_collector_times_out_without_blocking_others() {
        let mut config = Config::default();
        config.monitoring.collector_timeout_ms = 50;
        let executor = FakeExecutor::new().slow("query_performance", StdDuration::from_secs(5));
        let state = test_state(config, executor, StaticProbe::memory_percent(50.0)).await;

        let started = std::time::Instant::now();
        let set = state.facade.get_all().await;
        assert!(started.elapsed() < StdDuration::from_secs(2));

        let slow = set.category(Category::QueryPerformance).unwrap();
        assert!(slow.degraded);
        assert_eq!(slow.errors, vec![CollectorError::Timeout { timeout_ms: 50 }]);
        assert_eq!(set.value(Category::Resource, "memory"), Some(50.0));
        assert_eq!(set.degraded_categories(), vec![Category::QueryPerformance]);
    }

    #[tokio::test]
    async fn test_unknown_category_name_is_not_found() {
        let state = test_state(Config::default(), FakeExecutor::new(), StaticProbe::zeros()).await;
        let err = state.facade.get_category("disk-io").await.unwrap_err();
        assert!(err.to_string().contains("disk-io"));
    }

    #[tokio::test]
    async fn test_history_averages_stored_snapshots() {
        let state = test_state(Config::default(), FakeExecutor::new(), StaticProbe::zeros()).await;
        let now = Utc::now();
        let store = state.facade.snapshot_store();

        for (age, cpu) in [(2, 10.0), (3, 30.0)] {
            let at = now - Duration::minutes(age);
            store
                .append(&Snapshot::new(metric_set(at, Some(cpu), None)))
                .await
                .unwrap();
        }
        let stale = now - Duration::hours(3);
        store
            .append(&Snapshot::new(metric_set(stale, Some(99.0), None)))
            .await
            .unwrap();

        let series = state.facade.get_history_at("1h", now).await.unwrap();
        assert_eq!(series.buckets.len(), 12);

        let last = series.buckets.last().unwrap();
        assert_eq!(last.aggregates["resource.cpu"], Some(20.0));
        assert_eq!(last.aggregates["resource.memory"], None);
        assert!(
            series.buckets[..11]
                .iter()
                .all(|b| b.aggregates["resource.cpu"].is_none())
        );
    }

    #[tokio::test]
    async fn test_snapshot_now_persists_the_collection() {
        let state = test_state(
            Config::default(),
            FakeExecutor::new(),
            StaticProbe::memory_percent(25.0),
        )
        .await;

        let snapshot = state.facade.snapshot_now().await.unwrap();
        assert_eq!(snapshot.taken_at, snapshot.metrics.collected_at);

        let stored = state
            .facade
            .snapshot_store()
            .range(snapshot.taken_at, snapshot.taken_at)
            .await
            .unwrap();
        assert_eq!(stored.len(), 1);
        assert_eq!(stored[0].id, snapshot.id);
        assert_eq!(stored[0].metrics.value(Category::Resource, "memory"), Some(25.0));
    }
}
