//! HTTP surface tests
//!
//! Drive the full actix application against scripted data sources and check
//! the response envelope, status codes and payload shapes.

#[cfg(test)]
mod tests {
    use crate::common::{FakeExecutor, StaticProbe, test_state};
    use actix_web::{test, web};
    use admin_monitor::Config;
    use admin_monitor::monitoring::{AlertSeverity, AlertThreshold};
    use admin_monitor::monitoring::alerts::ComparisonOperator;
    use admin_monitor::server::server::HttpServer;
    use serde_json::{Value, json};

    fn metric<'a>(body: &'a Value, category: &str, key: &str) -> &'a Value {
        body["data"]["categories"][category]["metrics"]
            .as_array()
            .and_then(|metrics| metrics.iter().find(|m| m["key"] == key))
            .map(|m| &m["value"])
            .unwrap_or_else(|| panic!("metric {}.{} missing", category, key))
    }

    fn zero_everywhere() -> FakeExecutor {
        FakeExecutor::new()
            .with_rows(
                "datastore_health.database_stats",
                vec![json!({
                    "database_size": 0,
                    "total_connections": 0,
                    "blks_hit": 0,
                    "blks_read": 0,
                    "transactions_committed": 0,
                    "transactions_rolled_back": 0,
                    "deadlocks": 0
                })],
            )
            .with_rows(
                "datastore_health.index_hits",
                vec![json!({ "idx_blks_hit": 0, "idx_blks_read": 0 })],
            )
            .with_rows(
                "connections.states",
                vec![json!({ "active": 0, "idle": 0, "idle_in_transaction": 0, "total": 0 })],
            )
            .with_rows("connections.max", vec![json!({ "max_connections": 0 })])
            .with_rows(
                "content_analytics.counts",
                vec![json!({
                    "total_records": 0,
                    "active_records": 0,
                    "deleted_records": 0,
                    "created_24h": 0,
                    "created_7d": 0
                })],
            )
    }

    #[actix_web::test]
    async fn test_zero_everywhere_yields_nulls_for_ratios() {
        let state = test_state(Config::default(), zero_everywhere(), StaticProbe::zeros()).await;
        let app = test::init_service(HttpServer::create_app(web::Data::new(state))).await;

        let req = test::TestRequest::get()
            .uri("/api/monitor/system-metrics")
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), 200);
        let body: Value = test::read_body_json(resp).await;

        assert_eq!(body["code"], 200);
        assert!(body["timestamp"].is_string());

        assert!(metric(&body, "resource", "memory").is_null());
        assert!(metric(&body, "resource", "disk").is_null());
        assert!(metric(&body, "datastore_health", "cache_hit_ratio").is_null());
        assert!(metric(&body, "datastore_health", "rollback_ratio").is_null());
        assert!(metric(&body, "connections", "utilization").is_null());
        assert!(metric(&body, "content_analytics", "deleted_ratio").is_null());
        assert!(metric(&body, "content_analytics", "daily_growth_rate").is_null());

        assert_eq!(metric(&body, "connections", "active"), 0.0);
        assert_eq!(metric(&body, "content_analytics", "total_records"), 0.0);
        assert_eq!(metric(&body, "security_events", "events_24h"), 0.0);

        for category in body["data"]["categories"].as_object().unwrap().values() {
            assert_eq!(category["degraded"], false);
        }
    }

    #[actix_web::test]
    async fn test_one_failing_collector_degrades_only_itself() {
        let executor = zero_everywhere()
            .with_rows(
                "datastore_health.database_stats",
                vec![json!({ "blks_hit": 90, "blks_read": 10, "total_connections": 7 })],
            )
            .failing("connections");
        let state = test_state(Config::default(), executor, StaticProbe::memory_percent(50.0)).await;
        let app = test::init_service(HttpServer::create_app(web::Data::new(state))).await;

        let req = test::TestRequest::get()
            .uri("/api/monitor/system-metrics")
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), 200);
        let body: Value = test::read_body_json(resp).await;

        let connections = &body["data"]["categories"]["connections"];
        assert_eq!(connections["degraded"], true);
        assert_eq!(connections["errors"][0]["kind"], "query");
        for m in connections["metrics"].as_array().unwrap() {
            assert!(m["value"].is_null(), "{} should be null", m["key"]);
        }

        assert_eq!(body["data"]["categories"]["datastore_health"]["degraded"], false);
        assert_eq!(metric(&body, "datastore_health", "cache_hit_ratio"), 0.9);
        assert_eq!(metric(&body, "datastore_health", "total_connections"), 7.0);
        assert_eq!(metric(&body, "resource", "memory"), 50.0);
    }

    #[actix_web::test]
    async fn test_memory_threshold_raises_single_warning() {
        let mut config = Config::default();
        config.alerts.thresholds = vec![AlertThreshold::new(
            "memory",
            ComparisonOperator::Gte,
            85.0,
            AlertSeverity::Warning,
        )];
        let state = test_state(config, zero_everywhere(), StaticProbe::memory_percent(90.0)).await;
        let app = test::init_service(HttpServer::create_app(web::Data::new(state))).await;

        let req = test::TestRequest::get().uri("/api/monitor/alerts").to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;

        let alerts = body["data"]["alerts"].as_array().unwrap();
        assert_eq!(alerts.len(), 1);
        assert_eq!(alerts[0]["severity"], "warning");
        assert_eq!(alerts[0]["metricKey"], "memory");
        assert_eq!(alerts[0]["category"], "resource");
        let observed = alerts[0]["observedValue"].as_f64().unwrap();
        assert!((observed - 90.0).abs() < 1e-9);
        assert_eq!(alerts[0]["threshold"], 85.0);
        assert!(body["data"]["degradedCategories"].as_array().unwrap().is_empty());
    }

    #[actix_web::test]
    async fn test_unreachable_store_is_503() {
        let state = test_state(
            Config::default(),
            FakeExecutor::new().unreachable(),
            StaticProbe::memory_percent(20.0),
        )
        .await;
        let app = test::init_service(HttpServer::create_app(web::Data::new(state))).await;

        for uri in ["/api/monitor/system-metrics", "/api/monitor/alerts", "/api/monitor/connections"] {
            let req = test::TestRequest::get().uri(uri).to_request();
            let resp = test::call_service(&app, req).await;
            assert_eq!(resp.status(), 503, "{}", uri);
            let body: Value = test::read_body_json(resp).await;
            assert_eq!(body["code"], 503);
            assert!(body["data"].is_null());
        }

        // host readings do not touch the store
        let req = test::TestRequest::get().uri("/api/monitor/resource").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), 200);
    }

    #[actix_web::test]
    async fn test_category_route_uses_kebab_case() {
        let state = test_state(Config::default(), zero_everywhere(), StaticProbe::zeros()).await;
        let app = test::init_service(HttpServer::create_app(web::Data::new(state))).await;

        let req = test::TestRequest::get()
            .uri("/api/monitor/query-performance")
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["data"]["category"], "query_performance");
        assert_eq!(body["data"]["degraded"], false);
    }

    #[actix_web::test]
    async fn test_connection_listing_returns_rows() {
        let executor = zero_everywhere().with_rows(
            "connections.list",
            vec![
                json!({ "pid": 101, "state": "active", "application_name": "api" }),
                json!({ "pid": 102, "state": "idle", "application_name": "worker" }),
            ],
        );
        let state = test_state(Config::default(), executor, StaticProbe::zeros()).await;
        let app = test::init_service(HttpServer::create_app(web::Data::new(state))).await;

        let req = test::TestRequest::get()
            .uri("/api/monitor/connections/list")
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        let items = body["data"]["items"].as_array().unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(items[0]["pid"], 101);
        assert_eq!(body["data"]["category"], "connections");
    }

    #[actix_web::test]
    async fn test_history_with_unknown_range_defaults_to_one_hour() {
        let state = test_state(Config::default(), zero_everywhere(), StaticProbe::zeros()).await;
        let app = test::init_service(HttpServer::create_app(web::Data::new(state))).await;

        let req = test::TestRequest::get()
            .uri("/api/monitor/history?timeRange=fortnight")
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["data"]["range"], "1h");
        assert_eq!(body["data"]["interval"], 300);

        let buckets = body["data"]["buckets"].as_array().unwrap();
        assert_eq!(buckets.len(), 12);
        for bucket in buckets {
            assert!(bucket["aggregates"]["resource.cpu"].is_null());
        }
    }

    #[actix_web::test]
    async fn test_history_without_range_uses_configured_default() {
        let mut config = Config::default();
        config.monitoring.default_time_range = "7d".to_string();
        let state = test_state(config, zero_everywhere(), StaticProbe::zeros()).await;
        let app = test::init_service(HttpServer::create_app(web::Data::new(state))).await;

        let req = test::TestRequest::get().uri("/api/monitor/history").to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["data"]["range"], "7d");
        assert_eq!(body["data"]["interval"], 50_400);
    }
}
