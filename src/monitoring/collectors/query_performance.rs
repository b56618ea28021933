//! Query performance collector

use super::{CollectContext, Collector, CollectorOutput};
use crate::monitoring::types::{Category, CollectorError, MetricSpec, MetricUnit};
use crate::storage::database::{Query, Row};
use async_trait::async_trait;
use serde_json::{Value, json};

static SPECS: [MetricSpec; 6] = [
    MetricSpec::new("running_queries", MetricUnit::Count),
    MetricSpec::new("slow_queries", MetricUnit::Count),
    MetricSpec::new("longest_query_ms", MetricUnit::Ms),
    MetricSpec::new("avg_query_ms", MetricUnit::Ms),
    MetricSpec::new("seq_scan_tables", MetricUnit::Count),
    MetricSpec::new("unused_indexes", MetricUnit::Count),
];

/// Tables smaller than this are cheap to scan and never reported
const SEQ_SCAN_MIN_ROWS: i64 = 10_000;

pub(crate) static RUNNING_QUERIES: Query = Query::new(
    "query_performance.running",
    "SELECT count(*)::bigint AS running_queries, \
            count(*) FILTER (WHERE EXTRACT(EPOCH FROM (now() - query_start)) * 1000 >= $1)::bigint AS slow_queries, \
            (max(EXTRACT(EPOCH FROM (now() - query_start))) * 1000)::float8 AS longest_query_ms, \
            (avg(EXTRACT(EPOCH FROM (now() - query_start))) * 1000)::float8 AS avg_query_ms \
     FROM pg_stat_activity \
     WHERE datname = current_database() AND state = 'active' AND pid <> pg_backend_pid()",
);

pub(crate) static IN_FLIGHT: Query = Query::new(
    "query_performance.in_flight",
    "SELECT pid::bigint AS pid, \
            usename AS user_name, \
            (EXTRACT(EPOCH FROM (now() - query_start)) * 1000)::float8 AS duration_ms, \
            wait_event_type, \
            left(query, 200) AS query \
     FROM pg_stat_activity \
     WHERE datname = current_database() AND state = 'active' AND pid <> pg_backend_pid() \
     ORDER BY query_start \
     LIMIT 20",
);

pub(crate) static SEQ_SCAN_TABLES: Query = Query::new(
    "query_performance.seq_scan_tables",
    "SELECT relname AS table_name, \
            seq_scan::bigint AS seq_scan, \
            coalesce(idx_scan, 0)::bigint AS idx_scan, \
            n_live_tup::bigint AS live_rows, \
            count(*) OVER ()::bigint AS total \
     FROM pg_stat_user_tables \
     WHERE seq_scan > coalesce(idx_scan, 0) AND n_live_tup >= $1 \
     ORDER BY seq_scan DESC \
     LIMIT 20",
);

pub(crate) static UNUSED_INDEXES: Query = Query::new(
    "query_performance.unused_indexes",
    "SELECT s.relname AS table_name, \
            s.indexrelname AS index_name, \
            pg_relation_size(s.indexrelid)::bigint AS index_size, \
            count(*) OVER ()::bigint AS total \
     FROM pg_stat_user_indexes s \
     JOIN pg_index i ON i.indexrelid = s.indexrelid \
     WHERE s.idx_scan = 0 AND NOT i.indisunique AND NOT i.indisprimary \
     ORDER BY pg_relation_size(s.indexrelid) DESC \
     LIMIT 20",
);

/// In-flight query latency plus table and index access patterns
#[derive(Debug)]
pub struct QueryPerformanceCollector {
    slow_query_ms: u64,
}

impl QueryPerformanceCollector {
    pub fn new(slow_query_ms: u64) -> Self {
        Self { slow_query_ms }
    }
}

/// Windowed `total` column of a limited listing
fn listed_total(rows: &[Row]) -> f64 {
    rows.first()
        .and_then(|r| r.get_i64("total"))
        .unwrap_or(rows.len() as i64) as f64
}

fn to_json(rows: Vec<Row>) -> Vec<Value> {
    rows.into_iter().map(Row::into_json).collect()
}

#[async_trait]
impl Collector for QueryPerformanceCollector {
    fn category(&self) -> Category {
        Category::QueryPerformance
    }

    fn metric_specs(&self) -> &'static [MetricSpec] {
        &SPECS
    }

    async fn sample(&self, ctx: &CollectContext) -> Result<CollectorOutput, CollectorError> {
        let slow_ms = sea_orm::Value::Double(Some(self.slow_query_ms as f64));
        let min_rows = sea_orm::Value::BigInt(Some(SEQ_SCAN_MIN_ROWS));

        let (running, in_flight, seq_scans, unused) = tokio::try_join!(
            ctx.query_one(&RUNNING_QUERIES, vec![slow_ms]),
            ctx.query(&IN_FLIGHT, vec![]),
            ctx.query(&SEQ_SCAN_TABLES, vec![min_rows]),
            ctx.query(&UNUSED_INDEXES, vec![]),
        )?;

        let running = running.as_ref();

        let mut output = CollectorOutput::new();
        output
            .set_count("running_queries", running, "running_queries")
            .set_count("slow_queries", running, "slow_queries")
            .set("longest_query_ms", running.and_then(|r| r.get_f64("longest_query_ms")))
            .set("avg_query_ms", running.and_then(|r| r.get_f64("avg_query_ms")))
            .set("seq_scan_tables", Some(listed_total(&seq_scans)))
            .set("unused_indexes", Some(listed_total(&unused)))
            .with_details(json!({
                "inFlight": to_json(in_flight),
                "seqScanTables": to_json(seq_scans),
                "unusedIndexes": to_json(unused),
            }));
        Ok(output)
    }
}
