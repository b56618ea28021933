//! Relational store health collector

use super::{CollectContext, Collector, CollectorOutput};
use crate::monitoring::helpers::{safe_ratio, sum_present};
use crate::monitoring::types::{Category, CollectorError, MetricSpec, MetricUnit};
use crate::storage::database::Query;
use async_trait::async_trait;

static SPECS: [MetricSpec; 9] = [
    MetricSpec::new("database_size", MetricUnit::Bytes),
    MetricSpec::new("total_connections", MetricUnit::Count),
    MetricSpec::new("active_connections", MetricUnit::Count),
    MetricSpec::new("cache_hit_ratio", MetricUnit::Ratio),
    MetricSpec::new("index_hit_ratio", MetricUnit::Ratio),
    MetricSpec::new("transactions_committed", MetricUnit::Count),
    MetricSpec::new("transactions_rolled_back", MetricUnit::Count),
    MetricSpec::new("rollback_ratio", MetricUnit::Ratio),
    MetricSpec::new("deadlocks", MetricUnit::Count),
];

pub(crate) static DATABASE_STATS: Query = Query::new(
    "datastore_health.database_stats",
    "SELECT pg_database_size(current_database())::bigint AS database_size, \
            numbackends::bigint AS total_connections, \
            xact_commit::bigint AS transactions_committed, \
            xact_rollback::bigint AS transactions_rolled_back, \
            blks_hit::float8 AS blks_hit, \
            blks_read::float8 AS blks_read, \
            deadlocks::bigint AS deadlocks \
     FROM pg_stat_database \
     WHERE datname = current_database()",
);

pub(crate) static ACTIVE_CONNECTIONS: Query = Query::new(
    "datastore_health.active_connections",
    "SELECT count(*)::bigint AS active_connections \
     FROM pg_stat_activity \
     WHERE datname = current_database() AND state = 'active'",
);

pub(crate) static INDEX_HITS: Query = Query::new(
    "datastore_health.index_hits",
    "SELECT sum(idx_blks_hit)::float8 AS idx_blks_hit, \
            sum(idx_blks_read)::float8 AS idx_blks_read \
     FROM pg_statio_user_indexes",
);

/// Size, cache efficiency and transaction outcomes of the current database
#[derive(Debug, Default)]
pub struct DatastoreHealthCollector;

impl DatastoreHealthCollector {
    pub fn new() -> Self {
        Self
    }
}

/// `hit / (hit + read)`, `None` when nothing was read at all
fn hit_ratio(hit: Option<f64>, read: Option<f64>) -> Option<f64> {
    safe_ratio(hit, sum_present(&[hit, read]))
}

#[async_trait]
impl Collector for DatastoreHealthCollector {
    fn category(&self) -> Category {
        Category::DatastoreHealth
    }

    fn metric_specs(&self) -> &'static [MetricSpec] {
        &SPECS
    }

    async fn sample(&self, ctx: &CollectContext) -> Result<CollectorOutput, CollectorError> {
        let (stats, active, index) = tokio::try_join!(
            ctx.query_one(&DATABASE_STATS, vec![]),
            ctx.query_one(&ACTIVE_CONNECTIONS, vec![]),
            ctx.query_one(&INDEX_HITS, vec![]),
        )?;

        let stats = stats.as_ref();
        let committed = stats.and_then(|r| r.get_f64("transactions_committed"));
        let rolled_back = stats.and_then(|r| r.get_f64("transactions_rolled_back"));

        let mut output = CollectorOutput::new();
        output
            .set("database_size", stats.and_then(|r| r.get_f64("database_size")))
            .set_count("total_connections", stats, "total_connections")
            .set_count("active_connections", active.as_ref(), "active_connections")
            .set(
                "cache_hit_ratio",
                hit_ratio(
                    stats.and_then(|r| r.get_f64("blks_hit")),
                    stats.and_then(|r| r.get_f64("blks_read")),
                ),
            )
            .set(
                "index_hit_ratio",
                hit_ratio(
                    index.as_ref().and_then(|r| r.get_f64("idx_blks_hit")),
                    index.as_ref().and_then(|r| r.get_f64("idx_blks_read")),
                ),
            )
            .set_count("transactions_committed", stats, "transactions_committed")
            .set_count("transactions_rolled_back", stats, "transactions_rolled_back")
            .set(
                "rollback_ratio",
                safe_ratio(rolled_back, sum_present(&[committed, rolled_back])),
            )
            .set_count("deadlocks", stats, "deadlocks");
        Ok(output)
    }
}
