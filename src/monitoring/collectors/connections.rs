//! Connection state collector

use super::{CollectContext, Collector, CollectorOutput};
use crate::monitoring::helpers::safe_percent;
use crate::monitoring::types::{Category, CollectorError, MetricSpec, MetricUnit};
use crate::storage::database::Query;
use async_trait::async_trait;
use serde_json::{Value, json};

static SPECS: [MetricSpec; 6] = [
    MetricSpec::new("active", MetricUnit::Count),
    MetricSpec::new("idle", MetricUnit::Count),
    MetricSpec::new("idle_in_transaction", MetricUnit::Count),
    MetricSpec::new("total", MetricUnit::Count),
    MetricSpec::new("max", MetricUnit::Count),
    MetricSpec::new("utilization", MetricUnit::Percent),
];

pub(crate) static CONNECTION_STATES: Query = Query::new(
    "connections.states",
    "SELECT count(*) FILTER (WHERE state = 'active')::bigint AS active, \
            count(*) FILTER (WHERE state = 'idle')::bigint AS idle, \
            count(*) FILTER (WHERE state IN ('idle in transaction', 'idle in transaction (aborted)'))::bigint AS idle_in_transaction, \
            count(*)::bigint AS total \
     FROM pg_stat_activity \
     WHERE datname = current_database()",
);

pub(crate) static MAX_CONNECTIONS: Query = Query::new(
    "connections.max",
    "SELECT setting::bigint AS max_connections FROM pg_settings WHERE name = 'max_connections'",
);

pub(crate) static CONNECTION_LIST: Query = Query::new(
    "connections.list",
    "SELECT pid::bigint AS pid, \
            usename AS user_name, \
            application_name, \
            client_addr::text AS client_addr, \
            state, \
            wait_event_type, \
            (EXTRACT(EPOCH FROM (now() - backend_start)) * 1000)::float8 AS connected_ms, \
            (EXTRACT(EPOCH FROM (now() - state_change)) * 1000)::float8 AS state_ms \
     FROM pg_stat_activity \
     WHERE datname = current_database() \
     ORDER BY backend_start \
     LIMIT 100",
);

/// Session counts by state against the server's connection limit
#[derive(Debug, Default)]
pub struct ConnectionsCollector;

impl ConnectionsCollector {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Collector for ConnectionsCollector {
    fn category(&self) -> Category {
        Category::Connections
    }

    fn metric_specs(&self) -> &'static [MetricSpec] {
        &SPECS
    }

    async fn sample(&self, ctx: &CollectContext) -> Result<CollectorOutput, CollectorError> {
        let (states, max, list) = tokio::try_join!(
            ctx.query_one(&CONNECTION_STATES, vec![]),
            ctx.query_one(&MAX_CONNECTIONS, vec![]),
            ctx.query(&CONNECTION_LIST, vec![]),
        )?;

        let states = states.as_ref();
        let total = Some(states.and_then(|r| r.get_f64("total")).unwrap_or(0.0));
        let max = Some(max.and_then(|r| r.get_f64("max_connections")).unwrap_or(0.0));

        let connections: Vec<Value> = list.into_iter().map(|row| row.into_json()).collect();

        let mut output = CollectorOutput::new();
        output
            .set_count("active", states, "active")
            .set_count("idle", states, "idle")
            .set_count("idle_in_transaction", states, "idle_in_transaction")
            .set("total", total)
            .set("max", max)
            .set("utilization", safe_percent(total, max))
            .with_details(json!({ "connections": connections }));
        Ok(output)
    }
}
