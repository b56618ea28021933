//! Security event collector

use super::{CollectContext, Collector, CollectorOutput};
use crate::config::SecurityConfig;
use crate::config::validation::is_sql_identifier;
use crate::monitoring::types::{Category, CollectorError, MetricSpec, MetricUnit};
use crate::storage::database::{Query, Row};
use async_trait::async_trait;
use serde_json::json;

static SPECS: [MetricSpec; 5] = [
    MetricSpec::new("events_24h", MetricUnit::Count),
    MetricSpec::new("critical_events", MetricUnit::Count),
    MetricSpec::new("warning_events", MetricUnit::Count),
    MetricSpec::new("info_events", MetricUnit::Count),
    MetricSpec::new("distinct_sources", MetricUnit::Count),
];

pub(crate) const SUMMARY_QUERY: &str = "security_events.summary";
pub(crate) const ANOMALIES_QUERY: &str = "security_events.anomalies";

/// Severity breakdown of the last day of security events, plus the recent
/// warning and critical events as an anomaly listing
#[derive(Debug)]
pub struct SecurityEventsCollector {
    summary: Query,
    anomalies: Query,
    event_limit: u32,
    invalid_identifier: Option<String>,
}

impl SecurityEventsCollector {
    pub fn new(config: &SecurityConfig) -> Self {
        let table = &config.table;

        let summary = Query::owned(
            SUMMARY_QUERY,
            format!(
                "SELECT count(*)::bigint AS events_24h, \
                        count(*) FILTER (WHERE lower(severity) = 'critical')::bigint AS critical_events, \
                        count(*) FILTER (WHERE lower(severity) = 'warning')::bigint AS warning_events, \
                        count(*) FILTER (WHERE lower(severity) = 'info')::bigint AS info_events, \
                        count(DISTINCT source)::bigint AS distinct_sources \
                 FROM {table} \
                 WHERE occurred_at >= now() - interval '24 hours'"
            ),
        );

        let anomalies = Query::owned(
            ANOMALIES_QUERY,
            format!(
                "SELECT event_type, \
                        lower(severity) AS severity, \
                        source, \
                        message, \
                        to_char(occurred_at AT TIME ZONE 'UTC', 'YYYY-MM-DD\"T\"HH24:MI:SS\"Z\"') AS occurred_at \
                 FROM {table} \
                 WHERE occurred_at >= now() - interval '24 hours' \
                   AND lower(severity) IN ('critical', 'warning') \
                 ORDER BY occurred_at DESC \
                 LIMIT $1"
            ),
        );

        Self {
            summary,
            anomalies,
            event_limit: config.event_limit,
            invalid_identifier: (!is_sql_identifier(table)).then(|| table.clone()),
        }
    }
}

#[async_trait]
impl Collector for SecurityEventsCollector {
    fn category(&self) -> Category {
        Category::SecurityEvents
    }

    fn metric_specs(&self) -> &'static [MetricSpec] {
        &SPECS
    }

    async fn sample(&self, ctx: &CollectContext) -> Result<CollectorOutput, CollectorError> {
        if let Some(name) = &self.invalid_identifier {
            return Err(CollectorError::Query {
                query: SUMMARY_QUERY.to_string(),
                message: format!("'{}' is not a valid SQL identifier", name),
            });
        }

        let limit = sea_orm::Value::BigInt(Some(i64::from(self.event_limit)));
        let (summary, anomalies) = tokio::try_join!(
            ctx.query_one(&self.summary, vec![]),
            ctx.query(&self.anomalies, vec![limit]),
        )?;

        let summary = summary.as_ref();
        let anomalies: Vec<_> = anomalies.into_iter().map(Row::into_json).collect();

        let mut output = CollectorOutput::new();
        output
            .set_count("events_24h", summary, "events_24h")
            .set_count("critical_events", summary, "critical_events")
            .set_count("warning_events", summary, "warning_events")
            .set_count("info_events", summary, "info_events")
            .set_count("distinct_sources", summary, "distinct_sources")
            .with_details(json!({ "anomalies": anomalies }));
        Ok(output)
    }
}
