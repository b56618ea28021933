//! Content analytics collector

use super::{CollectContext, Collector, CollectorOutput};
use crate::config::ContentConfig;
use crate::config::validation::is_sql_identifier;
use crate::monitoring::helpers::{safe_percent, safe_ratio};
use crate::monitoring::types::{Category, CollectorError, MetricSpec, MetricUnit};
use crate::storage::database::Query;
use async_trait::async_trait;
use chrono::{Duration, NaiveDate};
use serde_json::json;
use std::collections::HashMap;

static SPECS: [MetricSpec; 7] = [
    MetricSpec::new("total_records", MetricUnit::Count),
    MetricSpec::new("active_records", MetricUnit::Count),
    MetricSpec::new("deleted_records", MetricUnit::Count),
    MetricSpec::new("created_24h", MetricUnit::Count),
    MetricSpec::new("created_7d", MetricUnit::Count),
    MetricSpec::new("deleted_ratio", MetricUnit::Ratio),
    MetricSpec::new("daily_growth_rate", MetricUnit::Percent),
];

/// Days covered by the creation distribution, today included
const DISTRIBUTION_DAYS: i64 = 7;

pub(crate) const COUNTS_QUERY: &str = "content_analytics.counts";
pub(crate) const DISTRIBUTION_QUERY: &str = "content_analytics.distribution";

/// Record volume, soft deletion and creation rate of the configured content table
#[derive(Debug)]
pub struct ContentAnalyticsCollector {
    counts: Query,
    distribution: Query,
    invalid_identifier: Option<String>,
}

impl ContentAnalyticsCollector {
    pub fn new(config: &ContentConfig) -> Self {
        let table = &config.table;
        let deleted = &config.deleted_column;
        let created = &config.created_column;

        let invalid_identifier = [table, deleted, created]
            .into_iter()
            .find(|name| !is_sql_identifier(name))
            .cloned();

        let counts = Query::owned(
            COUNTS_QUERY,
            format!(
                "SELECT count(*)::bigint AS total_records, \
                        count(*) FILTER (WHERE {deleted} IS NULL)::bigint AS active_records, \
                        count(*) FILTER (WHERE {deleted} IS NOT NULL)::bigint AS deleted_records, \
                        count(*) FILTER (WHERE {created} >= now() - interval '24 hours')::bigint AS created_24h, \
                        count(*) FILTER (WHERE {created} >= now() - interval '7 days')::bigint AS created_7d \
                 FROM {table}"
            ),
        );

        let distribution = Query::owned(
            DISTRIBUTION_QUERY,
            format!(
                "SELECT to_char(({created} AT TIME ZONE 'UTC')::date, 'YYYY-MM-DD') AS day, \
                        count(*)::bigint AS created \
                 FROM {table} \
                 WHERE {created} >= (now() AT TIME ZONE 'UTC')::date - 6 \
                 GROUP BY 1 \
                 ORDER BY 1"
            ),
        );

        Self {
            counts,
            distribution,
            invalid_identifier,
        }
    }
}

/// One entry per day ending at `today`, zero-filled where the store returned nothing
fn daily_distribution(today: NaiveDate, counts: &HashMap<String, i64>) -> Vec<serde_json::Value> {
    (0..DISTRIBUTION_DAYS)
        .rev()
        .map(|back| {
            let day = (today - Duration::days(back)).format("%Y-%m-%d").to_string();
            let created = counts.get(&day).copied().unwrap_or(0);
            json!({ "date": day, "created": created })
        })
        .collect()
}

#[async_trait]
impl Collector for ContentAnalyticsCollector {
    fn category(&self) -> Category {
        Category::ContentAnalytics
    }

    fn metric_specs(&self) -> &'static [MetricSpec] {
        &SPECS
    }

    async fn sample(&self, ctx: &CollectContext) -> Result<CollectorOutput, CollectorError> {
        if let Some(name) = &self.invalid_identifier {
            return Err(CollectorError::Query {
                query: COUNTS_QUERY.to_string(),
                message: format!("'{}' is not a valid SQL identifier", name),
            });
        }

        let (counts, days) = tokio::try_join!(
            ctx.query_one(&self.counts, vec![]),
            ctx.query(&self.distribution, vec![]),
        )?;

        let counts = counts.as_ref();
        let count = |column: &str| counts.and_then(|r| r.get_i64(column)).unwrap_or(0) as f64;
        let total = count("total_records");
        let created_24h = count("created_24h");

        let per_day: HashMap<String, i64> = days
            .iter()
            .filter_map(|row| Some((row.get_str("day")?.to_string(), row.get_i64("created")?)))
            .collect();

        let mut output = CollectorOutput::new();
        output
            .set_count("total_records", counts, "total_records")
            .set_count("active_records", counts, "active_records")
            .set_count("deleted_records", counts, "deleted_records")
            .set("created_24h", Some(created_24h))
            .set_count("created_7d", counts, "created_7d")
            .set(
                "deleted_ratio",
                safe_ratio(Some(count("deleted_records")), Some(total)),
            )
            .set(
                "daily_growth_rate",
                safe_percent(Some(created_24h), Some(total - created_24h)),
            )
            .with_details(json!({
                "dailyDistribution": daily_distribution(ctx.collected_at.date_naive(), &per_day),
            }));
        Ok(output)
    }
}
