//! Core metric types shared by collectors, the facade and the history bucketer

use chrono::{DateTime, Utc};
use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Metric category, one per collector
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Resource,
    DatastoreHealth,
    Connections,
    QueryPerformance,
    ContentAnalytics,
    SecurityEvents,
}

impl Category {
    /// Every category in registration order
    pub const ALL: [Category; 6] = [
        Category::Resource,
        Category::DatastoreHealth,
        Category::Connections,
        Category::QueryPerformance,
        Category::ContentAnalytics,
        Category::SecurityEvents,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Resource => "resource",
            Category::DatastoreHealth => "datastore_health",
            Category::Connections => "connections",
            Category::QueryPerformance => "query_performance",
            Category::ContentAnalytics => "content_analytics",
            Category::SecurityEvents => "security_events",
        }
    }

    /// URL path segment
    pub fn path(&self) -> &'static str {
        match self {
            Category::Resource => "resource",
            Category::DatastoreHealth => "datastore-health",
            Category::Connections => "connections",
            Category::QueryPerformance => "query-performance",
            Category::ContentAnalytics => "content-analytics",
            Category::SecurityEvents => "security-events",
        }
    }

    /// Resolve either the snake_case name or the kebab-case path segment
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|c| c.as_str() == name || c.path() == name)
    }

    /// Whether the category is read from the relational store (as opposed to the host)
    pub fn uses_store(&self) -> bool {
        !matches!(self, Category::Resource)
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Unit attached to a metric value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum MetricUnit {
    Percent,
    Count,
    Bytes,
    Ms,
    Ratio,
}

/// Static declaration of a metric a collector produces
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MetricSpec {
    pub key: &'static str,
    pub unit: MetricUnit,
}

impl MetricSpec {
    pub const fn new(key: &'static str, unit: MetricUnit) -> Self {
        Self { key, unit }
    }
}

/// A single typed metric value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Metric {
    pub key: String,
    /// `None` when the source had no data; never NaN or infinite
    pub value: Option<f64>,
    pub unit: MetricUnit,
    pub category: Category,
    pub collected_at: DateTime<Utc>,
}

impl Metric {
    /// Build a metric, normalizing non-finite values to `None`
    pub fn new(
        key: impl Into<String>,
        value: Option<f64>,
        unit: MetricUnit,
        category: Category,
        collected_at: DateTime<Utc>,
    ) -> Self {
        Self {
            key: key.into(),
            value: value.filter(|v| v.is_finite()),
            unit,
            category,
            collected_at,
        }
    }

    /// Fully qualified key, `category.key`
    pub fn qualified_key(&self) -> String {
        format!("{}.{}", self.category, self.key)
    }
}

/// Error recorded against a degraded category
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case", rename_all_fields = "camelCase")]
pub enum CollectorError {
    #[error("collector timed out after {timeout_ms}ms")]
    Timeout { timeout_ms: u64 },

    #[error("query '{query}' failed: {message}")]
    Query { query: String, message: String },

    #[error("host probe failed: {message}")]
    Probe { message: String },

    #[error("collector panicked: {message}")]
    Panicked { message: String },
}

/// Output of one collector for one invocation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryMetrics {
    pub category: Category,
    pub metrics: Vec<Metric>,
    pub degraded: bool,
    #[serde(default)]
    pub errors: Vec<CollectorError>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl CategoryMetrics {
    /// Well-formed default set: every declared key present with a null value
    pub fn degraded(
        category: Category,
        specs: &[MetricSpec],
        collected_at: DateTime<Utc>,
        error: CollectorError,
    ) -> Self {
        Self {
            category,
            metrics: specs
                .iter()
                .map(|spec| Metric::new(spec.key, None, spec.unit, category, collected_at))
                .collect(),
            degraded: true,
            errors: vec![error],
            details: None,
        }
    }

    pub fn get(&self, key: &str) -> Option<&Metric> {
        self.metrics.iter().find(|m| m.key == key)
    }

    pub fn value(&self, key: &str) -> Option<f64> {
        self.get(key).and_then(|m| m.value)
    }
}

/// Aggregate of every category for one facade invocation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricSet {
    pub collected_at: DateTime<Utc>,
    #[serde(with = "ordered_categories")]
    pub categories: Vec<CategoryMetrics>,
}

impl MetricSet {
    pub fn new(collected_at: DateTime<Utc>, categories: Vec<CategoryMetrics>) -> Self {
        Self {
            collected_at,
            categories,
        }
    }

    pub fn category(&self, category: Category) -> Option<&CategoryMetrics> {
        self.categories.iter().find(|c| c.category == category)
    }

    pub fn value(&self, category: Category, key: &str) -> Option<f64> {
        self.category(category).and_then(|c| c.value(key))
    }

    /// Whether any category is degraded
    pub fn degraded(&self) -> bool {
        self.categories.iter().any(|c| c.degraded)
    }

    pub fn degraded_categories(&self) -> Vec<Category> {
        self.categories
            .iter()
            .filter(|c| c.degraded)
            .map(|c| c.category)
            .collect()
    }

    /// All metrics, in category then declaration order
    pub fn metrics(&self) -> impl Iterator<Item = &Metric> {
        self.categories.iter().flat_map(|c| c.metrics.iter())
    }
}

/// Serializes the category list as a JSON object keyed by category, keeping list order
mod ordered_categories {
    use super::*;

    pub fn serialize<S: Serializer>(
        categories: &[CategoryMetrics],
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(categories.len()))?;
        for category in categories {
            map.serialize_entry(category.category.as_str(), category)?;
        }
        map.end()
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Vec<CategoryMetrics>, D::Error> {
        struct OrderedVisitor;

        impl<'de> Visitor<'de> for OrderedVisitor {
            type Value = Vec<CategoryMetrics>;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a map of category name to category metrics")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
                let mut categories = Vec::with_capacity(access.size_hint().unwrap_or(6));
                while let Some((_, metrics)) = access.next_entry::<String, CategoryMetrics>()? {
                    categories.push(metrics);
                }
                Ok(categories)
            }
        }

        deserializer.deserialize_map(OrderedVisitor)
    }
}
