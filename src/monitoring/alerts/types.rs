//! Alert types and data structures

use crate::monitoring::types::Category;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Comparison applied between an observed value and a threshold
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ComparisonOperator {
    Gte,
    Gt,
    Lte,
    Lt,
}

impl ComparisonOperator {
    /// Whether `observed <op> threshold` holds; the inclusive operators trigger on equality
    pub fn matches(&self, observed: f64, threshold: f64) -> bool {
        match self {
            ComparisonOperator::Gte => observed >= threshold,
            ComparisonOperator::Gt => observed > threshold,
            ComparisonOperator::Lte => observed <= threshold,
            ComparisonOperator::Lt => observed < threshold,
        }
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            ComparisonOperator::Gte => ">=",
            ComparisonOperator::Gt => ">",
            ComparisonOperator::Lte => "<=",
            ComparisonOperator::Lt => "<",
        }
    }
}

/// Alert severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertSeverity {
    /// Informational alert
    Info,
    /// Warning alert
    Warning,
    /// Critical alert
    Critical,
}

impl fmt::Display for AlertSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AlertSeverity::Info => write!(f, "INFO"),
            AlertSeverity::Warning => write!(f, "WARNING"),
            AlertSeverity::Critical => write!(f, "CRITICAL"),
        }
    }
}

/// One threshold rule
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlertThreshold {
    /// Optional human label, used as the alert's reference when present
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Bare (`memory`) or category-qualified (`resource.memory`) metric key
    #[serde(alias = "metricKey")]
    pub metric_key: String,
    pub operator: ComparisonOperator,
    pub value: f64,
    pub severity: AlertSeverity,
}

impl AlertThreshold {
    pub fn new(
        metric_key: impl Into<String>,
        operator: ComparisonOperator,
        value: f64,
        severity: AlertSeverity,
    ) -> Self {
        Self {
            name: None,
            metric_key: metric_key.into(),
            operator,
            value,
            severity,
        }
    }

    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Stable reference carried by alerts raised from this rule
    pub fn reference(&self) -> String {
        match &self.name {
            Some(name) => name.clone(),
            None => format!(
                "{}:{}:{}:{}",
                self.metric_key,
                self.operator.symbol(),
                self.value,
                self.severity
            ),
        }
    }

    /// Split a qualified key into its category and bare key
    pub fn scope(&self) -> (Option<Category>, &str) {
        if let Some((category, key)) = self.metric_key.split_once('.') {
            if let Some(category) = Category::from_name(category) {
                return (Some(category), key);
            }
        }
        (None, self.metric_key.as_str())
    }

    /// Whether this rule applies to `key` in `category`
    pub fn applies_to(&self, category: Category, key: &str) -> bool {
        match self.scope() {
            (Some(scoped), bare) => scoped == category && bare == key,
            (None, bare) => bare == key,
        }
    }
}

/// A threshold breach observed in a metric set
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Alert {
    pub threshold_ref: String,
    pub metric_key: String,
    pub category: Category,
    pub observed_value: f64,
    pub threshold: f64,
    pub operator: ComparisonOperator,
    pub severity: AlertSeverity,
    pub message: String,
    pub timestamp: DateTime<Utc>,
}
