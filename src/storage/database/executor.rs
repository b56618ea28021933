//! Query execution capability used by the collectors
//!
//! Collectors never touch a connection directly: they hand a named [`Query`]
//! to a [`QueryExecutor`], which borrows a pooled connection for the duration
//! of that single statement.

use crate::utils::error::Result;
use async_trait::async_trait;
use serde_json::{Map, Value};
use std::borrow::Cow;

/// A named, read-only SQL statement
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Query {
    /// Stable name, used in logs and error reports
    pub name: &'static str,
    /// SQL text with positional placeholders (`$1`, `$2`, ...)
    pub sql: Cow<'static, str>,
}

impl Query {
    pub const fn new(name: &'static str, sql: &'static str) -> Self {
        Self {
            name,
            sql: Cow::Borrowed(sql),
        }
    }

    /// Build a query whose SQL was rendered at runtime (validated identifiers only)
    pub fn owned(name: &'static str, sql: String) -> Self {
        Self {
            name,
            sql: Cow::Owned(sql),
        }
    }
}

/// One result row, keyed by column name
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Row(Map<String, Value>);

impl Row {
    pub fn new(columns: Map<String, Value>) -> Self {
        Self(columns)
    }

    /// Build a row from a JSON object; any other JSON value yields `None`
    pub fn from_json(value: Value) -> Option<Self> {
        match value {
            Value::Object(map) => Some(Self(map)),
            _ => None,
        }
    }

    pub fn get(&self, column: &str) -> Option<&Value> {
        self.0.get(column).filter(|v| !v.is_null())
    }

    /// Numeric column as `f64`; numeric strings are accepted since some drivers
    /// render `numeric` that way
    pub fn get_f64(&self, column: &str) -> Option<f64> {
        match self.get(column)? {
            Value::Number(n) => n.as_f64(),
            Value::String(s) => s.trim().parse().ok(),
            _ => None,
        }
        .filter(|v: &f64| v.is_finite())
    }

    pub fn get_i64(&self, column: &str) -> Option<i64> {
        match self.get(column)? {
            Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f as i64)),
            Value::String(s) => {
                let s = s.trim();
                s.parse()
                    .ok()
                    .or_else(|| s.parse::<f64>().ok().filter(|f| f.is_finite()).map(|f| f as i64))
            }
            _ => None,
        }
    }

    pub fn get_str(&self, column: &str) -> Option<&str> {
        self.get(column)?.as_str()
    }

    pub fn into_json(self) -> Value {
        Value::Object(self.0)
    }
}

/// Read-only query execution against the backing store
#[async_trait]
pub trait QueryExecutor: Send + Sync {
    /// Run `query` with positional `params` and return every row
    async fn execute(&self, query: &Query, params: Vec<sea_orm::Value>) -> Result<Vec<Row>>;

    /// Cheap reachability check
    async fn ping(&self) -> Result<()>;
}
