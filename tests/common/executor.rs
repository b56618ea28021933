//! Scripted query executor
//!
//! Scripts are keyed by query name. A key without a dot (`connections`) covers
//! every query of that category. Unscripted queries return no rows.

use admin_monitor::storage::database::{Query, QueryExecutor, Row};
use admin_monitor::{MonitorError, Result};
use async_trait::async_trait;
use parking_lot::Mutex;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

#[derive(Debug, Clone)]
enum Script {
    Rows(Vec<Value>),
    Fail,
    Delay(Duration),
}

#[derive(Debug, Default)]
pub struct FakeExecutor {
    scripts: Mutex<HashMap<String, Script>>,
    unreachable: AtomicBool,
}

impl FakeExecutor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_rows(self, name: &str, rows: Vec<Value>) -> Self {
        self.scripts.lock().insert(name.to_string(), Script::Rows(rows));
        self
    }

    pub fn failing(self, name: &str) -> Self {
        self.scripts.lock().insert(name.to_string(), Script::Fail);
        self
    }

    pub fn slow(self, name: &str, delay: Duration) -> Self {
        self.scripts.lock().insert(name.to_string(), Script::Delay(delay));
        self
    }

    /// Fail every query and every ping
    pub fn unreachable(self) -> Self {
        self.unreachable.store(true, Ordering::SeqCst);
        self
    }

    fn script(&self, name: &str) -> Option<Script> {
        let scripts = self.scripts.lock();
        scripts
            .get(name)
            .or_else(|| scripts.get(name.split('.').next()?))
            .cloned()
    }
}

#[async_trait]
impl QueryExecutor for FakeExecutor {
    async fn execute(&self, query: &Query, _params: Vec<sea_orm::Value>) -> Result<Vec<Row>> {
        if self.unreachable.load(Ordering::SeqCst) {
            return Err(MonitorError::store_unavailable("connection refused"));
        }
        match self.script(query.name) {
            Some(Script::Rows(rows)) => Ok(rows.into_iter().filter_map(Row::from_json).collect()),
            Some(Script::Fail) => Err(MonitorError::query(format!("{} failed", query.name))),
            Some(Script::Delay(delay)) => {
                tokio::time::sleep(delay).await;
                Ok(Vec::new())
            }
            None => Ok(Vec::new()),
        }
    }

    async fn ping(&self) -> Result<()> {
        if self.unreachable.load(Ordering::SeqCst) {
            Err(MonitorError::store_unavailable("connection refused"))
        } else {
            Ok(())
        }
    }
}
