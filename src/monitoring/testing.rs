//! Scripted collaborators for unit tests

use crate::monitoring::collectors::{HostProbe, HostSample};
use crate::monitoring::types::CollectorError;
use crate::storage::database::{Query, QueryExecutor, Row};
use crate::utils::error::{MonitorError, Result};
use async_trait::async_trait;
use parking_lot::Mutex;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

#[derive(Debug, Clone)]
enum Script {
    Rows(Vec<Row>),
    Fail(String),
    Delay(Duration),
}

/// Executor answering by query name; a script keyed `category` covers every
/// `category.*` query, unscripted queries return no rows
#[derive(Debug, Default)]
pub struct ScriptedExecutor {
    scripts: Mutex<HashMap<String, Script>>,
    calls: Mutex<Vec<String>>,
    ping_fails: AtomicBool,
}

impl ScriptedExecutor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn rows(self, name: &str, rows: Vec<Value>) -> Self {
        let rows = rows.into_iter().filter_map(Row::from_json).collect();
        self.scripts.lock().insert(name.to_string(), Script::Rows(rows));
        self
    }

    pub fn fail(self, name: &str) -> Self {
        self.scripts
            .lock()
            .insert(name.to_string(), Script::Fail(format!("{} exploded", name)));
        self
    }

    pub fn delay(self, name: &str, delay: Duration) -> Self {
        self.scripts.lock().insert(name.to_string(), Script::Delay(delay));
        self
    }

    pub fn unreachable(self) -> Self {
        self.ping_fails.store(true, Ordering::SeqCst);
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().clone()
    }

    fn script_for(&self, name: &str) -> Option<Script> {
        let scripts = self.scripts.lock();
        scripts.get(name).cloned().or_else(|| {
            let prefix = name.split('.').next()?;
            scripts.get(prefix).cloned()
        })
    }
}

#[async_trait]
impl QueryExecutor for ScriptedExecutor {
    async fn execute(&self, query: &Query, _params: Vec<sea_orm::Value>) -> Result<Vec<Row>> {
        self.calls.lock().push(query.name.to_string());
        match self.script_for(query.name) {
            Some(Script::Rows(rows)) => Ok(rows),
            Some(Script::Fail(message)) => Err(MonitorError::query(message)),
            Some(Script::Delay(delay)) => {
                tokio::time::sleep(delay).await;
                Ok(Vec::new())
            }
            None => Ok(Vec::new()),
        }
    }

    async fn ping(&self) -> Result<()> {
        if self.ping_fails.load(Ordering::SeqCst) {
            Err(MonitorError::store_unavailable("connection refused"))
        } else {
            Ok(())
        }
    }
}

/// Probe returning a fixed reading
#[derive(Debug, Clone, Default)]
pub struct FixedProbe(pub Option<HostSample>);

impl FixedProbe {
    pub fn with_memory_percent(percent: f64) -> Self {
        Self(Some(HostSample {
            cpu_percent: Some(10.0),
            memory_used: Some(percent * 1024.0),
            memory_total: Some(100.0 * 1024.0),
            disk_used: Some(50.0),
            disk_total: Some(100.0),
            load_avg_1m: Some(0.5),
            uptime_seconds: Some(3600.0),
        }))
    }
}

impl HostProbe for FixedProbe {
    fn sample(&self) -> std::result::Result<HostSample, CollectorError> {
        self.0.clone().ok_or_else(|| CollectorError::Probe {
            message: "probe offline".to_string(),
        })
    }
}
