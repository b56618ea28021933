//! Validators for each configuration section

use super::trait_def::Validate;
use crate::config::models::*;
use crate::monitoring::alerts::ThresholdTable;
use crate::monitoring::history::TimeRange;
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

static SQL_IDENTIFIER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*(\.[A-Za-z_][A-Za-z0-9_]*)?$").unwrap());

/// Whether `name` can be spliced into SQL as a (optionally schema-qualified) identifier
pub fn is_sql_identifier(name: &str) -> bool {
    SQL_IDENTIFIER.is_match(name)
}

fn check_identifier(field: &str, value: &str) -> Result<(), String> {
    if is_sql_identifier(value) {
        Ok(())
    } else {
        Err(format!("{} '{}' is not a valid SQL identifier", field, value))
    }
}

impl Validate for ServerConfig {
    fn validate(&self) -> Result<(), String> {
        if self.port == 0 {
            return Err("Server port cannot be 0".to_string());
        }
        if self.host.is_empty() {
            return Err("Server host cannot be empty".to_string());
        }
        if self.workers == Some(0) {
            return Err("Worker count must be greater than 0".to_string());
        }
        Ok(())
    }
}

impl Validate for StorageConfig {
    fn validate(&self) -> Result<(), String> {
        if self.database.url.is_empty() {
            return Err("Database URL is required".to_string());
        }
        if self.database.max_connections == 0 {
            return Err("Database max_connections must be greater than 0".to_string());
        }
        Ok(())
    }
}

impl Validate for MonitoringConfig {
    fn validate(&self) -> Result<(), String> {
        debug!("Validating monitoring configuration");

        if self.collector_timeout_ms == 0 {
            return Err("collector_timeout_ms must be greater than 0".to_string());
        }
        if self.snapshot_interval_secs == 0 {
            return Err("snapshot_interval_secs must be greater than 0".to_string());
        }
        if self.snapshot_retention_days == 0 {
            return Err("snapshot_retention_days must be greater than 0".to_string());
        }
        if TimeRange::parse(&self.default_time_range).is_none() {
            return Err(format!(
                "Unknown default_time_range '{}', expected one of {}",
                self.default_time_range,
                TimeRange::tokens().join(", ")
            ));
        }

        check_identifier("content.table", &self.content.table)?;
        check_identifier("content.deleted_column", &self.content.deleted_column)?;
        check_identifier("content.created_column", &self.content.created_column)?;
        check_identifier("security.table", &self.security.table)?;

        if self.security.event_limit == 0 {
            return Err("security.event_limit must be greater than 0".to_string());
        }

        Ok(())
    }
}

impl Validate for AlertsConfig {
    fn validate(&self) -> Result<(), String> {
        if self.thresholds_file.as_deref().is_some_and(str::is_empty) {
            return Err("thresholds_file cannot be empty".to_string());
        }
        ThresholdTable::new(self.thresholds.clone())
            .map(|_| ())
            .map_err(|e| e.to_string())
    }
}
