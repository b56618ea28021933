//! Tests for configuration validation

use super::*;
use crate::config::models::*;
use crate::monitoring::alerts::{AlertSeverity, AlertThreshold, ComparisonOperator};

#[test]
fn test_identifier_rules() {
    assert!(is_sql_identifier("records"));
    assert!(is_sql_identifier("public.records"));
    assert!(is_sql_identifier("_audit_2024"));
    assert!(!is_sql_identifier("records; DROP TABLE users"));
    assert!(!is_sql_identifier("1records"));
    assert!(!is_sql_identifier(""));
}

#[test]
fn test_default_sections_are_valid() {
    assert!(ServerConfig::default().validate().is_ok());
    assert!(StorageConfig::default().validate().is_ok());
    assert!(MonitoringConfig::default().validate().is_ok());
    assert!(AlertsConfig::default().validate().is_ok());
}

#[test]
fn test_server_port_zero_rejected() {
    let config = ServerConfig {
        port: 0,
        ..Default::default()
    };
    assert!(config.validate().is_err());
}

#[test]
fn test_injected_table_name_rejected() {
    let mut config = MonitoringConfig::default();
    config.content.table = "records where 1=1".to_string();
    let err = config.validate().unwrap_err();
    assert!(err.contains("content.table"));
}

#[test]
fn test_zero_timeout_rejected() {
    let config = MonitoringConfig {
        collector_timeout_ms: 0,
        ..Default::default()
    };
    assert!(config.validate().is_err());
}

#[test]
fn test_non_finite_threshold_rejected() {
    let config = AlertsConfig {
        thresholds: vec![AlertThreshold::new(
            "cpu",
            ComparisonOperator::Gte,
            f64::NAN,
            AlertSeverity::Warning,
        )],
        thresholds_file: None,
    };
    assert!(config.validate().is_err());
}
