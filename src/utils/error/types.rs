//! Error types for the monitor

use thiserror::Error;

/// Result type alias for the monitor
pub type Result<T> = std::result::Result<T, MonitorError>;

/// Main error type for the monitor
#[derive(Error, Debug)]
pub enum MonitorError {
    /// Configuration errors (malformed threshold table, unknown range token, bad identifiers)
    #[error("Configuration error: {0}")]
    Config(String),

    /// Database errors
    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    /// Serialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Facade-level aggregation errors
    #[error("Aggregation error: {0}")]
    Aggregation(String),

    /// Snapshot persistence errors
    #[error("Persistence error: {0}")]
    Persistence(String),

    /// Backing store unreachable
    #[error("Backing store unavailable: {0}")]
    StoreUnavailable(String),

    /// Query errors raised by the executor
    #[error("Query error: {0}")]
    Query(String),

    /// Not found errors
    #[error("Not found: {0}")]
    NotFound(String),

    /// Internal server errors
    #[error("Internal server error: {0}")]
    Internal(String),
}
