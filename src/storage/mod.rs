//! Storage layer for the monitor
//!
//! This module provides read-only query execution for the collectors and
//! durable snapshot persistence for the scheduler.

/// Database storage module
pub mod database;
/// Snapshot persistence module
pub mod snapshots;

pub use database::{Database, Query, QueryExecutor, Row};
pub use snapshots::{MemorySnapshotStore, SeaOrmSnapshotStore, Snapshot, SnapshotStore};
