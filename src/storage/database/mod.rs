//! Database storage implementation using SeaORM
//!
//! This module provides the query execution capability the collectors read
//! through, plus the snapshot table schema.

/// Database entities module
pub mod entities;
/// Query execution capability
pub mod executor;
/// Database migration module
pub mod migration;
/// SeaORM database implementation module
pub mod seaorm_db;

pub use executor::{Query, QueryExecutor, Row};
pub use seaorm_db::SeaOrmDatabase as Database;
