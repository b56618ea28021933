//! Test database utilities
//!
//! Each test gets an isolated in-memory SQLite database with the snapshot
//! table migrated.

use admin_monitor::config::DatabaseConfig;
use admin_monitor::storage::database::Database;
use admin_monitor::storage::snapshots::SeaOrmSnapshotStore;
use std::sync::Arc;

/// Test database wrapper providing isolated in-memory SQLite instances
#[derive(Debug, Clone)]
pub struct TestDatabase {
    inner: Arc<Database>,
}

impl TestDatabase {
    pub async fn new() -> Self {
        let config = DatabaseConfig {
            url: "sqlite::memory:".to_string(),
            // In-memory DB only supports 1 connection
            max_connections: 1,
            connection_timeout: 5,
        };

        let db = Database::new(&config)
            .await
            .expect("Failed to create in-memory test database");

        db.migrate()
            .await
            .expect("Failed to run database migrations");

        Self {
            inner: Arc::new(db),
        }
    }

    pub fn db(&self) -> &Database {
        &self.inner
    }

    pub fn snapshot_store(&self) -> SeaOrmSnapshotStore {
        SeaOrmSnapshotStore::new(self.inner.connection().clone())
    }
}
