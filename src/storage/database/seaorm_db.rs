//! SeaORM-backed implementation of the query execution capability

use crate::config::DatabaseConfig;
use crate::utils::error::{MonitorError, Result};
use async_trait::async_trait;
use sea_orm::{
    ConnectOptions, ConnectionTrait, Database, DatabaseConnection, FromQueryResult, JsonValue,
    Statement,
};
use sea_orm_migration::MigratorTrait;
use std::time::Duration;
use tracing::{debug, info, warn};

use super::executor::{Query, QueryExecutor, Row};
use super::migration::Migrator;

/// SeaORM-based database implementation
#[derive(Debug, Clone)]
pub struct SeaOrmDatabase {
    db: DatabaseConnection,
}

impl SeaOrmDatabase {
    /// Create a new database connection pool
    pub async fn new(config: &DatabaseConfig) -> Result<Self> {
        let mut opt = ConnectOptions::new(config.url.clone());
        opt.max_connections(config.max_connections)
            .min_connections(1)
            .connect_timeout(Duration::from_secs(config.connection_timeout))
            .acquire_timeout(Duration::from_secs(config.connection_timeout))
            .idle_timeout(Duration::from_secs(600))
            .max_lifetime(Duration::from_secs(3600))
            .sqlx_logging(true)
            .sqlx_logging_level(log::LevelFilter::Debug);

        let db = Database::connect(opt)
            .await
            .map_err(MonitorError::Database)?;

        info!("Database connection established");
        Ok(Self { db })
    }

    /// Run database migrations
    pub async fn migrate(&self) -> Result<()> {
        info!("Running database migrations...");
        Migrator::up(&self.db, None).await.map_err(|e| {
            warn!("Migration failed: {}", e);
            MonitorError::Database(e)
        })?;
        info!("Database migrations completed successfully");
        Ok(())
    }

    /// Underlying connection pool
    pub fn connection(&self) -> &DatabaseConnection {
        &self.db
    }
}

#[async_trait]
impl QueryExecutor for SeaOrmDatabase {
    async fn execute(&self, query: &Query, params: Vec<sea_orm::Value>) -> Result<Vec<Row>> {
        debug!(query = query.name, "Executing monitoring query");

        let statement = Statement::from_sql_and_values(
            self.db.get_database_backend(),
            query.sql.as_ref(),
            params,
        );

        let rows = JsonValue::find_by_statement(statement)
            .all(&self.db)
            .await
            .map_err(MonitorError::Database)?;

        Ok(rows.into_iter().filter_map(Row::from_json).collect())
    }

    async fn ping(&self) -> Result<()> {
        self.db.ping().await.map_err(MonitorError::Database)
    }
}
