use crate::domain::ports::errors::StoreError;
use sqlx::sqlite::{
    SqliteConnectOptions, SqliteJournalMode, SqlitePool, SqlitePoolOptions, SqliteSynchronous,
};
use std::str::FromStr;
use std::time::Duration;

/// Database connection pool manager.
///
/// SQLite with WAL enabled: the trigger checks read concurrently while the
/// dispatcher appends to the alert log, and WAL keeps readers unblocked.
pub struct DatabaseConnection {
    pool: SqlitePool,
}

impl DatabaseConnection {
    /// Create a new connection pool.
    ///
    /// Journal mode WAL, synchronous NORMAL, foreign keys on, 5s busy
    /// timeout. Creates the database file if missing.
    pub async fn new(database_url: &str, max_connections: u32) -> Result<Self, StoreError> {
        let options = SqliteConnectOptions::from_str(database_url)
            .map_err(|e| StoreError::ConnectionPool(format!("invalid database URL: {e}")))?
            .journal_mode(SqliteJournalMode::Wal)
            .synchronous(SqliteSynchronous::Normal)
            .foreign_keys(true)
            .busy_timeout(Duration::from_secs(5))
            .create_if_missing(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections)
            .acquire_timeout(Duration::from_secs(10))
            .connect_with(options)
            .await
            .map_err(|e| StoreError::ConnectionPool(format!("failed to create pool: {e}")))?;

        Ok(Self { pool })
    }

    /// Run migrations at startup. Safe to call repeatedly; only new
    /// migrations are applied.
    pub async fn migrate(&self) -> Result<(), StoreError> {
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .map_err(|e| StoreError::Migration(format!("migration failed: {e}")))?;
        Ok(())
    }

    /// Pool reference for the repository implementations.
    pub const fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Close the pool gracefully during shutdown.
    pub async fn close(&self) {
        self.pool.close().await;
    }
}
