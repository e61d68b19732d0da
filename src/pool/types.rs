use std::time::Duration;

#[cfg(feature = "postgres")]
use deadpool_postgres::Pool as DeadpoolPostgresPool;
#[cfg(feature = "sqlite")]
use deadpool_sqlite::Pool as DeadpoolSqlitePool;

use crate::config::DbConfig;
use crate::error::SqlFacadeError;
use crate::types::DatabaseType;

const DRAIN_POLL_INTERVAL: Duration = Duration::from_millis(10);

/// Connection pool for database access
///
/// This enum wraps the different connection pool types for the supported database engines.
/// Cloning is cheap: clones share the same underlying pool.
#[derive(Clone)]
pub enum BackendPool {
    /// `PostgreSQL` connection pool
    #[cfg(feature = "postgres")]
    Postgres(DeadpoolPostgresPool),
    /// `SQLite` connection pool
    #[cfg(feature = "sqlite")]
    Sqlite(DeadpoolSqlitePool),
}

impl std::fmt::Debug for BackendPool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            #[cfg(feature = "postgres")]
            Self::Postgres(pool) => f.debug_tuple("Postgres").field(&pool.status()).finish(),
            #[cfg(feature = "sqlite")]
            Self::Sqlite(pool) => f.debug_tuple("Sqlite").field(&pool.status()).finish(),
        }
    }
}

impl BackendPool {
    /// Build a pool for `config`.
    ///
    /// # Errors
    /// Returns `SqlFacadeError::ConnectionError` if the pool cannot be created, or the driver
    /// error from the backend's startup check.
    pub async fn open(config: &DbConfig) -> Result<Self, SqlFacadeError> {
        match config {
            #[cfg(feature = "postgres")]
            DbConfig::Postgres(opts) => {
                crate::postgres::config::create_pool(opts).map(BackendPool::Postgres)
            }
            #[cfg(feature = "sqlite")]
            DbConfig::Sqlite(opts) => crate::sqlite::config::create_pool(opts)
                .await
                .map(BackendPool::Sqlite),
        }
    }

    #[must_use]
    pub fn database_type(&self) -> DatabaseType {
        match self {
            #[cfg(feature = "postgres")]
            Self::Postgres(_) => DatabaseType::Postgres,
            #[cfg(feature = "sqlite")]
            Self::Sqlite(_) => DatabaseType::Sqlite,
        }
    }

    /// Configured upper bound on pooled connections.
    #[must_use]
    pub fn max_size(&self) -> usize {
        match self {
            #[cfg(feature = "postgres")]
            Self::Postgres(pool) => pool.status().max_size,
            #[cfg(feature = "sqlite")]
            Self::Sqlite(pool) => pool.status().max_size,
        }
    }

    /// Connections that exist but are checked out by a caller.
    fn checked_out(&self) -> usize {
        let status = match self {
            #[cfg(feature = "postgres")]
            Self::Postgres(pool) => pool.status(),
            #[cfg(feature = "sqlite")]
            Self::Sqlite(pool) => pool.status(),
        };
        status.size.saturating_sub(status.available)
    }

    fn close_now(&self) {
        match self {
            #[cfg(feature = "postgres")]
            Self::Postgres(pool) => pool.close(),
            #[cfg(feature = "sqlite")]
            Self::Sqlite(pool) => pool.close(),
        }
    }

    /// Close the pool and wait until every checked-out connection has been released.
    ///
    /// Idle connections are dropped immediately; connections still in use are dropped as their
    /// holders return them.
    pub async fn close(&self) {
        self.close_now();
        while self.checked_out() > 0 {
            tokio::time::sleep(DRAIN_POLL_INTERVAL).await;
        }
    }
}
