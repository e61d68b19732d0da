use deadpool_sqlite::{Config as DeadpoolSqliteConfig, Pool, PoolConfig, Runtime};

use crate::config::SqliteOptions;
use crate::error::SqlFacadeError;

/// Create a `SQLite` pool and run a connectivity smoke test.
///
/// File databases are switched to WAL so readers and the writer do not block each other.
///
/// # Errors
/// Returns `SqlFacadeError::ConnectionError` if pool creation fails, or the driver error if
/// the first connection cannot be opened.
pub async fn create_pool(opts: &SqliteOptions) -> Result<Pool, SqlFacadeError> {
    let mut cfg = DeadpoolSqliteConfig::new(opts.db_path.clone());
    if let Some(max_size) = opts.effective_max_connections() {
        cfg.pool = Some(PoolConfig::new(max_size));
    }

    let pool = cfg.create_pool(Runtime::Tokio1).map_err(|e| {
        SqlFacadeError::ConnectionError(format!("Failed to create SQLite pool: {e}"))
    })?;

    {
        let conn = pool.get().await?;
        let _mode: String = conn
            .interact(|conn| {
                conn.query_row("PRAGMA journal_mode = WAL;", [], |row| {
                    row.get::<_, String>(0)
                })
            })
            .await??;
    }

    Ok(pool)
}
