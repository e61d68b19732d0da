use deadpool_postgres::{Pool, Runtime};
use tokio_postgres::NoTls;

use crate::config::PostgresOptions;
use crate::error::SqlFacadeError;

/// Create a Postgres pool from validated options.
///
/// No connection is made here; deadpool connects lazily on first checkout.
///
/// # Errors
/// Returns `SqlFacadeError::ConnectionError` if pool creation fails.
pub fn create_pool(opts: &PostgresOptions) -> Result<Pool, SqlFacadeError> {
    opts.config
        .create_pool(Some(Runtime::Tokio1), NoTls)
        .map_err(|e| SqlFacadeError::ConnectionError(format!("Failed to create Postgres pool: {e}")))
}
