use deadpool_sqlite::Pool;
use deadpool_sqlite::rusqlite::params_from_iter;

use super::{Params, build_result_set};
use crate::error::SqlFacadeError;
use crate::results::ResultSet;
use crate::types::RowValues;

/// Execute a batch of SQL statements inside one transaction
///
/// # Errors
/// Returns errors from pool checkout, the blocking interaction, or batch execution.
pub async fn execute_batch(pool: &Pool, query: &str) -> Result<(), SqlFacadeError> {
    let conn = pool.get().await?;
    let sql = query.to_owned();
    conn.interact(move |conn| {
        let tx = conn.transaction()?;
        tx.execute_batch(&sql)?;
        tx.commit()?;
        Ok::<_, SqlFacadeError>(())
    })
    .await?
}

/// Execute a SELECT (or any row-returning statement) with positional parameters
///
/// # Errors
/// Returns errors from pool checkout, the blocking interaction, preparation, or execution.
pub async fn execute_select(
    pool: &Pool,
    query: &str,
    params: &[RowValues],
) -> Result<ResultSet, SqlFacadeError> {
    let conn = pool.get().await?;
    let sql = query.to_owned();
    let values = Params::convert(params);
    conn.interact(move |conn| {
        let mut stmt = conn.prepare_cached(&sql)?;
        build_result_set(&mut stmt, values.as_values())
    })
    .await?
}

/// Execute a DML query (INSERT, UPDATE, DELETE) and return the affected row count
///
/// Rows the statement produces (`RETURNING`, or a plain `SELECT`) are stepped through and
/// discarded. Read-only statements report 0.
///
/// # Errors
/// Returns errors from pool checkout, the blocking interaction, preparation, or execution.
pub async fn execute_dml(
    pool: &Pool,
    query: &str,
    params: &[RowValues],
) -> Result<u64, SqlFacadeError> {
    let conn = pool.get().await?;
    let sql = query.to_owned();
    let values = Params::convert(params);
    conn.interact(move |conn| {
        let mut stmt = conn.prepare_cached(&sql)?;
        let readonly = stmt.readonly();
        {
            let mut rows = stmt.query(params_from_iter(values.as_values().iter()))?;
            while rows.next()?.is_some() {}
        }
        // `changes()` still holds the last write's count after a read-only statement.
        let affected = if readonly { 0 } else { conn.changes() as u64 };
        Ok::<_, SqlFacadeError>(affected)
    })
    .await?
}
