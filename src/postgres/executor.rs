use deadpool_postgres::Pool;

use super::{Params, build_result_set_from_statement};
use crate::error::SqlFacadeError;
use crate::results::ResultSet;
use crate::types::RowValues;

/// Execute a batch of SQL statements inside one transaction
///
/// # Errors
/// Returns errors from pool checkout, transaction operations, or batch execution.
pub async fn execute_batch(pool: &Pool, query: &str) -> Result<(), SqlFacadeError> {
    let mut client = pool.get().await?;
    let tx = client.transaction().await?;
    tx.batch_execute(query).await?;
    tx.commit().await?;
    Ok(())
}

/// Execute a SELECT (or any row-returning statement) with positional parameters
///
/// # Errors
/// Returns errors from pool checkout, statement preparation, execution, or row extraction.
pub async fn execute_select(
    pool: &Pool,
    query: &str,
    params: &[RowValues],
) -> Result<ResultSet, SqlFacadeError> {
    let client = pool.get().await?;
    let stmt = client.prepare_cached(query).await?;
    let converted = Params::convert(params);
    let rows = client.query(&stmt, converted.as_refs()).await?;
    build_result_set_from_statement(&stmt, &rows)
}

/// Execute a DML query (INSERT, UPDATE, DELETE) and return the affected row count
///
/// # Errors
/// Returns errors from pool checkout, statement preparation, or execution.
pub async fn execute_dml(
    pool: &Pool,
    query: &str,
    params: &[RowValues],
) -> Result<u64, SqlFacadeError> {
    let client = pool.get().await?;
    let stmt = client.prepare_cached(query).await?;
    let converted = Params::convert(params);
    Ok(client.execute(&stmt, converted.as_refs()).await?)
}
