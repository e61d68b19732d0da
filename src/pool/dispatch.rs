use super::types::BackendPool;
use crate::error::SqlFacadeError;
use crate::results::ResultSet;
use crate::types::RowValues;

#[cfg(feature = "postgres")]
use crate::postgres;
#[cfg(feature = "sqlite")]
use crate::sqlite;

impl BackendPool {
    /// Executes a batch of SQL statements within a transaction by delegating to the backend
    /// module.
    ///
    /// # Errors
    /// Returns an error if a connection cannot be checked out or the database rejects the
    /// batch.
    pub async fn execute_batch(&self, query: &str) -> Result<(), SqlFacadeError> {
        tracing::trace!(db = ?self.database_type(), sql = query, "execute_batch");
        match self {
            #[cfg(feature = "postgres")]
            BackendPool::Postgres(pool) => postgres::execute_batch(pool, query).await,
            #[cfg(feature = "sqlite")]
            BackendPool::Sqlite(pool) => sqlite::execute_batch(pool, query).await,
        }
    }

    /// Runs a row-returning statement with positional parameters.
    ///
    /// # Errors
    /// Returns an error if a connection cannot be checked out or the query fails.
    pub async fn execute_select(
        &self,
        query: &str,
        params: &[RowValues],
    ) -> Result<ResultSet, SqlFacadeError> {
        tracing::trace!(
            db = ?self.database_type(),
            sql = query,
            params = params.len(),
            "execute_select"
        );
        match self {
            #[cfg(feature = "postgres")]
            BackendPool::Postgres(pool) => postgres::execute_select(pool, query, params).await,
            #[cfg(feature = "sqlite")]
            BackendPool::Sqlite(pool) => sqlite::execute_select(pool, query, params).await,
        }
    }

    /// Runs a statement for its affected-row count.
    ///
    /// # Errors
    /// Returns an error if a connection cannot be checked out or the statement fails.
    pub async fn execute_dml(
        &self,
        query: &str,
        params: &[RowValues],
    ) -> Result<u64, SqlFacadeError> {
        tracing::trace!(
            db = ?self.database_type(),
            sql = query,
            params = params.len(),
            "execute_dml"
        );
        match self {
            #[cfg(feature = "postgres")]
            BackendPool::Postgres(pool) => postgres::execute_dml(pool, query, params).await,
            #[cfg(feature = "sqlite")]
            BackendPool::Sqlite(pool) => sqlite::execute_dml(pool, query, params).await,
        }
    }
}
