use thiserror::Error;

#[cfg(feature = "sqlite")]
use deadpool_sqlite::rusqlite;

#[derive(Debug, Error)]
pub enum SqlFacadeError {
    #[cfg(feature = "postgres")]
    #[error(transparent)]
    PostgresError(#[from] tokio_postgres::Error),

    #[cfg(feature = "postgres")]
    #[error(transparent)]
    PoolErrorPostgres(#[from] deadpool_postgres::PoolError),

    #[cfg(feature = "sqlite")]
    #[error(transparent)]
    SqliteError(#[from] rusqlite::Error),

    #[cfg(feature = "sqlite")]
    #[error(transparent)]
    PoolErrorSqlite(#[from] deadpool_sqlite::PoolError),

    /// A `@token` in the SQL template has no matching named parameter.
    #[error("Missing named parameter: {token}")]
    MissingParameter { token: String },

    /// `insert` was called with a different number of columns and values.
    #[error("Column/value count mismatch: {columns} columns, {values} values")]
    ColumnValueMismatch { columns: usize, values: usize },

    #[error("Connection pool is already open")]
    PoolAlreadyOpen,

    #[error("Connection pool is not open")]
    PoolNotOpen,

    #[error("Connection string parse error: {0}")]
    ConnectionStringParse(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Connection error: {0}")]
    ConnectionError(String),

    #[error("SQL execution error: {0}")]
    ExecutionError(String),

    #[error("Row decode error: {0}")]
    RowDecode(#[from] serde_json::Error),
}

#[cfg(feature = "sqlite")]
impl From<deadpool_sqlite::InteractError> for SqlFacadeError {
    fn from(err: deadpool_sqlite::InteractError) -> Self {
        SqlFacadeError::ConnectionError(format!("SQLite interact error: {err}"))
    }
}
