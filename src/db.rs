//! The pooled database facade.
//!
//! [`Database`] owns one connection pool and exposes helpers for the common query shapes.
//! SQL is written with `@name` parameters and rewritten for the backend before execution:
//! ```rust,no_run
//! use sql_facade::prelude::*;
//!
//! # async fn demo() -> Result<(), SqlFacadeError> {
//! let db = Database::new("sqlite://app.db").await?;
//! db.execute_batch("CREATE TABLE IF NOT EXISTS users (id INTEGER PRIMARY KEY, name TEXT);")
//!     .await?;
//! let inserted = db.insert("users", &["name"], &[RowValues::from("alice")]).await?;
//! let params = NamedParams::new().with("id", inserted.insert_id);
//! let name = db
//!     .get_value("name", "select name from users where id = @id", Some(&params))
//!     .await?;
//! assert_eq!(name, Some(RowValues::Text("alice".into())));
//! db.close().await;
//! # Ok(())
//! # }
//! ```

use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use serde::de::DeserializeOwned;

use crate::config::{ConnectionInput, DbConfig};
use crate::error::SqlFacadeError;
use crate::named_params::{NamedParams, PlaceholderStyle, PreparedStatement, prepare_with_style};
use crate::pool::BackendPool;
use crate::query_utils::build_insert_sql;
use crate::results::{CustomDbRow, ExecuteResult, InsertResult};
use crate::types::{DatabaseType, RowValues};

/// Pooled database handle with named-parameter query helpers.
///
/// All query methods take `&self`; share a `Database` across tasks with an `Arc`. Each call
/// checks a connection out of the pool for the duration of one statement.
pub struct Database {
    config: DbConfig,
    placeholder_style: PlaceholderStyle,
    pool: RwLock<Option<BackendPool>>,
}

impl std::fmt::Debug for Database {
    // The config may hold credentials, so only the backend and pool state are shown.
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Database")
            .field("database_type", &self.database_type())
            .field("pool", &*self.read_slot())
            .finish_non_exhaustive()
    }
}

impl Database {
    /// Build a facade and open its pool immediately.
    ///
    /// `input` is a connection string (`postgres://...`, `sqlite://...`) or a structured
    /// [`DbConfig`] / backend options value.
    ///
    /// # Errors
    /// Returns `SqlFacadeError::ConnectionStringParse` for an unrecognized connection string,
    /// `SqlFacadeError::ConfigError` for missing fields, or the pool creation error.
    pub async fn new(input: impl Into<ConnectionInput>) -> Result<Self, SqlFacadeError> {
        let config = input.into().into_config()?;
        let placeholder_style = config.database_type().placeholder_style();
        let pool = open_pool(&config).await?;
        Ok(Self {
            config,
            placeholder_style,
            pool: RwLock::new(Some(pool)),
        })
    }

    #[must_use]
    pub fn database_type(&self) -> DatabaseType {
        self.config.database_type()
    }

    /// Placeholder style `@name` tokens are rewritten into for this backend.
    #[must_use]
    pub fn placeholder_style(&self) -> PlaceholderStyle {
        self.placeholder_style
    }

    /// Whether a pool is currently open.
    #[must_use]
    pub fn has_open_pool(&self) -> bool {
        self.read_slot().is_some()
    }

    /// Open a new pool after [`close`](Self::close).
    ///
    /// # Errors
    /// Returns `SqlFacadeError::PoolAlreadyOpen` if a pool is open; the existing pool is left
    /// untouched. Otherwise returns any pool creation error.
    pub async fn connect(&self) -> Result<(), SqlFacadeError> {
        if self.has_open_pool() {
            return Err(SqlFacadeError::PoolAlreadyOpen);
        }

        let pool = open_pool(&self.config).await?;
        // Another caller may have connected while this pool was being built.
        let rejected = {
            let mut slot = self.write_slot();
            if slot.is_some() {
                Some(pool)
            } else {
                *slot = Some(pool);
                None
            }
        };
        if let Some(pool) = rejected {
            pool.close().await;
            return Err(SqlFacadeError::PoolAlreadyOpen);
        }
        Ok(())
    }

    /// Close the pool and wait for every connection to be released.
    ///
    /// Calling this without an open pool does nothing.
    pub async fn close(&self) {
        let pool = self.write_slot().take();
        if let Some(pool) = pool {
            pool.close().await;
            tracing::debug!(db = ?pool.database_type(), "closed connection pool");
        }
    }

    /// Run a query and return every row; an empty vector when nothing matches.
    ///
    /// # Errors
    /// Returns `SqlFacadeError::MissingParameter` before touching the database if a token has
    /// no value, `SqlFacadeError::PoolNotOpen` after `close`, or the driver error.
    pub async fn query(
        &self,
        sql: &str,
        params: Option<&NamedParams>,
    ) -> Result<Vec<CustomDbRow>, SqlFacadeError> {
        let prepared = self.prepare(sql, params)?;
        let pool = self.pool()?;
        let result_set = pool
            .execute_select(&prepared.sql, &prepared.values)
            .await?;
        Ok(result_set.into_rows())
    }

    /// Like [`query`](Self::query), deserializing each row into `T` by column name.
    ///
    /// # Errors
    /// As for `query`, plus `SqlFacadeError::RowDecode` if a row does not fit `T`.
    pub async fn query_as<T: DeserializeOwned>(
        &self,
        sql: &str,
        params: Option<&NamedParams>,
    ) -> Result<Vec<T>, SqlFacadeError> {
        self.query(sql, params)
            .await?
            .iter()
            .map(CustomDbRow::deserialize)
            .collect()
    }

    /// First row of the result, if any.
    ///
    /// No `LIMIT` is added; bound the query yourself when the result may be large.
    ///
    /// # Errors
    /// Same as [`query`](Self::query).
    pub async fn get_one(
        &self,
        sql: &str,
        params: Option<&NamedParams>,
    ) -> Result<Option<CustomDbRow>, SqlFacadeError> {
        Ok(self.query(sql, params).await?.into_iter().next())
    }

    /// Like [`get_one`](Self::get_one), deserializing the row into `T`.
    ///
    /// # Errors
    /// As for `get_one`, plus `SqlFacadeError::RowDecode`.
    pub async fn get_one_as<T: DeserializeOwned>(
        &self,
        sql: &str,
        params: Option<&NamedParams>,
    ) -> Result<Option<T>, SqlFacadeError> {
        self.get_one(sql, params)
            .await?
            .map(|row| row.deserialize())
            .transpose()
    }

    /// One column of the first row.
    ///
    /// `None` means no row matched (or the row has no such column); a matched row whose
    /// field is NULL gives `Some(RowValues::Null)`.
    ///
    /// # Errors
    /// Same as [`query`](Self::query).
    pub async fn get_value(
        &self,
        column: &str,
        sql: &str,
        params: Option<&NamedParams>,
    ) -> Result<Option<RowValues>, SqlFacadeError> {
        Ok(self
            .get_one(sql, params)
            .await?
            .and_then(|row| row.get(column).cloned()))
    }

    /// Whether the query returns at least one row.
    ///
    /// # Errors
    /// Same as [`query`](Self::query).
    pub async fn exists(
        &self,
        sql: &str,
        params: Option<&NamedParams>,
    ) -> Result<bool, SqlFacadeError> {
        Ok(!self.query(sql, params).await?.is_empty())
    }

    /// Run a statement for its side effects.
    ///
    /// Both counts carry the driver's affected-row count.
    ///
    /// # Errors
    /// Same as [`query`](Self::query).
    pub async fn execute(
        &self,
        sql: &str,
        params: Option<&NamedParams>,
    ) -> Result<ExecuteResult, SqlFacadeError> {
        let prepared = self.prepare(sql, params)?;
        let pool = self.pool()?;
        let affected = pool.execute_dml(&prepared.sql, &prepared.values).await?;
        Ok(ExecuteResult::from_affected(affected))
    }

    /// Run a parameterless multi-statement script (DDL, fixtures) in one transaction.
    ///
    /// # Errors
    /// Returns `SqlFacadeError::PoolNotOpen` after `close`, or the driver error.
    pub async fn execute_batch(&self, sql: &str) -> Result<(), SqlFacadeError> {
        self.pool()?.execute_batch(sql).await
    }

    /// Insert one row and report the generated `id`.
    ///
    /// Runs `INSERT INTO "table" ("c1", ...) VALUES (...) RETURNING id`. `insert_id` is `None`
    /// when no row comes back or its `id` is not an integer.
    ///
    /// # Errors
    /// Returns `SqlFacadeError::ColumnValueMismatch` without querying when the slices differ
    /// in length, `SqlFacadeError::PoolNotOpen` after `close`, or the driver error.
    pub async fn insert(
        &self,
        table: &str,
        columns: &[&str],
        values: &[RowValues],
    ) -> Result<InsertResult, SqlFacadeError> {
        let sql = build_insert_sql(table, columns, values.len(), self.placeholder_style)?;
        let pool = self.pool()?;
        let result_set = pool.execute_select(&sql, values).await?;
        let insert_id = result_set
            .results
            .first()
            .and_then(|row| row.get("id"))
            .and_then(RowValues::as_int)
            .copied();
        Ok(InsertResult {
            affected_rows: result_set.results.len() as u64,
            changed_rows: 0,
            insert_id,
        })
    }

    fn prepare<'a>(
        &self,
        sql: &'a str,
        params: Option<&NamedParams>,
    ) -> Result<PreparedStatement<'a>, SqlFacadeError> {
        prepare_with_style(sql, params, self.placeholder_style)
    }

    fn pool(&self) -> Result<BackendPool, SqlFacadeError> {
        self.read_slot().clone().ok_or(SqlFacadeError::PoolNotOpen)
    }

    fn read_slot(&self) -> RwLockReadGuard<'_, Option<BackendPool>> {
        self.pool.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write_slot(&self) -> RwLockWriteGuard<'_, Option<BackendPool>> {
        self.pool.write().unwrap_or_else(PoisonError::into_inner)
    }
}

async fn open_pool(config: &DbConfig) -> Result<BackendPool, SqlFacadeError> {
    let pool = BackendPool::open(config).await?;
    tracing::debug!(
        db = ?pool.database_type(),
        max_connections = pool.max_size(),
        "opened connection pool"
    );
    Ok(pool)
}
