//! Named-parameter SQL over pooled `PostgreSQL` and `SQLite` connections.
//!
//! Queries are written once with `@name` tokens; [`prepare`] rewrites them into the
//! backend's positional placeholders and collects the bound values in order. [`Database`]
//! wraps a connection pool with helpers for the usual query shapes (`query`, `get_one`,
//! `get_value`, `exists`, `execute`, `insert`).

#[cfg(not(any(feature = "postgres", feature = "sqlite")))]
compile_error!("enable at least one backend feature: `postgres` or `sqlite`");

pub mod config;
pub mod db;
pub mod error;
pub mod named_params;
pub mod pool;
pub mod prelude;
pub mod query_utils;
pub mod results;
pub mod types;

#[cfg(feature = "postgres")]
pub mod postgres;
#[cfg(feature = "sqlite")]
pub mod sqlite;

pub use config::{ConnectionInput, DbConfig};
pub use db::Database;
pub use error::SqlFacadeError;
pub use named_params::{NamedParams, PlaceholderStyle, PreparedStatement, prepare, prepare_with_style};
pub use results::{CustomDbRow, ExecuteResult, InsertResult, ResultSet};
pub use types::{DatabaseType, RowValues};
