//! Convenient imports for common functionality.
//!
//! `use sql_facade::prelude::*;` brings in the facade, the preparer, and the value types.

pub use crate::config::{ConnectionInput, DbConfig};
#[cfg(feature = "postgres")]
pub use crate::config::{PgConfig, PostgresOptions};
#[cfg(feature = "sqlite")]
pub use crate::config::SqliteOptions;
pub use crate::db::Database;
pub use crate::error::SqlFacadeError;
pub use crate::named_params;
pub use crate::named_params::{
    NamedParams, PlaceholderStyle, PreparedStatement, prepare, prepare_with_style,
};
pub use crate::query_utils::quote_identifier;
pub use crate::results::{CustomDbRow, ExecuteResult, InsertResult, ResultSet};
pub use crate::types::{DatabaseType, RowValues};
