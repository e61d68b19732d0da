// PostgreSQL backend
//
// - config: pool construction from `PostgresOptions`
// - params: `RowValues` -> `tokio_postgres` parameter binding
// - query: row extraction into `ResultSet`
// - executor: select / DML / batch execution against a pool

pub mod config;
pub mod executor;
pub mod params;
pub mod query;

pub use executor::{execute_batch, execute_dml, execute_select};
pub use params::Params;
pub use query::build_result_set_from_statement;
