// SQLite backend
//
// - config: pool construction from `SqliteOptions`
// - params: `RowValues` -> rusqlite value conversion
// - query: row extraction into `ResultSet`
// - executor: select / DML / batch execution through `interact`

pub mod config;
pub mod executor;
pub mod params;
pub mod query;

pub use executor::{execute_batch, execute_dml, execute_select};
pub use params::Params;
pub use query::build_result_set;
