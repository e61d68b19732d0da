use std::collections::HashMap;
use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde_json::{Map, Value as JsonValue};

use crate::error::SqlFacadeError;
use crate::types::RowValues;

/// A row from a database query result
///
/// This struct represents a single row from a database query result,
/// with access to both the column names and the values.
#[derive(Debug, Clone)]
pub struct CustomDbRow {
    /// The column names for this row (shared across all rows in a result set)
    pub column_names: Arc<Vec<String>>,
    /// The values for this row
    pub rows: Vec<RowValues>,
    // Shared name -> index map so lookups skip string scans
    pub(crate) column_index_cache: Arc<HashMap<String, usize>>,
}

impl CustomDbRow {
    /// Create a new database row
    ///
    /// # Arguments
    ///
    /// * `column_names` - The column names
    /// * `rows` - The values for this row
    #[must_use]
    pub fn new(column_names: Arc<Vec<String>>, rows: Vec<RowValues>) -> Self {
        let cache = Arc::new(index_columns(&column_names));
        Self {
            column_names,
            rows,
            column_index_cache: cache,
        }
    }

    /// Get the index of a column by name
    #[must_use]
    pub fn get_column_index(&self, column_name: &str) -> Option<usize> {
        self.column_index_cache.get(column_name).copied()
    }

    /// Get a value from the row by column name
    ///
    /// # Returns
    ///
    /// The value at the column, or None if the column wasn't found
    #[must_use]
    pub fn get(&self, column_name: &str) -> Option<&RowValues> {
        self.get_column_index(column_name)
            .and_then(|idx| self.rows.get(idx))
    }

    /// Get a value from the row by column index
    #[must_use]
    pub fn get_by_index(&self, index: usize) -> Option<&RowValues> {
        self.rows.get(index)
    }

    /// The row as a JSON object keyed by column name.
    ///
    /// When a column name repeats (e.g. `select a.id, b.id`), the first one wins, as in
    /// [`get`](Self::get).
    #[must_use]
    pub fn to_json(&self) -> JsonValue {
        let mut map = Map::with_capacity(self.column_index_cache.len());
        for (name, idx) in self.column_index_cache.iter() {
            if let Some(value) = self.rows.get(*idx) {
                map.insert(name.clone(), value.to_json());
            }
        }
        JsonValue::Object(map)
    }

    /// Deserialize the row into any serde type whose fields match the column names.
    ///
    /// # Errors
    /// Returns `SqlFacadeError::RowDecode` if the row does not fit `T`.
    pub fn deserialize<T: DeserializeOwned>(&self) -> Result<T, SqlFacadeError> {
        Ok(serde_json::from_value(self.to_json())?)
    }
}

/// Build the name -> index map. For repeated names the first column wins, matching a linear
/// scan.
pub(crate) fn index_columns(column_names: &[String]) -> HashMap<String, usize> {
    let mut map = HashMap::with_capacity(column_names.len());
    for (i, name) in column_names.iter().enumerate() {
        map.entry(name.clone()).or_insert(i);
    }
    map
}
