use serde::Serialize;

/// Outcome of a mutation statement (INSERT/UPDATE/DELETE).
///
/// Drivers report a single affected-row count, so `changed_rows` always equals
/// `affected_rows` here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct ExecuteResult {
    pub affected_rows: u64,
    pub changed_rows: u64,
}

impl ExecuteResult {
    #[must_use]
    pub fn from_affected(affected_rows: u64) -> Self {
        Self {
            affected_rows,
            changed_rows: affected_rows,
        }
    }
}

/// Outcome of [`Database::insert`](crate::db::Database::insert).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct InsertResult {
    pub affected_rows: u64,
    pub changed_rows: u64,
    /// The `id` column of the first returned row, when it is an integer.
    pub insert_id: Option<i64>,
}
