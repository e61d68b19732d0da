use crate::error::SqlFacadeError;
use crate::named_params::PlaceholderStyle;

/// Quote a table or column name: wrap it in `"` and double any `"` inside.
///
/// This only keeps the identifier structurally intact; it does not make an untrusted name
/// safe to use.
#[must_use]
pub fn quote_identifier(ident: &str) -> String {
    let mut quoted = String::with_capacity(ident.len() + 2);
    quoted.push('"');
    for ch in ident.chars() {
        if ch == '"' {
            quoted.push('"');
        }
        quoted.push(ch);
    }
    quoted.push('"');
    quoted
}

/// Build `INSERT INTO "t" ("a", "b") VALUES (<p1>, <p2>) RETURNING id`.
///
/// No columns gives `INSERT INTO "t" DEFAULT VALUES RETURNING id`.
///
/// # Errors
/// Returns `SqlFacadeError::ColumnValueMismatch` when the counts differ.
pub fn build_insert_sql(
    table: &str,
    columns: &[&str],
    value_count: usize,
    style: PlaceholderStyle,
) -> Result<String, SqlFacadeError> {
    if columns.len() != value_count {
        return Err(SqlFacadeError::ColumnValueMismatch {
            columns: columns.len(),
            values: value_count,
        });
    }

    if columns.is_empty() {
        return Ok(format!(
            "INSERT INTO {} DEFAULT VALUES RETURNING id",
            quote_identifier(table)
        ));
    }

    let column_list = columns
        .iter()
        .map(|c| quote_identifier(c))
        .collect::<Vec<_>>()
        .join(", ");
    let placeholders = (1..=value_count)
        .map(|i| style.placeholder(i))
        .collect::<Vec<_>>()
        .join(", ");

    Ok(format!(
        "INSERT INTO {} ({column_list}) VALUES ({placeholders}) RETURNING id",
        quote_identifier(table)
    ))
}
