use std::sync::Arc;

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use serde_json::Value;
use tokio_postgres::types::{FromSql, Type};
use tokio_postgres::{Row, Statement};

use crate::error::SqlFacadeError;
use crate::results::ResultSet;
use crate::types::RowValues;

/// Extracts a `RowValues` from a `tokio_postgres` Row at the given index.
///
/// # Errors
/// Returns `SqlFacadeError` if the column cannot be retrieved or has a type without a
/// `RowValues` mapping.
pub fn postgres_extract_value(row: &Row, idx: usize) -> Result<RowValues, SqlFacadeError> {
    let type_info = row.columns()[idx].type_();

    match *type_info {
        Type::INT2 => {
            let val: Option<i16> = row.try_get(idx)?;
            Ok(val.map_or(RowValues::Null, |v| RowValues::Int(i64::from(v))))
        }
        Type::INT4 => {
            let val: Option<i32> = row.try_get(idx)?;
            Ok(val.map_or(RowValues::Null, |v| RowValues::Int(i64::from(v))))
        }
        Type::INT8 => {
            let val: Option<i64> = row.try_get(idx)?;
            Ok(val.map_or(RowValues::Null, RowValues::Int))
        }
        Type::OID => {
            let val: Option<u32> = row.try_get(idx)?;
            Ok(val.map_or(RowValues::Null, |v| RowValues::Int(i64::from(v))))
        }
        Type::FLOAT4 => {
            let val: Option<f32> = row.try_get(idx)?;
            Ok(val.map_or(RowValues::Null, |v| RowValues::Float(f64::from(v))))
        }
        Type::FLOAT8 => {
            let val: Option<f64> = row.try_get(idx)?;
            Ok(val.map_or(RowValues::Null, RowValues::Float))
        }
        Type::BOOL => {
            let val: Option<bool> = row.try_get(idx)?;
            Ok(val.map_or(RowValues::Null, RowValues::Bool))
        }
        Type::TIMESTAMP => {
            let val: Option<NaiveDateTime> = row.try_get(idx)?;
            Ok(val.map_or(RowValues::Null, RowValues::Timestamp))
        }
        Type::TIMESTAMPTZ => {
            let val: Option<DateTime<Utc>> = row.try_get(idx)?;
            Ok(val.map_or(RowValues::Null, |v| RowValues::Timestamp(v.naive_utc())))
        }
        Type::DATE => {
            let val: Option<NaiveDate> = row.try_get(idx)?;
            Ok(val.map_or(RowValues::Null, |d| {
                RowValues::Timestamp(d.and_time(NaiveTime::MIN))
            }))
        }
        Type::JSON | Type::JSONB => {
            let val: Option<Value> = row.try_get(idx)?;
            Ok(val.map_or(RowValues::Null, RowValues::JSON))
        }
        Type::BYTEA => {
            let val: Option<Vec<u8>> = row.try_get(idx)?;
            Ok(val.map_or(RowValues::Null, RowValues::Blob))
        }
        _ if <String as FromSql>::accepts(type_info) => {
            let val: Option<String> = row.try_get(idx)?;
            Ok(val.map_or(RowValues::Null, RowValues::Text))
        }
        _ => Err(SqlFacadeError::ExecutionError(format!(
            "unsupported postgres column type '{}' for column '{}'",
            type_info.name(),
            row.columns()[idx].name()
        ))),
    }
}

/// Build a result set using statement metadata for column names.
///
/// Column names come from the statement, so an empty result still knows its columns.
///
/// # Errors
/// Returns errors from row value extraction.
pub fn build_result_set_from_statement(
    stmt: &Statement,
    rows: &[Row],
) -> Result<ResultSet, SqlFacadeError> {
    let column_names: Vec<String> = stmt
        .columns()
        .iter()
        .map(|col| col.name().to_string())
        .collect();
    let column_count = column_names.len();

    let mut result_set = ResultSet::with_capacity(rows.len());
    result_set.set_column_names(Arc::new(column_names));

    for row in rows {
        let mut row_values = Vec::with_capacity(column_count);
        for idx in 0..column_count {
            row_values.push(postgres_extract_value(row, idx)?);
        }
        result_set.add_row_values(row_values);
    }

    Ok(result_set)
}
