//! Conversions between rusqlite and LunarisDB types

use lunaris_core::{LunarisError, Result, Value};
use rusqlite::types::ValueRef;

/// Convert the value at `idx` of a rusqlite row
pub(crate) fn row_value(row: &rusqlite::Row, idx: usize) -> Result<Value> {
    let value_ref = row.get_ref(idx).map_err(query_error)?;

    let value = match value_ref {
        ValueRef::Null => Value::Null,
        ValueRef::Integer(i) => Value::Int64(i),
        ValueRef::Real(f) => Value::Float64(f),
        ValueRef::Text(s) => Value::String(String::from_utf8_lossy(s).into_owned()),
        ValueRef::Blob(b) => Value::Bytes(b.to_vec()),
    };

    Ok(value)
}

/// Wrap an engine error, keeping its message
pub(crate) fn query_error(e: rusqlite::Error) -> LunarisError {
    LunarisError::Query(e.to_string())
}
