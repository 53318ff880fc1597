//! Output formatting shared by the tools.

use crate::error::DbResult;
use crate::models::JsonRow;
use serde::Serialize;

/// Pretty-printed JSON, two-space indented.
pub fn to_pretty_json<T: Serialize + ?Sized>(value: &T) -> DbResult<String> {
    Ok(serde_json::to_string_pretty(value)?)
}

/// Pretty-printed JSON array of rows.
pub fn rows_to_json(rows: &[JsonRow]) -> DbResult<String> {
    to_pretty_json(rows)
}

/// Names from the first column of each row, one per line.
pub fn first_column_lines(rows: &[JsonRow]) -> String {
    rows.iter()
        .filter_map(|row| row.values().next())
        .map(|value| match value {
            serde_json::Value::String(s) => s.clone(),
            other => other.to_string(),
        })
        .collect::<Vec<_>>()
        .join("\n")
}
