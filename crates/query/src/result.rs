//! Flattened query results
//!
//! Druid responses arrive as nested `{ "event": {...} }` records; an
//! `EventTable` is the flat, ordered form the extractors reshape from.

use serde_json::{Map, Value};

/// A flat table of event records
///
/// Rows preserve response order. Column presence is per-row - upstream
/// schemas are not guaranteed stable, so absent columns can be
/// synthesised rather than treated as an error.
#[derive(Debug, Clone, Default)]
pub struct EventTable {
    rows: Vec<Map<String, Value>>,
}

impl EventTable {
    /// Create an empty table
    pub fn new() -> Self {
        Self::default()
    }

    /// Wrap already-flattened rows
    pub fn from_rows(rows: Vec<Map<String, Value>>) -> Self {
        Self { rows }
    }

    /// Append a row
    pub fn push(&mut self, row: Map<String, Value>) {
        self.rows.push(row);
    }

    /// Number of rows
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the table has no rows
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Borrow the rows
    pub fn rows(&self) -> &[Map<String, Value>] {
        &self.rows
    }

    /// Whether any row carries the named column
    pub fn has_column(&self, name: &str) -> bool {
        self.rows.iter().any(|row| row.contains_key(name))
    }

    /// Count of rows with a non-null value in the named column
    pub fn non_null_count(&self, name: &str) -> usize {
        self.rows
            .iter()
            .filter(|row| matches!(row.get(name), Some(v) if !v.is_null()))
            .count()
    }

    /// Ensure every row carries the named column, filling nulls
    ///
    /// Returns true when the column had to be synthesised in at least one
    /// row (schema drift).
    pub fn ensure_column(&mut self, name: &str) -> bool {
        let mut synthesised = false;
        for row in &mut self.rows {
            if !row.contains_key(name) {
                row.insert(name.to_string(), Value::Null);
                synthesised = true;
            }
        }
        synthesised
    }
}

/// String value of a field, with nulls and absences as the default
pub fn str_field<'a>(row: &'a Map<String, Value>, name: &str, default: &'a str) -> &'a str {
    match row.get(name) {
        Some(Value::String(s)) => s.as_str(),
        _ => default,
    }
}

/// Integer value of a field; numeric strings are accepted
///
/// Druid serialises some numeric dimensions as strings, so both forms
/// must parse.
pub fn int_field(row: &Map<String, Value>, name: &str) -> Option<i64> {
    match row.get(name) {
        Some(Value::Number(n)) => n.as_i64().or_else(|| n.as_f64().map(|f| f as i64)),
        Some(Value::String(s)) => s.parse::<i64>().ok(),
        _ => None,
    }
}

/// Float value of a field; numeric strings are accepted
pub fn float_field(row: &Map<String, Value>, name: &str) -> Option<f64> {
    match row.get(name) {
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => s.parse::<f64>().ok(),
        _ => None,
    }
}

#[cfg(test)]
#[path = "result_test.rs"]
mod result_test;
