//! CSV tables and their JSON derivations
//!
//! Typed rows go through serde; histories whose historical schema may
//! predate the current one go through the header-indexed [`RawTable`]
//! form instead.

use std::path::Path;

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map, Number, Value};

use crate::error::{Result, StoreError};
use crate::layout::ensure_parent;

/// Write typed rows as a CSV with a serde-derived header
pub fn write_rows<T: Serialize>(path: &Path, rows: &[T]) -> Result<()> {
    ensure_parent(path)?;
    let mut writer = csv::Writer::from_path(path)
        .map_err(|e| StoreError::csv(path.display().to_string(), e))?;
    for row in rows {
        writer
            .serialize(row)
            .map_err(|e| StoreError::csv(path.display().to_string(), e))?;
    }
    writer
        .flush()
        .map_err(|e| StoreError::io(path.display().to_string(), e))?;
    Ok(())
}

/// Read typed rows from a CSV, mapping columns by header
pub fn read_rows<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>> {
    let mut reader = csv::Reader::from_path(path)
        .map_err(|e| StoreError::csv(path.display().to_string(), e))?;
    let mut rows = Vec::new();
    for record in reader.deserialize() {
        rows.push(record.map_err(|e| StoreError::csv(path.display().to_string(), e))?);
    }
    Ok(rows)
}

/// An untyped table: header row plus string cells
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawTable {
    /// Column names, in file order
    pub headers: Vec<String>,
    /// Row cells, matching `headers` positionally
    pub rows: Vec<Vec<String>>,
}

impl RawTable {
    /// Create a table with the given headers and no rows
    pub fn with_headers(headers: Vec<String>) -> Self {
        Self {
            headers,
            rows: Vec::new(),
        }
    }

    /// Position of a named column
    pub fn column(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }

    /// Cell value by row index and column name
    pub fn cell(&self, row: usize, name: &str) -> Option<&str> {
        let col = self.column(name)?;
        self.rows.get(row)?.get(col).map(String::as_str)
    }
}

/// Read a CSV without a schema
pub fn read_table(path: &Path) -> Result<RawTable> {
    let mut reader = csv::Reader::from_path(path)
        .map_err(|e| StoreError::csv(path.display().to_string(), e))?;
    let headers = reader
        .headers()
        .map_err(|e| StoreError::csv(path.display().to_string(), e))?
        .iter()
        .map(str::to_string)
        .collect();
    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record.map_err(|e| StoreError::csv(path.display().to_string(), e))?;
        rows.push(record.iter().map(str::to_string).collect());
    }
    Ok(RawTable { headers, rows })
}

/// Parse raw bytes as a headered CSV
pub fn parse_table(bytes: &[u8]) -> Result<RawTable> {
    let mut reader = csv::Reader::from_reader(bytes);
    let headers = reader
        .headers()
        .map_err(|e| StoreError::Csv {
            path: "<bytes>".into(),
            message: e.to_string(),
        })?
        .iter()
        .map(str::to_string)
        .collect();
    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record.map_err(|e| StoreError::Csv {
            path: "<bytes>".into(),
            message: e.to_string(),
        })?;
        rows.push(record.iter().map(str::to_string).collect());
    }
    Ok(RawTable { headers, rows })
}

/// Write an untyped table
pub fn write_table(path: &Path, table: &RawTable) -> Result<()> {
    ensure_parent(path)?;
    let mut writer = csv::Writer::from_path(path)
        .map_err(|e| StoreError::csv(path.display().to_string(), e))?;
    writer
        .write_record(&table.headers)
        .map_err(|e| StoreError::csv(path.display().to_string(), e))?;
    for row in &table.rows {
        writer
            .write_record(row)
            .map_err(|e| StoreError::csv(path.display().to_string(), e))?;
    }
    writer
        .flush()
        .map_err(|e| StoreError::io(path.display().to_string(), e))?;
    Ok(())
}

/// Write the JSON derivation of a CSV next to it
///
/// Produces `<name>.json` as an array of objects, one per row, with
/// column order preserved. Cells that parse as numbers are emitted as
/// numbers, everything else as strings - dashboards consume both forms.
pub fn derive_json(csv_path: &Path) -> Result<std::path::PathBuf> {
    let table = read_table(csv_path)?;
    let json_path = csv_path.with_extension("json");

    let records: Vec<Value> = table
        .rows
        .iter()
        .map(|row| {
            let mut object = Map::new();
            for (header, cell) in table.headers.iter().zip(row) {
                object.insert(header.clone(), cell_value(cell));
            }
            Value::Object(object)
        })
        .collect();

    let body = serde_json::to_vec_pretty(&Value::Array(records))?;
    std::fs::write(&json_path, body)
        .map_err(|e| StoreError::io(json_path.display().to_string(), e))?;
    Ok(json_path)
}

/// Best-effort numeric interpretation of a CSV cell
fn cell_value(cell: &str) -> Value {
    if cell.is_empty() {
        return Value::String(String::new());
    }
    if let Ok(n) = cell.parse::<i64>() {
        return Value::Number(n.into());
    }
    if let Ok(f) = cell.parse::<f64>() {
        if let Some(n) = Number::from_f64(f) {
            return Value::Number(n);
        }
    }
    Value::String(cell.to_string())
}

#[cfg(test)]
#[path = "table_test.rs"]
mod table_test;
