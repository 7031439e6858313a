//! Rolling dashboard histories
//!
//! Each target (`overall` or an organisation slug) owns one cumulative
//! CSV keyed by date. Appends are read-modify-write over the whole file:
//! fetch from blob storage, merge the new row, dedup by date keeping the
//! newest, sort ascending, re-project the fixed schema, write back.
//! Re-running a date therefore replaces its row instead of duplicating
//! it.

use chrono::NaiveDate;
use tracing::{debug, info};

use edpulse_store::{derive_json, parse_table, push_file, write_table, BlobStore, DataStore, RawTable, StoreError};

use crate::error::{ReportError, Result};

/// A per-target time series with a fixed column schema
#[derive(Debug, Clone)]
pub struct History {
    table: RawTable,
}

impl History {
    /// Build an empty history with the given schema
    pub fn empty(columns: &[&str]) -> Self {
        Self {
            table: RawTable::with_headers(columns.iter().map(|c| c.to_string()).collect()),
        }
    }

    /// Parse a persisted history, re-projecting onto the schema
    ///
    /// Historical files may predate a schema change: unknown columns are
    /// dropped, missing ones blank-filled, order normalised.
    pub fn parse(bytes: &[u8], columns: &[&str]) -> std::result::Result<Self, StoreError> {
        let raw = parse_table(bytes)?;
        let mut history = Self::empty(columns);
        for row in 0..raw.rows.len() {
            let cells = columns
                .iter()
                .map(|column| raw.cell(row, column).unwrap_or("").to_string())
                .collect();
            history.table.rows.push(cells);
        }
        Ok(history)
    }

    /// Number of rows
    pub fn len(&self) -> usize {
        self.table.rows.len()
    }

    /// Whether the history has no rows
    pub fn is_empty(&self) -> bool {
        self.table.rows.is_empty()
    }

    /// Cell value by row index and column name
    pub fn cell(&self, row: usize, column: &str) -> Option<&str> {
        self.table.cell(row, column)
    }

    /// Merge one record, dedup by date (keep newest) and re-sort
    ///
    /// The record must match the schema positionally, with Date first.
    pub fn upsert(&mut self, record: Vec<String>) -> Result<()> {
        if record.len() != self.table.headers.len() {
            return Err(ReportError::RecordShape {
                got: record.len(),
                want: self.table.headers.len(),
            });
        }

        self.table.rows.push(record);

        // keep-last per date: later rows win, so walk in reverse
        let mut seen = std::collections::HashSet::new();
        let mut kept: Vec<Vec<String>> = Vec::with_capacity(self.table.rows.len());
        for row in self.table.rows.iter().rev() {
            let date = row.first().cloned().unwrap_or_default();
            if seen.insert(date) {
                kept.push(row.clone());
            }
        }
        kept.reverse();

        kept.sort_by_key(|row| parse_dashboard_date(row.first().map(String::as_str).unwrap_or("")));
        self.table.rows = kept;
        Ok(())
    }

    /// The underlying table
    pub fn table(&self) -> &RawTable {
        &self.table
    }
}

/// Order key for a `DD-MM-YYYY` date cell
///
/// Rows with unparseable dates sort first, before any real date.
fn parse_dashboard_date(cell: &str) -> NaiveDate {
    NaiveDate::parse_from_str(cell, "%d-%m-%Y").unwrap_or(NaiveDate::MIN)
}

/// Merge one day's record into a target's persisted history
///
/// Fetches the existing CSV from blob storage (absence starts an empty
/// history), merges, writes the CSV and its JSON derivation locally,
/// and pushes both back to blob storage.
pub async fn append_history(
    store: &DataStore,
    blob: &dyn BlobStore,
    target: &str,
    columns: &[&str],
    record: Vec<String>,
) -> Result<()> {
    let wrap = |source: StoreError| -> ReportError {
        if target == "overall" {
            ReportError::Overall { source }
        } else {
            ReportError::PerOrg {
                slug: target.to_string(),
                source,
            }
        }
    };

    let path = store.dashboard_csv(target);
    let key = store.key_for(&path).map_err(wrap)?;

    let mut history = match blob.fetch(&key).await {
        Ok(bytes) => History::parse(&bytes, columns).map_err(wrap)?,
        Err(err) if err.is_not_found() => {
            debug!(target, "no persisted history, starting fresh");
            History::empty(columns)
        }
        Err(err) => return Err(wrap(err)),
    };

    history.upsert(record)?;

    write_table(&path, history.table()).map_err(wrap)?;
    let json_path = derive_json(&path).map_err(wrap)?;
    push_file(blob, store, &path, false).await.map_err(wrap)?;
    push_file(blob, store, &json_path, false).await.map_err(wrap)?;

    info!(target, rows = history.len(), "history appended");
    Ok(())
}

#[cfg(test)]
#[path = "timeseries_test.rs"]
mod timeseries_test;
