//! Dial-code scan extraction
//!
//! Classifies each scan event as successful or failed by its result
//! size and buckets counts per channel. Events without a channel land in
//! the empty-string bucket - they still count, as "unmapped" scans in the
//! overall totals.

use std::collections::BTreeMap;

use serde_json::Map;
use tracing::{info, warn};

use edpulse_query::{int_field, str_field, DruidClient, EventTable, QueryTemplate, TemplateParams};
use edpulse_store::{push_file, BlobStore, DataStore};

use crate::error::Result;
use crate::rows::{ScanRow, SCAN_FAILED, SCAN_SUCCESS};

/// Outcome label for one scan event
///
/// A scan succeeded when it returned at least one result; a zero or
/// absent size is a failure.
fn classify(row: &Map<String, serde_json::Value>) -> &'static str {
    match int_field(row, "edata_size") {
        Some(size) if size > 0 => SCAN_SUCCESS,
        _ => SCAN_FAILED,
    }
}

/// Classify scan events and sum counts per (channel, outcome)
pub(crate) fn reshape_scans(table: &EventTable) -> Vec<ScanRow> {
    let mut buckets: BTreeMap<(String, &'static str), i64> = BTreeMap::new();
    for row in table.rows() {
        let channel = str_field(row, "dialcode_channel", "").to_string();
        let flag = classify(row);
        let count = int_field(row, "count").unwrap_or(0);
        *buckets.entry((channel, flag)).or_insert(0) += count;
    }

    buckets
        .into_iter()
        .map(|((channel, flag), count)| ScanRow {
            dialcode_channel: channel,
            failed_flag: flag.to_string(),
            count,
        })
        .collect()
}

/// Extract daily QR scan outcomes per channel
///
/// Writes `dialcode_scans/<partition>/dial_scans.csv` and pushes a
/// backup copy to blob storage.
pub async fn extract_dial_scans(
    client: &DruidClient,
    params: &TemplateParams,
    store: &DataStore,
    blob: &dyn BlobStore,
    partition: &str,
) -> Result<Vec<ScanRow>> {
    let body = QueryTemplate::DialcodeScans.render(params);
    let mut table = client.group_by(&body).await?;

    if table.ensure_column("dialcode_channel") {
        warn!("dialcode_channel absent from scan results, synthesised as empty");
    }

    let rows = reshape_scans(&table);

    let path = store.dial_scans_csv(partition);
    edpulse_store::write_rows(&path, &rows)?;
    push_file(blob, store, &path, true).await?;

    info!(partition, buckets = rows.len(), "dial scans written");
    Ok(rows)
}

#[cfg(test)]
#[path = "scans_test.rs"]
mod scans_test;
