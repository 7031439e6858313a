//! Content download extraction
//!
//! Download events are keyed by content identifier; attribution to a
//! channel goes through the content snapshot, restricted to `Resource`
//! content. Events whose content cannot be attributed are dropped -
//! an unattributed download is a legitimate outcome, not an error.

use std::collections::BTreeMap;

use tracing::info;

use edpulse_query::{int_field, str_field, DruidClient, EventTable, QueryTemplate, TemplateParams};
use edpulse_store::{push_file, BlobStore, DataStore};

use crate::error::Result;
use crate::rows::DownloadRow;
use crate::snapshot::ContentSnapshot;

/// Attribute download events to channels and sum per channel
///
/// Returns the per-channel rows and the number of events dropped as
/// unattributed.
pub(crate) fn reshape_downloads(
    table: &EventTable,
    snapshot: &ContentSnapshot,
) -> (Vec<DownloadRow>, usize) {
    let mut counts: BTreeMap<String, i64> = BTreeMap::new();
    let mut unattributed = 0usize;
    for row in table.rows() {
        let object_id = str_field(row, "object_id", "");
        let Some(channel) = snapshot.resource_channel(object_id) else {
            unattributed += 1;
            continue;
        };
        let count = int_field(row, "count").unwrap_or(0);
        *counts.entry(channel.to_string()).or_insert(0) += count;
    }

    let rows = counts
        .into_iter()
        .map(|(channel, count)| DownloadRow { channel, count })
        .collect();
    (rows, unattributed)
}

/// Extract daily content downloads per channel
///
/// Writes `downloads/<partition>/downloads.csv` and pushes a backup
/// copy to blob storage.
pub async fn extract_downloads(
    client: &DruidClient,
    params: &TemplateParams,
    snapshot: &ContentSnapshot,
    store: &DataStore,
    blob: &dyn BlobStore,
    partition: &str,
) -> Result<Vec<DownloadRow>> {
    let body = QueryTemplate::ContentDownloads.render(params);
    let table = client.group_by(&body).await?;
    let (rows, unattributed) = reshape_downloads(&table, snapshot);

    let path = store.downloads_csv(partition);
    edpulse_store::write_rows(&path, &rows)?;
    push_file(blob, store, &path, true).await?;

    info!(
        partition,
        channels = rows.len(),
        unattributed,
        "downloads written"
    );
    Ok(rows)
}

#[cfg(test)]
#[path = "downloads_test.rs"]
mod downloads_test;
