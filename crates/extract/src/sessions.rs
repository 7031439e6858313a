//! App session and content play extraction
//!
//! Two queries feed the `play/` partition: the one-row app session
//! summary, and per-(platform, content, device) play sessions that are
//! attributed through the content snapshot and rolled up per
//! (channel, platform) with a distinct-device count.

use std::collections::{BTreeMap, HashSet};

use tracing::{info, warn};

use edpulse_query::{
    float_field, int_field, str_field, DruidClient, EventTable, QueryTemplate, TemplateParams,
};
use edpulse_store::{push_file, BlobStore, DataStore};

use crate::error::Result;
use crate::rows::{AppSessionRow, PlayRow};
use crate::snapshot::ContentSnapshot;

const SECONDS_PER_HOUR: f64 = 3600.0;

/// Reduce the session summary response to its single row
///
/// An empty response (no app activity at all that day) yields the zero
/// row rather than an error.
pub(crate) fn reshape_app_sessions(table: &EventTable) -> AppSessionRow {
    match table.rows().first() {
        Some(row) => AppSessionRow {
            sessions: int_field(row, "Total App Sessions").unwrap_or(0),
            devices: int_field(row, "Total Devices on App").unwrap_or(0),
            time_hours: float_field(row, "Total Time on App").unwrap_or(0.0) / SECONDS_PER_HOUR,
        },
        None => AppSessionRow {
            sessions: 0,
            devices: 0,
            time_hours: 0.0,
        },
    }
}

/// Attribute play sessions to channels and roll up per (channel, platform)
///
/// Devices are counted distinct within each bucket; play time converts
/// to hours. Plays on unattributable content are dropped.
pub(crate) fn reshape_plays(table: &EventTable, snapshot: &ContentSnapshot) -> Vec<PlayRow> {
    struct Bucket {
        devices: HashSet<String>,
        plays: i64,
        play_time_secs: f64,
    }

    let mut buckets: BTreeMap<(String, String), Bucket> = BTreeMap::new();
    for row in table.rows() {
        let content_id = str_field(row, "object_rollup_l1", "");
        let Some(channel) = snapshot.channel(content_id) else {
            continue;
        };
        let pdata = str_field(row, "dimensions_pdata_id", "").to_string();
        let bucket = buckets
            .entry((channel.to_string(), pdata))
            .or_insert_with(|| Bucket {
                devices: HashSet::new(),
                plays: 0,
                play_time_secs: 0.0,
            });

        let device = str_field(row, "dimensions_did", "");
        if !device.is_empty() {
            bucket.devices.insert(device.to_string());
        }
        bucket.plays += int_field(row, "Total Content Plays").unwrap_or(0);
        bucket.play_time_secs += float_field(row, "Content Play Time").unwrap_or(0.0);
    }

    buckets
        .into_iter()
        .map(|((channel, pdata_id), bucket)| PlayRow {
            channel,
            pdata_id,
            devices: bucket.devices.len() as i64,
            plays: bucket.plays,
            play_time_hours: bucket.play_time_secs / SECONDS_PER_HOUR,
        })
        .collect()
}

/// Extract the daily app session summary
///
/// Writes `play/<partition>/app_sessions.csv` and pushes a backup copy
/// to blob storage.
pub async fn extract_app_sessions(
    client: &DruidClient,
    params: &TemplateParams,
    store: &DataStore,
    blob: &dyn BlobStore,
    partition: &str,
) -> Result<AppSessionRow> {
    let body = QueryTemplate::AppSessionsDevices.render(params);
    let table = client.group_by(&body).await?;
    if table.is_empty() {
        warn!(partition, "no app session data, writing zero row");
    }
    let row = reshape_app_sessions(&table);

    let path = store.app_sessions_csv(partition);
    edpulse_store::write_rows(&path, std::slice::from_ref(&row))?;
    push_file(blob, store, &path, true).await?;

    info!(partition, sessions = row.sessions, "app sessions written");
    Ok(row)
}

/// Extract daily content plays per (channel, delivery platform)
///
/// Writes `play/<partition>/plays.csv` and pushes a backup copy to
/// blob storage.
pub async fn extract_plays(
    client: &DruidClient,
    params: &TemplateParams,
    snapshot: &ContentSnapshot,
    store: &DataStore,
    blob: &dyn BlobStore,
    partition: &str,
) -> Result<Vec<PlayRow>> {
    let body = QueryTemplate::AppPlays.render(params);
    let table = client.group_by(&body).await?;
    let rows = reshape_plays(&table, snapshot);

    let path = store.plays_csv(partition);
    edpulse_store::write_rows(&path, &rows)?;
    push_file(blob, store, &path, true).await?;

    info!(partition, buckets = rows.len(), "plays written");
    Ok(rows)
}

#[cfg(test)]
#[path = "sessions_test.rs"]
mod sessions_test;
