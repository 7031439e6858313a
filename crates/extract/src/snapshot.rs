//! Content metadata snapshot
//!
//! Maps content identifiers to their owning channel and content type.
//! The snapshot is produced upstream and published per analysis day; this
//! module only retrieves it - from the local tree when present, from blob
//! storage otherwise.

use std::collections::HashMap;

use serde::Deserialize;
use tracing::{debug, info};

use edpulse_store::{pull_file, BlobStore, DataStore};

use crate::error::{ExtractError, Result};

#[derive(Debug, Deserialize)]
struct SnapshotRow {
    identifier: String,
    #[serde(default)]
    channel: String,
    #[serde(rename = "contentType", default)]
    content_type: String,
}

#[derive(Debug, Clone)]
struct ContentMeta {
    channel: String,
    content_type: String,
}

/// Content identifier → (channel, content type) lookup for one day
#[derive(Debug, Clone)]
pub struct ContentSnapshot {
    entries: HashMap<String, ContentMeta>,
}

impl ContentSnapshot {
    /// Load the snapshot for a partition, fetching from blob if absent
    pub async fn load(
        store: &DataStore,
        blob: &dyn BlobStore,
        partition: &str,
    ) -> Result<Self> {
        let path = store.snapshot_csv(partition);
        if !path.exists() {
            debug!(partition, "snapshot not local, fetching from blob");
            pull_file(blob, store, &path).await.map_err(|e| {
                if e.is_not_found() {
                    ExtractError::SnapshotMissing {
                        partition: partition.to_string(),
                    }
                } else {
                    ExtractError::Store(e)
                }
            })?;
        }

        let rows: Vec<SnapshotRow> = edpulse_store::read_rows(&path)?;
        let mut entries = HashMap::with_capacity(rows.len());
        for row in rows {
            // duplicate identifiers collapse to the last entry, matching
            // the dedup the upstream producer applies
            entries.insert(
                row.identifier,
                ContentMeta {
                    channel: row.channel,
                    content_type: row.content_type,
                },
            );
        }

        info!(partition, entries = entries.len(), "content snapshot loaded");
        Ok(Self { entries })
    }

    /// Build a snapshot from (identifier, channel, content type) triples
    pub fn from_entries<I, S>(entries: I) -> Self
    where
        I: IntoIterator<Item = (S, S, S)>,
        S: Into<String>,
    {
        Self {
            entries: entries
                .into_iter()
                .map(|(id, channel, content_type)| {
                    (
                        id.into(),
                        ContentMeta {
                            channel: channel.into(),
                            content_type: content_type.into(),
                        },
                    )
                })
                .collect(),
        }
    }

    /// Channel of a content identifier, any content type
    ///
    /// Returns None for unknown content and for entries with a blank
    /// channel - both are "unattributed".
    pub fn channel(&self, identifier: &str) -> Option<&str> {
        self.entries
            .get(identifier)
            .filter(|meta| !meta.channel.is_empty())
            .map(|meta| meta.channel.as_str())
    }

    /// Channel of a content identifier, `Resource` content only
    ///
    /// Downloads are attributed through resources; other content types
    /// do not count.
    pub fn resource_channel(&self, identifier: &str) -> Option<&str> {
        self.entries
            .get(identifier)
            .filter(|meta| meta.content_type == "Resource" && !meta.channel.is_empty())
            .map(|meta| meta.channel.as_str())
    }

    /// Number of known content identifiers
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the snapshot is empty
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
#[path = "snapshot_test.rs"]
mod snapshot_test;
