//! Intermediate table rows
//!
//! The CSV schemas shared between the extractors that write them and the
//! aggregator that reads them back. Serde renames carry the exact column
//! headers - several double as dashboard column names downstream.

use serde::{Deserialize, Serialize};

/// Scan outcome label for a positive result size
pub const SCAN_SUCCESS: &str = "Successful QR Scans";
/// Scan outcome label for a zero or absent result size
pub const SCAN_FAILED: &str = "Failed QR Scans";

/// One (channel, outcome) bucket of QR scan counts
///
/// `dialcode_channel` is the empty string for events that carried no
/// channel - those are bucketed, never dropped.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanRow {
    /// Organisational channel, possibly empty
    pub dialcode_channel: String,
    /// [`SCAN_SUCCESS`] or [`SCAN_FAILED`]
    pub failed_flag: String,
    /// Event count in this bucket
    pub count: i64,
}

/// Daily content downloads for one channel
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DownloadRow {
    /// Organisational channel
    pub channel: String,
    /// Download count
    pub count: i64,
}

/// The single app-session summary row for one day
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppSessionRow {
    /// Session count on the app
    #[serde(rename = "Total App Sessions")]
    pub sessions: i64,
    /// Distinct devices seen on the app
    #[serde(rename = "Total Devices on App")]
    pub devices: i64,
    /// Time spent on the app, in hours
    #[serde(rename = "Total Time on App (in hours)")]
    pub time_hours: f64,
}

/// Play metrics for one (channel, delivery platform) pair
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayRow {
    /// Organisational channel
    pub channel: String,
    /// Delivery platform producer id (app or portal)
    pub pdata_id: String,
    /// Distinct devices that played content
    #[serde(rename = "Total Devices that played content")]
    pub devices: i64,
    /// Play session count
    #[serde(rename = "Total Content Plays")]
    pub plays: i64,
    /// Time spent playing content, in hours
    #[serde(rename = "Content Play Time (in hours)")]
    pub play_time_hours: f64,
}

/// One organisation from tenant metadata
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TenantRow {
    /// Organisational channel identifier
    pub id: String,
    /// Human-readable slug used in persisted dashboards
    #[serde(default)]
    pub slug: String,
}
