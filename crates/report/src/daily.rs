//! Daily aggregation
//!
//! Combines the three intermediate tables with the channel → slug lookup
//! into one overall row and one row per organisation for the analysis
//! day.
//!
//! Channels absent from the lookup are "unmapped": their scans are
//! excluded from every per-organisation row but retained in the overall
//! totals. Organisations missing from a source appear zero-filled
//! (outer join semantics).

use std::collections::{BTreeMap, HashMap};

use tracing::{debug, info};

use edpulse_config::PlatformContext;
use edpulse_extract::{
    AppSessionRow, DownloadRow, PlayRow, ScanRow, TenantRow, SCAN_SUCCESS,
};
use edpulse_store::DataStore;

use crate::error::{ReportError, Result};
use crate::schema::format_percentage;

/// The intermediate tables one aggregation runs over
#[derive(Debug, Clone)]
pub struct DailyInputs {
    /// Channel id → slug source rows
    pub tenants: Vec<TenantRow>,
    /// Per-(channel, outcome) scan counts
    pub scans: Vec<ScanRow>,
    /// Per-channel download counts
    pub downloads: Vec<DownloadRow>,
    /// The single app-session summary row
    pub app_sessions: AppSessionRow,
    /// Per-(channel, platform) play metrics
    pub plays: Vec<PlayRow>,
}

impl DailyInputs {
    /// Load every input from its intermediate CSV
    ///
    /// Each table is wrapped in its stage-specific error so a failure
    /// names the stage that broke.
    pub fn load(store: &DataStore, partition: &str) -> Result<Self> {
        let tenants = edpulse_store::read_rows(&store.tenant_info_csv(partition))
            .map_err(|source| ReportError::TenantInfo { source })?;
        let scans = edpulse_store::read_rows(&store.dial_scans_csv(partition))
            .map_err(|source| ReportError::Scans { source })?;
        let downloads = edpulse_store::read_rows(&store.downloads_csv(partition))
            .map_err(|source| ReportError::Downloads { source })?;
        let sessions: Vec<AppSessionRow> =
            edpulse_store::read_rows(&store.app_sessions_csv(partition))
                .map_err(|source| ReportError::AppAndPlays { source })?;
        let plays = edpulse_store::read_rows(&store.plays_csv(partition))
            .map_err(|source| ReportError::AppAndPlays { source })?;

        let app_sessions = sessions
            .into_iter()
            .next()
            .ok_or_else(|| ReportError::EmptyAppSessions {
                partition: partition.to_string(),
            })?;

        Ok(Self {
            tenants,
            scans,
            downloads,
            app_sessions,
            plays,
        })
    }
}

/// One organisation's daily metrics
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OrgDailyRow {
    /// Organisation slug (dashboard directory name)
    pub slug: String,
    /// Dashboard date, `DD-MM-YYYY`
    pub date: String,
    /// Successful QR scans
    pub successful_scans: i64,
    /// Failed QR scans
    pub failed_scans: i64,
    /// Content downloads
    pub downloads: i64,
    /// Content plays on the app
    pub plays_app: i64,
    /// Content plays on the portal
    pub plays_portal: i64,
    /// Distinct playing devices on the app
    pub devices_app: i64,
    /// Distinct playing devices on the portal
    pub devices_portal: i64,
    /// Play time on the app, hours
    pub play_time_app_hours: f64,
    /// Play time on the portal, hours
    pub play_time_portal_hours: f64,
}

impl OrgDailyRow {
    /// Total scans, successful plus failed
    pub fn total_scans(&self) -> i64 {
        self.successful_scans + self.failed_scans
    }

    /// Failed-scan percentage of the day's total
    ///
    /// A day with no scans reports 0 rather than dividing by zero.
    pub fn failed_percentage(&self) -> f64 {
        percentage(self.failed_scans, self.total_scans())
    }

    /// Whether every metric is zero
    pub fn is_empty(&self) -> bool {
        self.total_scans() == 0
            && self.downloads == 0
            && self.plays_app == 0
            && self.plays_portal == 0
            && self.devices_app == 0
            && self.devices_portal == 0
            && self.play_time_app_hours == 0.0
            && self.play_time_portal_hours == 0.0
    }

    /// Render in [`crate::schema::ORG_COLUMNS`] order
    ///
    /// Every column other than Date and the percentage renders as an
    /// integer; play-time hours truncate.
    pub fn to_record(&self) -> Vec<String> {
        vec![
            self.date.clone(),
            self.total_scans().to_string(),
            self.successful_scans.to_string(),
            self.failed_scans.to_string(),
            format_percentage(self.failed_percentage()),
            self.downloads.to_string(),
            self.plays_app.to_string(),
            self.devices_app.to_string(),
            (self.play_time_app_hours as i64).to_string(),
            self.plays_portal.to_string(),
            self.devices_portal.to_string(),
            (self.play_time_portal_hours as i64).to_string(),
            (self.plays_app + self.plays_portal).to_string(),
            (self.devices_app + self.devices_portal).to_string(),
            ((self.play_time_app_hours + self.play_time_portal_hours) as i64).to_string(),
        ]
    }
}

/// The platform-wide daily metrics row
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OverallDailyRow {
    /// Dashboard date, `DD-MM-YYYY`
    pub date: String,
    /// Successful QR scans across mapped organisations
    pub successful_scans: i64,
    /// Failed QR scans across mapped organisations
    pub failed_scans: i64,
    /// Scans on channels with no slug mapping
    pub unmapped_scans: i64,
    /// Content downloads
    pub downloads: i64,
    /// App sessions (from the one-row summary)
    pub app_sessions: i64,
    /// Devices on the app (from the one-row summary)
    pub app_devices: i64,
    /// Time on the app in hours (from the one-row summary)
    pub app_time_hours: f64,
    /// Content plays on the app
    pub plays_app: i64,
    /// Content plays on the portal
    pub plays_portal: i64,
    /// Distinct playing devices on the app
    pub devices_app: i64,
    /// Distinct playing devices on the portal
    pub devices_portal: i64,
    /// Play time on the app, hours
    pub play_time_app_hours: f64,
    /// Play time on the portal, hours
    pub play_time_portal_hours: f64,
}

impl OverallDailyRow {
    /// Grand total of scans: successful + failed + unmapped
    pub fn total_scans(&self) -> i64 {
        self.successful_scans + self.failed_scans + self.unmapped_scans
    }

    /// Failed-scan percentage of the grand total
    pub fn failed_percentage(&self) -> f64 {
        percentage(self.failed_scans, self.total_scans())
    }

    /// Unmapped-scan percentage of the grand total
    pub fn unmapped_percentage(&self) -> f64 {
        percentage(self.unmapped_scans, self.total_scans())
    }

    /// Render in [`crate::schema::OVERALL_COLUMNS`] order
    ///
    /// Summed play-time columns truncate to integers; the app time
    /// keeps its fractional hours.
    pub fn to_record(&self) -> Vec<String> {
        vec![
            self.date.clone(),
            self.total_scans().to_string(),
            self.successful_scans.to_string(),
            self.failed_scans.to_string(),
            self.unmapped_scans.to_string(),
            format_percentage(self.failed_percentage()),
            format_percentage(self.unmapped_percentage()),
            self.downloads.to_string(),
            self.app_sessions.to_string(),
            self.app_devices.to_string(),
            self.app_time_hours.to_string(),
            self.plays_app.to_string(),
            self.devices_app.to_string(),
            (self.play_time_app_hours as i64).to_string(),
            self.plays_portal.to_string(),
            self.devices_portal.to_string(),
            (self.play_time_portal_hours as i64).to_string(),
            (self.plays_app + self.plays_portal).to_string(),
            (self.devices_app + self.devices_portal).to_string(),
            ((self.play_time_app_hours + self.play_time_portal_hours) as i64).to_string(),
        ]
    }
}

/// The aggregation result: one overall row, one row per organisation
#[derive(Debug, Clone)]
pub struct DailyMetrics {
    /// Platform-wide totals
    pub overall: OverallDailyRow,
    /// Per-organisation rows, slug order
    pub orgs: Vec<OrgDailyRow>,
}

/// Aggregate one day's intermediate tables into dashboard rows
pub fn aggregate(
    inputs: &DailyInputs,
    context: &PlatformContext,
    dashboard_date: &str,
) -> DailyMetrics {
    let slug_by_channel: HashMap<&str, &str> = inputs
        .tenants
        .iter()
        .map(|t| (t.id.as_str(), t.slug.as_str()))
        .collect();

    let mut orgs: BTreeMap<String, OrgDailyRow> = BTreeMap::new();
    let mut unmapped_scans = 0i64;

    for scan in &inputs.scans {
        match slug_by_channel.get(scan.dialcode_channel.as_str()) {
            Some(slug) => {
                let row = entry(&mut orgs, slug, dashboard_date);
                if scan.failed_flag == SCAN_SUCCESS {
                    row.successful_scans += scan.count;
                } else {
                    row.failed_scans += scan.count;
                }
            }
            None => unmapped_scans += scan.count,
        }
    }

    for download in &inputs.downloads {
        if let Some(slug) = slug_by_channel.get(download.channel.as_str()) {
            entry(&mut orgs, slug, dashboard_date).downloads += download.count;
        }
    }

    for play in &inputs.plays {
        let Some(slug) = slug_by_channel.get(play.channel.as_str()) else {
            continue;
        };
        let row = entry(&mut orgs, slug, dashboard_date);
        if play.pdata_id == context.app {
            row.plays_app += play.plays;
            row.devices_app += play.devices;
            row.play_time_app_hours += play.play_time_hours;
        } else if play.pdata_id == context.portal {
            row.plays_portal += play.plays;
            row.devices_portal += play.devices;
            row.play_time_portal_hours += play.play_time_hours;
        } else {
            debug!(pdata = %play.pdata_id, "play row for unknown platform ignored");
        }
    }

    let mut overall = OverallDailyRow {
        date: dashboard_date.to_string(),
        unmapped_scans,
        app_sessions: inputs.app_sessions.sessions,
        app_devices: inputs.app_sessions.devices,
        app_time_hours: inputs.app_sessions.time_hours,
        ..Default::default()
    };
    for row in orgs.values() {
        overall.successful_scans += row.successful_scans;
        overall.failed_scans += row.failed_scans;
        overall.downloads += row.downloads;
        overall.plays_app += row.plays_app;
        overall.plays_portal += row.plays_portal;
        overall.devices_app += row.devices_app;
        overall.devices_portal += row.devices_portal;
        overall.play_time_app_hours += row.play_time_app_hours;
        overall.play_time_portal_hours += row.play_time_portal_hours;
    }

    info!(
        orgs = orgs.len(),
        unmapped_scans,
        total_scans = overall.total_scans(),
        "daily metrics aggregated"
    );

    // tenants with a blank slug count toward the overall totals above but
    // have no dashboard directory to write to
    DailyMetrics {
        overall,
        orgs: orgs
            .into_values()
            .filter(|row| !row.slug.is_empty())
            .collect(),
    }
}

fn entry<'a>(
    orgs: &'a mut BTreeMap<String, OrgDailyRow>,
    slug: &str,
    date: &str,
) -> &'a mut OrgDailyRow {
    orgs.entry(slug.to_string()).or_insert_with(|| OrgDailyRow {
        slug: slug.to_string(),
        date: date.to_string(),
        ..Default::default()
    })
}

/// Share of `part` in `total`, 0 when the total is zero
fn percentage(part: i64, total: i64) -> f64 {
    if total == 0 {
        0.0
    } else {
        part as f64 * 100.0 / total as f64
    }
}

#[cfg(test)]
#[path = "daily_test.rs"]
mod daily_test;
