//! Named query templates
//!
//! Each daily metric is backed by one Druid query. Templates are rendered
//! with the platform producer ids and the analysis-day interval; the
//! aggregator output names double as the column headers of the
//! intermediate CSVs, so they are part of the downstream contract.

use edpulse_config::{PlatformContext, RunDates};
use serde_json::{json, Value};

/// Parameters substituted into every query template
#[derive(Debug, Clone)]
pub struct TemplateParams {
    /// App producer id
    pub app: String,
    /// Portal producer id
    pub portal: String,
    /// Interval start, ISO-8601 with explicit UTC offset
    pub start: String,
    /// Interval end (exclusive), ISO-8601 with explicit UTC offset
    pub end: String,
}

impl TemplateParams {
    /// Build params for one analysis day
    pub fn new(context: &PlatformContext, dates: &RunDates) -> Self {
        Self {
            app: context.app.clone(),
            portal: context.portal.clone(),
            start: dates.interval_start(),
            end: dates.interval_end(),
        }
    }

    fn interval(&self) -> String {
        format!("{}/{}", self.start, self.end)
    }
}

/// The named queries the pipeline issues
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryTemplate {
    /// QR scan events with their result size, per channel
    DialcodeScans,
    /// Successful content downloads on the app, per content identifier
    ContentDownloads,
    /// One-row app session summary (sessions, devices, time spent)
    AppSessionsDevices,
    /// Content play sessions per (platform, content, device)
    AppPlays,
}

impl QueryTemplate {
    /// Template name as referenced in logs
    pub fn name(&self) -> &'static str {
        match self {
            Self::DialcodeScans => "dialcode-scans",
            Self::ContentDownloads => "content-downloads",
            Self::AppSessionsDevices => "app-sessions-devices",
            Self::AppPlays => "app-plays",
        }
    }

    /// Render the query body with the given parameters
    pub fn render(&self, params: &TemplateParams) -> Value {
        match self {
            Self::DialcodeScans => json!({
                "queryType": "groupBy",
                "dataSource": "telemetry-events",
                "granularity": "all",
                "intervals": [params.interval()],
                "dimensions": ["dialcode_channel", "edata_size"],
                "aggregations": [
                    {"type": "count", "name": "count"}
                ],
                "filter": {
                    "type": "and",
                    "fields": [
                        {"type": "selector", "dimension": "eid", "value": "SEARCH"},
                        {"type": "not", "field": {
                            "type": "selector", "dimension": "edata_filters_dialcodes", "value": null
                        }},
                        {"type": "or", "fields": [
                            {"type": "selector", "dimension": "context_pdata_id", "value": params.app},
                            {"type": "selector", "dimension": "context_pdata_id", "value": params.portal}
                        ]}
                    ]
                }
            }),
            Self::ContentDownloads => json!({
                "queryType": "groupBy",
                "dataSource": "telemetry-events",
                "granularity": "all",
                "intervals": [params.interval()],
                "dimensions": ["object_id"],
                "aggregations": [
                    {"type": "count", "name": "count"}
                ],
                "filter": {
                    "type": "and",
                    "fields": [
                        {"type": "selector", "dimension": "eid", "value": "INTERACT"},
                        {"type": "selector", "dimension": "edata_subtype", "value": "ContentDownload-Success"},
                        {"type": "selector", "dimension": "context_pdata_id", "value": params.app}
                    ]
                }
            }),
            Self::AppSessionsDevices => json!({
                "queryType": "groupBy",
                "dataSource": "summary-events",
                "granularity": "all",
                "intervals": [params.interval()],
                "dimensions": [],
                "aggregations": [
                    {"type": "count", "name": "Total App Sessions"},
                    {"type": "cardinality", "name": "Total Devices on App",
                     "fields": ["dimensions_did"], "round": true},
                    {"type": "doubleSum", "name": "Total Time on App",
                     "fieldName": "edata_eks_time_spent"}
                ],
                "filter": {
                    "type": "and",
                    "fields": [
                        {"type": "selector", "dimension": "dimensions_type", "value": "app"},
                        {"type": "selector", "dimension": "dimensions_pdata_id", "value": params.app}
                    ]
                }
            }),
            Self::AppPlays => json!({
                "queryType": "groupBy",
                "dataSource": "summary-events",
                "granularity": "all",
                "intervals": [params.interval()],
                "dimensions": ["dimensions_pdata_id", "object_rollup_l1", "dimensions_did"],
                "aggregations": [
                    {"type": "count", "name": "Total Content Plays"},
                    {"type": "doubleSum", "name": "Content Play Time",
                     "fieldName": "edata_eks_time_spent"}
                ],
                "filter": {
                    "type": "and",
                    "fields": [
                        {"type": "selector", "dimension": "dimensions_type", "value": "content"},
                        {"type": "selector", "dimension": "dimensions_mode", "value": "play"},
                        {"type": "or", "fields": [
                            {"type": "selector", "dimension": "dimensions_pdata_id", "value": params.app},
                            {"type": "selector", "dimension": "dimensions_pdata_id", "value": params.portal}
                        ]}
                    ]
                }
            }),
        }
    }
}

#[cfg(test)]
#[path = "template_test.rs"]
mod template_test;
