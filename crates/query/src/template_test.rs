//! Tests for query templates

use super::*;
use edpulse_config::{PlatformContext, RunDates};

fn params() -> TemplateParams {
    let context = PlatformContext {
        app: "prod.ed.app".into(),
        portal: "prod.ed.portal".into(),
    };
    let dates = RunDates::parse("15/03/2024").unwrap();
    TemplateParams::new(&context, &dates)
}

#[test]
fn test_interval_covers_analysis_day() {
    let p = params();
    assert_eq!(p.start, "2024-03-14T00:00:00+00:00");
    assert_eq!(p.end, "2024-03-15T00:00:00+00:00");
}

#[test]
fn test_names() {
    assert_eq!(QueryTemplate::DialcodeScans.name(), "dialcode-scans");
    assert_eq!(QueryTemplate::ContentDownloads.name(), "content-downloads");
    assert_eq!(QueryTemplate::AppSessionsDevices.name(), "app-sessions-devices");
    assert_eq!(QueryTemplate::AppPlays.name(), "app-plays");
}

#[test]
fn test_all_templates_carry_interval() {
    let p = params();
    for template in [
        QueryTemplate::DialcodeScans,
        QueryTemplate::ContentDownloads,
        QueryTemplate::AppSessionsDevices,
        QueryTemplate::AppPlays,
    ] {
        let body = template.render(&p);
        let intervals = body["intervals"].as_array().unwrap();
        assert_eq!(
            intervals[0].as_str().unwrap(),
            "2024-03-14T00:00:00+00:00/2024-03-15T00:00:00+00:00",
            "bad interval in {}",
            template.name()
        );
    }
}

#[test]
fn test_downloads_filters_on_app_only() {
    let body = QueryTemplate::ContentDownloads.render(&params());
    let rendered = body.to_string();
    assert!(rendered.contains("prod.ed.app"));
    assert!(!rendered.contains("prod.ed.portal"));
    assert_eq!(body["dimensions"][0], "object_id");
}

#[test]
fn test_plays_covers_both_platforms() {
    let body = QueryTemplate::AppPlays.render(&params());
    let rendered = body.to_string();
    assert!(rendered.contains("prod.ed.app"));
    assert!(rendered.contains("prod.ed.portal"));
    let dims: Vec<&str> = body["dimensions"]
        .as_array()
        .unwrap()
        .iter()
        .map(|d| d.as_str().unwrap())
        .collect();
    assert_eq!(
        dims,
        ["dimensions_pdata_id", "object_rollup_l1", "dimensions_did"]
    );
}

#[test]
fn test_sessions_aggregator_names_are_the_csv_headers() {
    let body = QueryTemplate::AppSessionsDevices.render(&params());
    let names: Vec<&str> = body["aggregations"]
        .as_array()
        .unwrap()
        .iter()
        .map(|a| a["name"].as_str().unwrap())
        .collect();
    assert_eq!(
        names,
        ["Total App Sessions", "Total Devices on App", "Total Time on App"]
    );
}

#[test]
fn test_scans_dimensions() {
    let body = QueryTemplate::DialcodeScans.render(&params());
    let dims: Vec<&str> = body["dimensions"]
        .as_array()
        .unwrap()
        .iter()
        .map(|d| d.as_str().unwrap())
        .collect();
    assert_eq!(dims, ["dialcode_channel", "edata_size"]);
}
