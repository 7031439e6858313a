//! Tests for session and play reshaping

use super::*;
use edpulse_query::EventTable;
use serde_json::json;

fn table(events: Vec<serde_json::Value>) -> EventTable {
    EventTable::from_rows(
        events
            .into_iter()
            .map(|e| e.as_object().unwrap().clone())
            .collect(),
    )
}

fn snapshot() -> ContentSnapshot {
    ContentSnapshot::from_entries([
        ("do_1", "channel_a", "Resource"),
        ("do_2", "channel_b", "TextBook"),
    ])
}

#[test]
fn test_app_sessions_time_converts_to_hours() {
    let row = reshape_app_sessions(&table(vec![json!({
        "Total App Sessions": 120,
        "Total Devices on App": 45,
        "Total Time on App": 7200.0
    })]));
    assert_eq!(row.sessions, 120);
    assert_eq!(row.devices, 45);
    assert!((row.time_hours - 2.0).abs() < f64::EPSILON);
}

#[test]
fn test_app_sessions_empty_response_is_zero_row() {
    let row = reshape_app_sessions(&EventTable::new());
    assert_eq!(row.sessions, 0);
    assert_eq!(row.devices, 0);
    assert_eq!(row.time_hours, 0.0);
}

#[test]
fn test_plays_rolls_up_per_channel_and_platform() {
    let rows = reshape_plays(
        &table(vec![
            json!({"dimensions_pdata_id": "app", "object_rollup_l1": "do_1",
                   "dimensions_did": "d1", "Total Content Plays": 2, "Content Play Time": 1800.0}),
            json!({"dimensions_pdata_id": "app", "object_rollup_l1": "do_1",
                   "dimensions_did": "d2", "Total Content Plays": 1, "Content Play Time": 1800.0}),
            json!({"dimensions_pdata_id": "portal", "object_rollup_l1": "do_1",
                   "dimensions_did": "d1", "Total Content Plays": 1, "Content Play Time": 3600.0}),
        ]),
        &snapshot(),
    );
    assert_eq!(rows.len(), 2);

    let app = &rows[0];
    assert_eq!(app.channel, "channel_a");
    assert_eq!(app.pdata_id, "app");
    assert_eq!(app.devices, 2);
    assert_eq!(app.plays, 3);
    assert!((app.play_time_hours - 1.0).abs() < f64::EPSILON);

    let portal = &rows[1];
    assert_eq!(portal.pdata_id, "portal");
    assert_eq!(portal.devices, 1);
}

#[test]
fn test_plays_count_devices_distinct() {
    let rows = reshape_plays(
        &table(vec![
            json!({"dimensions_pdata_id": "app", "object_rollup_l1": "do_1",
                   "dimensions_did": "d1", "Total Content Plays": 1, "Content Play Time": 60.0}),
            json!({"dimensions_pdata_id": "app", "object_rollup_l1": "do_2",
                   "dimensions_did": "d1", "Total Content Plays": 1, "Content Play Time": 60.0}),
        ]),
        &snapshot(),
    );
    // two channels, same device on both
    assert_eq!(rows.len(), 2);
    assert!(rows.iter().all(|r| r.devices == 1));
}

#[test]
fn test_plays_drop_unattributable_content() {
    let rows = reshape_plays(
        &table(vec![json!({"dimensions_pdata_id": "app", "object_rollup_l1": "do_404",
                           "dimensions_did": "d1", "Total Content Plays": 5, "Content Play Time": 60.0})]),
        &snapshot(),
    );
    assert!(rows.is_empty());
}

#[test]
fn test_plays_snapshot_join_is_not_resource_restricted() {
    let rows = reshape_plays(
        &table(vec![json!({"dimensions_pdata_id": "portal", "object_rollup_l1": "do_2",
                           "dimensions_did": "d9", "Total Content Plays": 1, "Content Play Time": 60.0})]),
        &snapshot(),
    );
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].channel, "channel_b");
}
