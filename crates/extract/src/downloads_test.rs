//! Tests for download attribution

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
        ("do_2", "channel_a", "Resource"),
        ("do_3", "channel_b", "TextBook"),
    ])
}

#[test]
fn test_sums_per_channel() {
    let (rows, dropped) = reshape_downloads(
        &table(vec![
            json!({"object_id": "do_1", "count": 3}),
            json!({"object_id": "do_2", "count": 2}),
        ]),
        &snapshot(),
    );
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].channel, "channel_a");
    assert_eq!(rows[0].count, 5);
    assert_eq!(dropped, 0);
}

#[test]
fn test_non_resource_content_is_unattributed() {
    let (rows, dropped) = reshape_downloads(
        &table(vec![json!({"object_id": "do_3", "count": 4})]),
        &snapshot(),
    );
    assert!(rows.is_empty());
    assert_eq!(dropped, 1);
}

#[test]
fn test_unknown_content_is_dropped_not_an_error() {
    let (rows, dropped) = reshape_downloads(
        &table(vec![
            json!({"object_id": "do_404", "count": 9}),
            json!({"object_id": "do_1", "count": 1}),
        ]),
        &snapshot(),
    );
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].count, 1);
    assert_eq!(dropped, 1);
}

#[test]
fn test_empty_response() {
    let (rows, dropped) = reshape_downloads(&EventTable::new(), &snapshot());
    assert!(rows.is_empty());
    assert_eq!(dropped, 0);
}
