//! Tests for the time-series appender

use super::*;
use crate::schema::ORG_COLUMNS;
use edpulse_store::LocalBlobStore;

const COLUMNS: [&str; 3] = ["Date", "Total QR scans", "Failed QR Scans"];

fn record(date: &str, total: &str, failed: &str) -> Vec<String> {
    vec![date.to_string(), total.to_string(), failed.to_string()]
}

#[test]
fn test_upsert_appends() {
    let mut history = History::empty(&COLUMNS);
    history.upsert(record("14-03-2024", "12", "2")).unwrap();
    assert_eq!(history.len(), 1);
    assert_eq!(history.cell(0, "Total QR scans"), Some("12"));
}

#[test]
fn test_reappend_same_date_replaces() {
    let mut history = History::empty(&COLUMNS);
    history.upsert(record("14-03-2024", "12", "2")).unwrap();
    history.upsert(record("14-03-2024", "15", "3")).unwrap();

    // length unchanged, values updated
    assert_eq!(history.len(), 1);
    assert_eq!(history.cell(0, "Total QR scans"), Some("15"));
    assert_eq!(history.cell(0, "Failed QR Scans"), Some("3"));
}

#[test]
fn test_sorted_ascending_after_append() {
    let mut history = History::empty(&COLUMNS);
    history.upsert(record("14-03-2024", "12", "2")).unwrap();
    history.upsert(record("15-03-2024", "9", "1")).unwrap();
    // a late backfill for an earlier day
    history.upsert(record("28-02-2024", "4", "0")).unwrap();

    assert_eq!(history.cell(0, "Date"), Some("28-02-2024"));
    assert_eq!(history.cell(1, "Date"), Some("14-03-2024"));
    assert_eq!(history.cell(2, "Date"), Some("15-03-2024"));
}

#[test]
fn test_sort_is_by_date_not_string() {
    let mut history = History::empty(&COLUMNS);
    history.upsert(record("02-01-2024", "1", "0")).unwrap();
    history.upsert(record("28-12-2023", "1", "0")).unwrap();
    // string order would put 02-01-2024 first anyway; use a pair where
    // lexicographic and chronological order disagree
    history.upsert(record("10-11-2023", "1", "0")).unwrap();

    assert_eq!(history.cell(0, "Date"), Some("10-11-2023"));
    assert_eq!(history.cell(1, "Date"), Some("28-12-2023"));
    assert_eq!(history.cell(2, "Date"), Some("02-01-2024"));
}

#[test]
fn test_parse_reprojects_old_schema() {
    // stray historical column, one current column missing
    let bytes = b"Date,Stray Column,Total QR scans\n14-03-2024,x,12\n";
    let history = History::parse(bytes, &COLUMNS).unwrap();
    assert_eq!(history.len(), 1);
    assert_eq!(history.cell(0, "Total QR scans"), Some("12"));
    assert_eq!(history.cell(0, "Failed QR Scans"), Some(""));
    assert_eq!(history.table().headers, COLUMNS);
}

#[test]
fn test_upsert_rejects_wrong_shape() {
    let mut history = History::empty(&COLUMNS);
    let err = history.upsert(vec!["14-03-2024".into()]).unwrap_err();
    assert!(matches!(err, ReportError::RecordShape { got: 1, want: 3 }));
}

#[tokio::test]
async fn test_append_history_roundtrip() {
    let store_dir = tempfile::tempdir().unwrap();
    let blob_dir = tempfile::tempdir().unwrap();
    let store = edpulse_store::DataStore::new(store_dir.path());
    let blob = LocalBlobStore::new(blob_dir.path());

    let record_day_one: Vec<String> = (0..ORG_COLUMNS.len()).map(|i| {
        if i == 0 { "14-03-2024".to_string() } else { i.to_string() }
    }).collect();

    append_history(&store, &blob, "alpha", &ORG_COLUMNS, record_day_one.clone())
        .await
        .unwrap();

    let csv_path = store.dashboard_csv("alpha");
    assert!(csv_path.exists());
    assert!(csv_path.with_extension("json").exists());

    // next day appends a second row to the blob-persisted history
    let mut record_day_two = record_day_one.clone();
    record_day_two[0] = "15-03-2024".to_string();
    append_history(&store, &blob, "alpha", &ORG_COLUMNS, record_day_two)
        .await
        .unwrap();

    let table = edpulse_store::read_table(&csv_path).unwrap();
    assert_eq!(table.rows.len(), 2);
    assert_eq!(table.cell(0, "Date"), Some("14-03-2024"));
    assert_eq!(table.cell(1, "Date"), Some("15-03-2024"));

    // re-running day two replaces, not duplicates
    let mut rerun = record_day_one.clone();
    rerun[0] = "15-03-2024".to_string();
    rerun[1] = "99".to_string();
    append_history(&store, &blob, "alpha", &ORG_COLUMNS, rerun)
        .await
        .unwrap();
    let table = edpulse_store::read_table(&csv_path).unwrap();
    assert_eq!(table.rows.len(), 2);
    assert_eq!(table.cell(1, "Total QR scans"), Some("99"));
}

#[tokio::test]
async fn test_append_history_starts_empty_when_blob_absent() {
    let store_dir = tempfile::tempdir().unwrap();
    let store = edpulse_store::DataStore::new(store_dir.path());
    let blob = edpulse_store::NullBlobStore;

    append_history(
        &store,
        &blob,
        "overall",
        &COLUMNS,
        record("14-03-2024", "12", "2"),
    )
    .await
    .unwrap();

    let table = edpulse_store::read_table(&store.dashboard_csv("overall")).unwrap();
    assert_eq!(table.rows.len(), 1);
}
