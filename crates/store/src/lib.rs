//! EdPulse Store
//!
//! The local working tree and its blob-storage mirror.
//!
//! Every run reads and writes date-partitioned CSVs under a fixed
//! directory layout, and pushes copies of persisted artefacts to blob
//! storage. Blob access is behind the [`BlobStore`] trait so local runs
//! and tests can swap the HTTP container for a directory mirror or a
//! no-op.
//!
//! # Layout
//!
//! ```text
//! <base_dir>/
//!   config/platform_context.json
//!   tb_metadata/<YYYY-MM-DD>/textbook_snapshot.csv
//!   textbook_reports/<YYYY-MM-DD>/tenant_info.csv
//!   downloads/<YYYY-MM-DD>/downloads.csv
//!   play/<YYYY-MM-DD>/app_sessions.csv
//!   play/<YYYY-MM-DD>/plays.csv
//!   dialcode_scans/<YYYY-MM-DD>/dial_scans.csv
//!   portal_dashboards/<target>/daily_metrics.csv
//!   portal_dashboards/<target>/daily_metrics.json
//! ```

mod blob;
mod error;
mod layout;
mod table;

pub use blob::{pull_file, push_file, BlobStore, HttpBlobStore, LocalBlobStore, NullBlobStore};
pub use error::{Result, StoreError};
pub use layout::DataStore;
pub use table::{derive_json, parse_table, read_rows, read_table, write_rows, write_table, RawTable};
