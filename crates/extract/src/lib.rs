//! EdPulse Extract
//!
//! The per-metric extractors. Each one is a pure request/reshape step:
//! render a named query for the analysis day, flatten the response, join
//! it against reference data where attribution is needed, aggregate by
//! channel, and write the result as a date-partitioned intermediate CSV
//! (plus a blob backup copy).
//!
//! Extractors are independent of each other; all of them require the
//! content metadata snapshot for the analysis day to be present.
//! Intermediate CSVs are unconditionally overwritten on re-runs.

mod downloads;
mod error;
mod rows;
mod scans;
mod sessions;
mod snapshot;
mod tenants;

pub use downloads::extract_downloads;
pub use error::{ExtractError, Result};
pub use rows::{AppSessionRow, DownloadRow, PlayRow, ScanRow, TenantRow, SCAN_FAILED, SCAN_SUCCESS};
pub use scans::extract_dial_scans;
pub use sessions::{extract_app_sessions, extract_plays};
pub use snapshot::ContentSnapshot;
pub use tenants::fetch_tenant_info;
