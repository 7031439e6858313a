//! EdPulse Report
//!
//! Turns the day's intermediate tables into dashboard rows and appends
//! them to the persisted per-target time series.
//!
//! The aggregation step joins scans, downloads and plays per
//! organisation slug (outer join - an organisation present in any one
//! source appears, zero-filled elsewhere), computes the derived ratio
//! and total columns, and produces one overall row plus one row per
//! organisation. The appender then merges each row into its rolling
//! history CSV in blob storage, deduplicating by date.
//!
//! Column names and their order are a fixed contract with the dashboards
//! that consume these files; see [`schema`].

mod daily;
mod error;
pub mod schema;
mod timeseries;

pub use daily::{aggregate, DailyInputs, DailyMetrics, OrgDailyRow, OverallDailyRow};
pub use error::{ReportError, Result};
pub use timeseries::{append_history, History};
