//! Run date handling
//!
//! The scheduler invokes the job with an execution date in `DD/MM/YYYY`
//! form; the day actually analysed is always the preceding one. Two
//! renderings of the analysis date are used downstream and must not be
//! mixed up: `YYYY-MM-DD` for partition paths, `DD-MM-YYYY` for the Date
//! column of dashboard rows.

use chrono::{Duration, NaiveDate};

use crate::error::{ConfigError, Result};

/// Execution and analysis dates for one run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunDates {
    /// The date the job was launched (from the scheduler)
    pub execution: NaiveDate,
    /// The day being analysed: execution - 1
    pub analysis: NaiveDate,
}

impl RunDates {
    /// Parse an execution date string in `DD/MM/YYYY` form
    pub fn parse(execution_date: &str) -> Result<Self> {
        let execution = NaiveDate::parse_from_str(execution_date, "%d/%m/%Y").map_err(|_| {
            ConfigError::InvalidDate {
                value: execution_date.to_string(),
            }
        })?;
        Ok(Self::from_execution(execution))
    }

    /// Build from an already-parsed execution date
    pub fn from_execution(execution: NaiveDate) -> Self {
        Self {
            execution,
            analysis: execution - Duration::days(1),
        }
    }

    /// Analysis date as a partition segment (`YYYY-MM-DD`)
    pub fn partition(&self) -> String {
        self.analysis.format("%Y-%m-%d").to_string()
    }

    /// Analysis date as a dashboard Date value (`DD-MM-YYYY`)
    pub fn dashboard_date(&self) -> String {
        self.analysis.format("%d-%m-%Y").to_string()
    }

    /// Query interval start (`YYYY-MM-DDT00:00:00+00:00`, analysis date)
    pub fn interval_start(&self) -> String {
        format!("{}T00:00:00+00:00", self.analysis.format("%Y-%m-%d"))
    }

    /// Query interval end (midnight after the analysis date)
    pub fn interval_end(&self) -> String {
        let end = self.analysis + Duration::days(1);
        format!("{}T00:00:00+00:00", end.format("%Y-%m-%d"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse() {
        let dates = RunDates::parse("15/03/2024").unwrap();
        assert_eq!(dates.execution, NaiveDate::from_ymd_opt(2024, 3, 15).unwrap());
        assert_eq!(dates.analysis, NaiveDate::from_ymd_opt(2024, 3, 14).unwrap());
    }

    #[test]
    fn test_parse_rejects_iso() {
        assert!(RunDates::parse("2024-03-15").is_err());
    }

    #[test]
    fn test_renderings() {
        let dates = RunDates::parse("01/01/2024").unwrap();
        assert_eq!(dates.partition(), "2023-12-31");
        assert_eq!(dates.dashboard_date(), "31-12-2023");
        assert_eq!(dates.interval_start(), "2023-12-31T00:00:00+00:00");
        assert_eq!(dates.interval_end(), "2024-01-01T00:00:00+00:00");
    }

    #[test]
    fn test_month_boundary() {
        let dates = RunDates::parse("01/03/2024").unwrap();
        // 2024 is a leap year
        assert_eq!(dates.partition(), "2024-02-29");
    }
}
