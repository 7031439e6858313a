//! Dashboard column schemas
//!
//! These lists are a contract with the downstream dashboards, which
//! address columns by name and position. Do not reorder.

/// Columns of the overall daily metrics history
pub const OVERALL_COLUMNS: [&str; 20] = [
    "Date",
    "Total QR scans",
    "Successful QR Scans",
    "Failed QR Scans",
    "Unmapped QR Scans",
    "Percentage (%) of Failed QR Scans",
    "Percentage (%) of Unmapped QR Scans",
    "Total Content Downloads",
    "Total App Sessions",
    "Total Devices on App",
    "Total Time on App (in hours)",
    "Total Content Plays on App",
    "Total Devices that played content on App",
    "Content Play Time on App (in hours)",
    "Total Content Plays on Portal",
    "Total Devices that played content on Portal",
    "Content Play Time on Portal (in hours)",
    "Total Content Plays",
    "Total Devices that played content",
    "Total Content Play Time (in hours)",
];

/// Columns of each organisation's daily metrics history
pub const ORG_COLUMNS: [&str; 15] = [
    "Date",
    "Total QR scans",
    "Successful QR Scans",
    "Failed QR Scans",
    "Percentage (%) of Failed QR Scans",
    "Total Content Downloads",
    "Total Content Plays on App",
    "Total Devices that played content on App",
    "Content Play Time on App (in hours)",
    "Total Content Plays on Portal",
    "Total Devices that played content on Portal",
    "Content Play Time on Portal (in hours)",
    "Total Content Plays",
    "Total Devices that played content",
    "Total Content Play Time (in hours)",
];

/// Render a percentage with the two decimals dashboards expect
pub fn format_percentage(value: f64) -> String {
    format!("{:.2}", value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_column_counts() {
        assert_eq!(OVERALL_COLUMNS.len(), 20);
        assert_eq!(ORG_COLUMNS.len(), 15);
    }

    #[test]
    fn test_date_leads_both_schemas() {
        assert_eq!(OVERALL_COLUMNS[0], "Date");
        assert_eq!(ORG_COLUMNS[0], "Date");
    }

    #[test]
    fn test_org_columns_are_a_subset_of_overall() {
        for column in ORG_COLUMNS {
            assert!(
                OVERALL_COLUMNS.contains(&column),
                "{} missing from overall",
                column
            );
        }
    }

    #[test]
    fn test_format_percentage() {
        assert_eq!(format_percentage(16.666666), "16.67");
        assert_eq!(format_percentage(0.0), "0.00");
        assert_eq!(format_percentage(100.0), "100.00");
    }
}
