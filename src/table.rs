use serde::Serialize;

use crate::models::WarningRecord;

pub const WARNING_HEADERS: [&str; 7] = [
    "state",
    "district",
    "date",
    "Observed",
    "Average",
    "Threshold",
    "Severity",
];

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WarningTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

/// Every warning row, unfiltered, with the numeric columns relabeled.
pub fn warning_table(warnings: &[WarningRecord]) -> WarningTable {
    let rows = warnings
        .iter()
        .map(|warning| {
            vec![
                warning.state.clone(),
                warning.district.clone(),
                warning.date.to_string(),
                format_number(warning.total_bio_updates),
                format_number(warning.avg_updates),
                format_number(warning.upper_threshold),
                format!("{:.2}", warning.severity_score),
            ]
        })
        .collect();

    WarningTable {
        headers: WARNING_HEADERS.iter().map(|header| header.to_string()).collect(),
        rows,
    }
}

fn format_number(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{value:.0}")
    } else {
        format!("{value:.2}")
    }
}
