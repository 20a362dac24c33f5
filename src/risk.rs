use std::cmp::Ordering;
use std::collections::HashMap;

use chrono::NaiveDate;

use crate::config::Aggregation;
use crate::models::{DistrictAnomalyRecord, DistrictBar, RiskLevel};

pub const MEDIUM_FLOOR: f64 = 2.0;
pub const HIGH_CEILING: f64 = 2.5;

/// Low below 2.0, Medium on [2.0, 2.5], High above 2.5.
pub fn risk_level(severity: f64) -> RiskLevel {
    if severity < MEDIUM_FLOOR {
        RiskLevel::Low
    } else if severity <= HIGH_CEILING {
        RiskLevel::Medium
    } else {
        RiskLevel::High
    }
}

impl RiskLevel {
    pub fn color(self) -> &'static str {
        match self {
            RiskLevel::Low => "#2ecc71",
            RiskLevel::Medium => "#f39c12",
            RiskLevel::High => "#e74c3c",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            RiskLevel::Low => "Low (< 2)",
            RiskLevel::Medium => "Medium (2 – 2.5)",
            RiskLevel::High => "High (> 2.5)",
        }
    }

    pub const ALL: [RiskLevel; 3] = [RiskLevel::Low, RiskLevel::Medium, RiskLevel::High];
}

struct Tally {
    severity_sum: f64,
    count: usize,
    latest: NaiveDate,
}

/// Top districts of `state` among rows flagged as early warnings, highest first.
pub fn rank_districts(
    records: &[DistrictAnomalyRecord],
    state: &str,
    aggregation: Aggregation,
    top_n: usize,
) -> Vec<DistrictBar> {
    let mut totals: HashMap<&str, Tally> = HashMap::new();

    for record in records {
        if record.state != state || !record.early_warning {
            continue;
        }
        let entry = totals.entry(record.district.as_str()).or_insert(Tally {
            severity_sum: 0.0,
            count: 0,
            latest: record.date,
        });
        entry.severity_sum += record.severity_score;
        entry.count += 1;
        entry.latest = entry.latest.max(record.date);
    }

    let mut bars: Vec<DistrictBar> = totals
        .into_iter()
        .map(|(district, tally)| {
            let (value, risk) = match aggregation {
                Aggregation::MeanSeverity => {
                    let mean = tally.severity_sum / tally.count as f64;
                    (mean, Some(risk_level(mean)))
                }
                Aggregation::WarningCount => (tally.count as f64, None),
            };
            DistrictBar {
                district: district.to_string(),
                value,
                risk,
                latest_warning: tally.latest,
            }
        })
        .collect();

    bars.sort_by(|a, b| {
        b.value
            .partial_cmp(&a.value)
            .unwrap_or(Ordering::Equal)
            .then_with(|| a.district.cmp(&b.district))
    });
    bars.truncate(top_n);
    bars
}

#[cfg(test)]
mod tests {
    use super::*;

    fn flagged(state: &str, district: &str, severity: f64, early_warning: bool) -> DistrictAnomalyRecord {
        DistrictAnomalyRecord {
            state: state.to_string(),
            district: district.to_string(),
            date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            severity_score: severity,
            early_warning,
        }
    }

    fn sample() -> Vec<DistrictAnomalyRecord> {
        vec![
            flagged("MH", "Pune", 2.8, true),
            flagged("MH", "Pune", 2.4, true),
            flagged("MH", "Nagpur", 1.5, true),
            flagged("MH", "Nagpur", 1.7, true),
            flagged("MH", "Nagpur", 1.9, true),
            flagged("MH", "Thane", 3.1, false),
            flagged("KA", "Mysuru", 2.2, true),
        ]
    }

    #[test]
    fn thresholds_are_inclusive_on_the_medium_band() {
        assert_eq!(risk_level(1.99), RiskLevel::Low);
        assert_eq!(risk_level(2.0), RiskLevel::Medium);
        assert_eq!(risk_level(2.5), RiskLevel::Medium);
        assert_eq!(risk_level(2.51), RiskLevel::High);
    }

    #[test]
    fn mean_severity_ranks_flagged_rows_of_the_state() {
        let bars = rank_districts(&sample(), "MH", Aggregation::MeanSeverity, 10);
        assert_eq!(bars.len(), 2);
        assert_eq!(bars[0].district, "Pune");
        assert!((bars[0].value - 2.6).abs() < 1e-9);
        assert_eq!(bars[0].risk, Some(RiskLevel::High));
        assert_eq!(bars[1].district, "Nagpur");
        assert!((bars[1].value - 1.7).abs() < 1e-9);
        assert_eq!(bars[1].risk, Some(RiskLevel::Low));
    }

    #[test]
    fn warning_count_ranks_by_row_count() {
        let bars = rank_districts(&sample(), "MH", Aggregation::WarningCount, 10);
        assert_eq!(bars[0].district, "Nagpur");
        assert_eq!(bars[0].value, 3.0);
        assert_eq!(bars[1].value, 2.0);
        assert!(bars.iter().all(|bar| bar.risk.is_none()));
    }

    #[test]
    fn keeps_only_top_n_with_stable_ties() {
        let records: Vec<_> = ["E", "C", "A", "D", "B"]
            .iter()
            .map(|district| flagged("MH", district, 2.0, true))
            .collect();
        let bars = rank_districts(&records, "MH", Aggregation::MeanSeverity, 3);
        let names: Vec<_> = bars.iter().map(|bar| bar.district.as_str()).collect();
        assert_eq!(names, vec!["A", "B", "C"]);
    }

    #[test]
    fn unflagged_or_other_states_give_nothing() {
        assert!(rank_districts(&sample(), "GA", Aggregation::MeanSeverity, 10).is_empty());
        let only_unflagged = vec![flagged("MH", "Thane", 3.1, false)];
        assert!(rank_districts(&only_unflagged, "MH", Aggregation::WarningCount, 10).is_empty());
    }

    #[test]
    fn tracks_latest_flagged_month_per_district() {
        let mut records = sample();
        records[1].date = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();
        let mut unflagged_later = flagged("MH", "Pune", 2.0, false);
        unflagged_later.date = NaiveDate::from_ymd_opt(2024, 9, 1).unwrap();
        records.push(unflagged_later);

        let bars = rank_districts(&records, "MH", Aggregation::MeanSeverity, 10);
        assert_eq!(bars[0].district, "Pune");
        assert_eq!(bars[0].latest_warning, NaiveDate::from_ymd_opt(2024, 6, 1).unwrap());
        assert_eq!(bars[1].latest_warning, NaiveDate::from_ymd_opt(2024, 1, 1).unwrap());
    }
}
