use crate::models::{StateMonthlyRecord, TrendPoint};

/// Monthly totals for one state in date order.
pub fn trend_for_state(records: &[StateMonthlyRecord], state: &str) -> Vec<TrendPoint> {
    let mut points: Vec<TrendPoint> = records
        .iter()
        .filter(|record| record.state == state)
        .map(|record| TrendPoint {
            date: record.date,
            total_bio_updates: record.total_bio_updates,
        })
        .collect();

    points.sort_by_key(|point| point.date);
    points
}
