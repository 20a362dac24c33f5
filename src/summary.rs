use crate::models::{Dataset, Kpis};

pub const LATEST_MONTH_FORMAT: &str = "%B %Y";

/// Dashboard-wide KPIs, independent of the state selection.
pub fn compute_kpis(dataset: &Dataset) -> Kpis {
    let total_updates = dataset
        .states
        .iter()
        .map(|record| record.total_bio_updates)
        .sum();

    let latest_month = dataset
        .states
        .iter()
        .map(|record| record.date)
        .max()
        .map(|date| date.format(LATEST_MONTH_FORMAT).to_string());

    Kpis {
        total_updates,
        total_warnings: dataset.warnings.len(),
        latest_month,
    }
}

/// Groups digits in threes: `3300` becomes `3,300`.
pub fn thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);

    for (index, digit) in digits.chars().enumerate() {
        if index > 0 && (digits.len() - index) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }
    grouped
}
