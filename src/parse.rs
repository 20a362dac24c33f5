//! Field parsers for the upstream CSV exports.
//!
//! Dates, 0/1 flags and counts arrive in several pandas spellings; each
//! parser accepts all of them and rejects anything else.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::de::{self, Deserialize, Deserializer};

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d"];
const DATETIME_FORMATS: &[&str] = &["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S%.f"];

pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();

    for format in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(raw, format) {
            return Some(date);
        }
    }
    for format in DATETIME_FORMATS {
        if let Ok(stamp) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(stamp.date());
        }
    }
    if let Ok(stamp) = DateTime::parse_from_rfc3339(raw) {
        return Some(stamp.date_naive());
    }

    // Year-month only, pinned to the first of the month.
    NaiveDate::parse_from_str(&format!("{raw}-01"), "%Y-%m-%d").ok()
}

pub fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "1.0" | "true" => Some(true),
        "0" | "0.0" | "false" => Some(false),
        _ => None,
    }
}

pub fn parse_update_count(raw: &str) -> Option<u64> {
    let raw = raw.trim();
    if let Ok(value) = raw.parse::<u64>() {
        return Some(value);
    }

    let value = raw.parse::<f64>().ok()?;
    if value.is_finite() && value >= 0.0 && value.fract() == 0.0 {
        Some(value as u64)
    } else {
        None
    }
}

pub fn date<'de, D>(deserializer: D) -> Result<NaiveDate, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_date(&raw).ok_or_else(|| de::Error::custom(format!("unrecognized date: {raw:?}")))
}

pub fn flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_flag(&raw).ok_or_else(|| de::Error::custom(format!("expected 0/1 flag, got {raw:?}")))
}

pub fn update_count<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_update_count(&raw)
        .ok_or_else(|| de::Error::custom(format!("expected a non-negative count, got {raw:?}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn dates_accept_common_export_formats() {
        assert_eq!(parse_date("2024-01-31"), Some(ymd(2024, 1, 31)));
        assert_eq!(parse_date("2024/01/31"), Some(ymd(2024, 1, 31)));
        assert_eq!(parse_date("2024-01-31 00:00:00"), Some(ymd(2024, 1, 31)));
        assert_eq!(parse_date("2024-01-31T12:30:00"), Some(ymd(2024, 1, 31)));
        assert_eq!(parse_date("2024-01-31T12:30:00+05:30"), Some(ymd(2024, 1, 31)));
        assert_eq!(parse_date(" 2024-02 "), Some(ymd(2024, 2, 1)));
    }

    #[test]
    fn garbage_dates_are_rejected() {
        assert_eq!(parse_date("last tuesday"), None);
        assert_eq!(parse_date("2024-13-01"), None);
        assert_eq!(parse_date(""), None);
    }

    #[test]
    fn flags_follow_pandas_spellings() {
        assert_eq!(parse_flag("1"), Some(true));
        assert_eq!(parse_flag("1.0"), Some(true));
        assert_eq!(parse_flag("True"), Some(true));
        assert_eq!(parse_flag("0"), Some(false));
        assert_eq!(parse_flag("FALSE"), Some(false));
        assert_eq!(parse_flag("2"), None);
    }

    #[test]
    fn update_counts_must_be_whole_and_non_negative() {
        assert_eq!(parse_update_count("1500"), Some(1500));
        assert_eq!(parse_update_count("1500.0"), Some(1500));
        assert_eq!(parse_update_count("-3"), None);
        assert_eq!(parse_update_count("12.5"), None);
        assert_eq!(parse_update_count("n/a"), None);
    }
}
