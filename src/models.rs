use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::parse;

#[derive(Debug, Clone, Deserialize)]
pub struct StateMonthlyRecord {
    pub state: String,
    #[serde(deserialize_with = "parse::date")]
    pub date: NaiveDate,
    #[serde(deserialize_with = "parse::update_count")]
    pub total_bio_updates: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DistrictAnomalyRecord {
    pub state: String,
    pub district: String,
    #[serde(deserialize_with = "parse::date")]
    pub date: NaiveDate,
    pub severity_score: f64,
    #[serde(deserialize_with = "parse::flag")]
    pub early_warning: bool,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct WarningRecord {
    pub state: String,
    pub district: String,
    #[serde(deserialize_with = "parse::date")]
    pub date: NaiveDate,
    pub total_bio_updates: f64,
    pub avg_updates: f64,
    pub upper_threshold: f64,
    pub severity_score: f64,
}

/// The three input tables of one render.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    pub states: Vec<StateMonthlyRecord>,
    pub districts: Vec<DistrictAnomalyRecord>,
    pub warnings: Vec<WarningRecord>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Kpis {
    pub total_updates: u64,
    pub total_warnings: usize,
    pub latest_month: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TrendPoint {
    pub date: NaiveDate,
    pub total_bio_updates: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DistrictBar {
    pub district: String,
    pub value: f64,
    /// Only set when bars are ranked by mean severity.
    pub risk: Option<RiskLevel>,
    /// Most recent flagged month for the district.
    pub latest_warning: NaiveDate,
}
