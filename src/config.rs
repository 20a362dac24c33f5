use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

pub const STATE_FILE: &str = "monthly_bio_state.csv";
pub const DISTRICT_FILE: &str = "anomaly_scored_data.csv";
pub const WARNING_FILE: &str = "top_early_warnings.csv";

pub const DEFAULT_TITLE: &str = "AST-EWIS Dashboard";
pub const DEFAULT_TOP_N: usize = 10;

/// How flagged district rows are folded into one bar per district.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
pub enum Aggregation {
    /// Mean severity score, colour coded by risk level.
    #[default]
    #[serde(rename = "mean")]
    #[value(name = "mean")]
    MeanSeverity,
    /// Number of flagged district-months.
    #[serde(rename = "count")]
    #[value(name = "count")]
    WarningCount,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Layout {
    #[default]
    Wide,
    Centered,
}

impl Layout {
    pub fn max_width(self) -> &'static str {
        match self {
            Layout::Wide => "none",
            Layout::Centered => "960px",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputPaths {
    pub state: PathBuf,
    pub district: PathBuf,
    pub warning: PathBuf,
}

impl InputPaths {
    pub fn in_dir(data_dir: &Path) -> Self {
        Self {
            state: data_dir.join(STATE_FILE),
            district: data_dir.join(DISTRICT_FILE),
            warning: data_dir.join(WARNING_FILE),
        }
    }

    pub fn all(&self) -> [&Path; 3] {
        [self.state.as_path(), self.district.as_path(), self.warning.as_path()]
    }
}

/// Everything a render needs besides the selection, fixed at startup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DashboardConfig {
    pub page_title: String,
    pub layout: Layout,
    pub inputs: InputPaths,
    pub aggregation: Aggregation,
    pub top_n: usize,
}

impl DashboardConfig {
    pub fn new(data_dir: impl AsRef<Path>) -> Self {
        Self {
            page_title: DEFAULT_TITLE.to_string(),
            layout: Layout::default(),
            inputs: InputPaths::in_dir(data_dir.as_ref()),
            aggregation: Aggregation::default(),
            top_n: DEFAULT_TOP_N,
        }
    }

    pub fn with_aggregation(mut self, aggregation: Aggregation) -> Self {
        self.aggregation = aggregation;
        self
    }

    pub fn with_top_n(mut self, top_n: usize) -> Self {
        self.top_n = top_n.max(1);
        self
    }
}
