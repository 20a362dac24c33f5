use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, DashboardError>;

/// Shown instead of the dashboard whenever an input table is missing.
pub const MISSING_DATA_MESSAGE: &str = "Processed data files not found. Please run notebooks first.";

#[derive(Debug, Error)]
pub enum DashboardError {
    #[error("{} (missing: {})", MISSING_DATA_MESSAGE, display_paths(.paths))]
    MissingInputFile { paths: Vec<PathBuf> },

    #[error("failed to read {}: {source}", .path.display())]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },
}

impl DashboardError {
    pub fn is_missing_input(&self) -> bool {
        matches!(self, DashboardError::MissingInputFile { .. })
    }
}

fn display_paths(paths: &[PathBuf]) -> String {
    paths
        .iter()
        .map(|path| path.display().to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_input_lists_every_path() {
        let err = DashboardError::MissingInputFile {
            paths: vec![PathBuf::from("a.csv"), PathBuf::from("b.csv")],
        };
        let message = err.to_string();
        assert!(message.starts_with(MISSING_DATA_MESSAGE));
        assert!(message.contains("a.csv, b.csv"));
        assert!(err.is_missing_input());
    }
}
