use std::path::Path;
use std::time::Instant;

use serde::de::DeserializeOwned;
use tracing::{debug, info};

use crate::config::InputPaths;
use crate::error::{DashboardError, Result};
use crate::models::Dataset;

/// Fails with every missing path at once, before anything is read.
pub fn ensure_inputs(inputs: &InputPaths) -> Result<()> {
    let missing: Vec<_> = inputs
        .all()
        .into_iter()
        .filter(|path| !path.exists())
        .map(Path::to_path_buf)
        .collect();

    if missing.is_empty() {
        Ok(())
    } else {
        Err(DashboardError::MissingInputFile { paths: missing })
    }
}

pub fn load(inputs: &InputPaths) -> Result<Dataset> {
    ensure_inputs(inputs)?;
    let started = Instant::now();

    let dataset = Dataset {
        states: read_table(&inputs.state)?,
        districts: read_table(&inputs.district)?,
        warnings: read_table(&inputs.warning)?,
    };

    info!(
        states = dataset.states.len(),
        districts = dataset.districts.len(),
        warnings = dataset.warnings.len(),
        elapsed_ms = started.elapsed().as_millis() as u64,
        "loaded dashboard inputs"
    );
    Ok(dataset)
}

fn read_table<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>> {
    let csv_error = |source: csv::Error| DashboardError::Csv {
        path: path.to_path_buf(),
        source,
    };

    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_path(path)
        .map_err(csv_error)?;
    let mut rows = Vec::new();

    for result in reader.deserialize::<T>() {
        rows.push(result.map_err(csv_error)?);
    }

    debug!(path = %path.display(), rows = rows.len(), "read table");
    Ok(rows)
}
