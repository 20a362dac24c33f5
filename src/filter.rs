use std::collections::BTreeSet;

use serde::Serialize;
use tracing::warn;

use crate::models::StateMonthlyRecord;

/// The state selector: every state in the monthly table plus the current pick.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FilterState {
    pub options: Vec<String>,
    pub selected: Option<String>,
}

impl FilterState {
    pub fn from_records(records: &[StateMonthlyRecord]) -> Self {
        let options: Vec<String> = records
            .iter()
            .map(|record| record.state.clone())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();
        let selected = options.first().cloned();

        Self { options, selected }
    }

    /// Applies a selection. Unknown or absent names fall back to the first
    /// state alphabetically.
    pub fn select(mut self, requested: Option<&str>) -> Self {
        let requested = requested.map(str::trim).filter(|name| !name.is_empty());

        self.selected = match requested {
            Some(name) if self.options.iter().any(|option| option == name) => {
                Some(name.to_string())
            }
            Some(name) => {
                warn!(state = name, "unknown state requested, using default");
                self.options.first().cloned()
            }
            None => self.options.first().cloned(),
        };
        self
    }

    pub fn selected(&self) -> Option<&str> {
        self.selected.as_deref()
    }
}
