use serde::Serialize;
use tracing::debug;

use crate::config::{Aggregation, DashboardConfig};
use crate::filter::FilterState;
use crate::models::{Dataset, DistrictBar, Kpis, TrendPoint};
use crate::risk;
use crate::summary;
use crate::table::{self, WarningTable};
use crate::trend;

/// Everything one render of the dashboard shows, independent of how it is drawn.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ViewModel {
    pub title: String,
    pub filter: FilterState,
    pub kpis: Kpis,
    pub trend: Vec<TrendPoint>,
    pub warnings: WarningTable,
    pub aggregation: Aggregation,
    pub districts: Vec<DistrictBar>,
}

/// One full recomputation for the requested state. Pure: same inputs, same view.
pub fn render(dataset: &Dataset, requested: Option<&str>, config: &DashboardConfig) -> ViewModel {
    let filter = FilterState::from_records(&dataset.states).select(requested);
    let kpis = summary::compute_kpis(dataset);

    let (trend, districts) = match filter.selected() {
        Some(state) => (
            trend::trend_for_state(&dataset.states, state),
            risk::rank_districts(&dataset.districts, state, config.aggregation, config.top_n),
        ),
        None => (Vec::new(), Vec::new()),
    };
    let warnings = table::warning_table(&dataset.warnings);

    debug!(
        state = filter.selected().unwrap_or("-"),
        trend_points = trend.len(),
        districts = districts.len(),
        "rendered view"
    );

    ViewModel {
        title: config.page_title.clone(),
        filter,
        kpis,
        trend,
        warnings,
        aggregation: config.aggregation,
        districts,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loader;
    use chrono::NaiveDate;
    use tempfile::TempDir;

    fn fixture() -> (TempDir, Dataset, DashboardConfig) {
        let dir = TempDir::new().unwrap();
        let inputs = loader::tests::write_fixture(dir.path());
        let dataset = loader::load(&inputs).unwrap();
        let config = DashboardConfig::new(dir.path());
        (dir, dataset, config)
    }

    #[test]
    fn selecting_mh_slices_trend_but_not_kpis() {
        let (_dir, dataset, config) = fixture();
        let view = render(&dataset, Some("MH"), &config);

        assert_eq!(view.filter.selected(), Some("MH"));
        assert_eq!(
            view.trend
                .iter()
                .map(|p| (p.date, p.total_bio_updates))
                .collect::<Vec<_>>(),
            vec![
                (NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(), 1000),
                (NaiveDate::from_ymd_opt(2024, 2, 1).unwrap(), 1500),
            ]
        );
        assert_eq!(view.kpis.total_updates, 3300);
        assert_eq!(view.kpis.total_warnings, 5);
        assert_eq!(view.districts[0].district, "Pune");
    }

    #[test]
    fn kpis_do_not_depend_on_selection() {
        let (_dir, dataset, config) = fixture();
        let mh = render(&dataset, Some("MH"), &config);
        let ka = render(&dataset, Some("KA"), &config);
        assert_eq!(mh.kpis, ka.kpis);
        assert_eq!(mh.warnings, ka.warnings);
    }

    #[test]
    fn reselecting_is_idempotent() {
        let (_dir, dataset, config) = fixture();
        let first = render(&dataset, Some("KA"), &config);
        let second = render(&dataset, Some("KA"), &config);
        assert_eq!(first, second);
    }

    #[test]
    fn default_selection_is_first_alphabetically() {
        let (_dir, dataset, config) = fixture();
        let view = render(&dataset, None, &config);
        assert_eq!(view.filter.selected(), Some("KA"));
        assert_eq!(view.districts.len(), 1);
    }

    #[test]
    fn count_policy_flows_through() {
        let (_dir, dataset, config) = fixture();
        let config = config.with_aggregation(Aggregation::WarningCount);
        let view = render(&dataset, Some("MH"), &config);
        assert_eq!(view.aggregation, Aggregation::WarningCount);
        assert_eq!(view.districts[0].value, 2.0);
    }

    #[test]
    fn empty_dataset_renders_without_selection() {
        let config = DashboardConfig::new(".");
        let view = render(&Dataset::default(), Some("MH"), &config);
        assert_eq!(view.filter.selected(), None);
        assert!(view.trend.is_empty());
        assert!(view.districts.is_empty());
    }
}
