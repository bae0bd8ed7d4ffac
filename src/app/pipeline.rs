//! Shared dashboard pipeline used by both CLI and TUI front-ends.
//!
//! Keeping this in one place avoids duplicating the core workflow:
//! load (CSV or sample) -> prepare -> KPIs
//!
//! The CLI and the TUI can then focus on presentation (printing vs widgets).

use tracing::info;

use crate::chart::{build_dashboard_chart, DashboardChart};
use crate::data::sample_dataset;
use crate::domain::{DashboardConfig, Dataset, KpiSummary};
use crate::error::PrepareError;
use crate::io::ingest::{load_dataset, PreparedData};
use crate::kpi::compute_kpis;

/// All computed outputs of one load.
#[derive(Debug, Clone)]
pub struct DashboardRun {
    pub prepared: PreparedData,
    pub kpis: KpiSummary,
}

impl DashboardRun {
    pub fn dataset(&self) -> &Dataset {
        &self.prepared.dataset
    }

    /// Chart configuration for the current settings.
    ///
    /// Theme, smoothing and bar width only affect presentation, so front-ends
    /// call this again after a settings change instead of reloading.
    pub fn chart(&self, config: &DashboardConfig) -> DashboardChart {
        build_dashboard_chart(self.dataset(), &self.kpis, config)
    }
}

/// Load the configured input and compute its KPIs.
pub fn run_dashboard(config: &DashboardConfig) -> Result<DashboardRun, PrepareError> {
    let prepared = load_prepared(config)?;
    Ok(run_with_prepared(prepared))
}

/// Read the configured CSV, or fall back to the built-in sample.
pub fn load_prepared(config: &DashboardConfig) -> Result<PreparedData, PrepareError> {
    match &config.input {
        Some(path) => load_dataset(path, &config.columns),
        None => {
            info!("no input file given; using the built-in sample");
            Ok(PreparedData::from_dataset(sample_dataset()))
        }
    }
}

/// Compute KPIs for an already-prepared dataset.
pub fn run_with_prepared(prepared: PreparedData) -> DashboardRun {
    let kpis = compute_kpis(&prepared.dataset);
    info!(
        rows = prepared.rows_used,
        total = kpis.total_value,
        avg_change = kpis.average_change_percent,
        "computed KPIs"
    );
    DashboardRun { prepared, kpis }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::TrendDirection;

    #[test]
    fn sample_run_without_input() {
        let run = run_dashboard(&DashboardConfig::default()).unwrap();
        assert_eq!(run.dataset().len(), 12);
        assert_eq!(run.kpis.total_value, 212_500_000.0);
        assert_eq!(run.kpis.trend_direction, TrendDirection::Rising);
    }

    #[test]
    fn missing_file_is_an_open_error() {
        let config = DashboardConfig {
            input: Some("/nonexistent/sales.csv".into()),
            ..DashboardConfig::default()
        };
        assert!(matches!(run_dashboard(&config), Err(PrepareError::Open { .. })));
    }

    #[test]
    fn chart_follows_settings_without_reload() {
        let run = run_dashboard(&DashboardConfig::default()).unwrap();
        let mut config = DashboardConfig::default();
        config.bar_width_pct = 100;
        assert_eq!(run.chart(&config).bar.bar_gap, 0.0);
    }
}
