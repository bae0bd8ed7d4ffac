//! Read/write chart JSON files.
//!
//! Chart JSON is the portable form of the dashboard's display configuration:
//! theme + palette, both chart descriptions and the KPI summary. Any charting
//! front-end can draw from it without re-reading the CSV.
//!
//! The schema is defined by `chart::DashboardChart`.

use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

use tracing::info;

use crate::chart::DashboardChart;
use crate::error::{ChartReadError, ExportError};

/// Write a chart JSON file.
pub fn write_chart_json(path: &Path, chart: &DashboardChart) -> Result<(), ExportError> {
    let file = File::create(path).map_err(|source| ExportError::Create {
        path: path.display().to_string(),
        source,
    })?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, chart)?;
    writer.flush()?;
    info!(path = %path.display(), "wrote chart JSON");
    Ok(())
}

/// Read a chart JSON file.
pub fn read_chart_json(path: &Path) -> Result<DashboardChart, ChartReadError> {
    let file = File::open(path).map_err(|source| ChartReadError::Open {
        path: path.display().to_string(),
        source,
    })?;
    serde_json::from_reader(BufReader::new(file)).map_err(|source| ChartReadError::Parse {
        path: path.display().to_string(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chart::build_dashboard_chart;
    use crate::data::sample_dataset;
    use crate::domain::DashboardConfig;
    use crate::kpi::compute_kpis;

    #[test]
    fn chart_json_reads_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("chart.json");

        let ds = sample_dataset();
        let chart = build_dashboard_chart(&ds, &compute_kpis(&ds), &DashboardConfig::default());
        write_chart_json(&path, &chart).unwrap();

        let back = read_chart_json(&path).unwrap();
        assert_eq!(back.line.categories, chart.line.categories);
        assert_eq!(back.bar.colors, chart.bar.colors);
        assert_eq!(back.kpis.peak, chart.kpis.peak);
        assert_eq!(back.kpis.total_value, chart.kpis.total_value);
    }

    #[test]
    fn missing_file_is_an_open_error() {
        let err = read_chart_json(Path::new("/nonexistent/chart.json")).unwrap_err();
        assert!(matches!(err, ChartReadError::Open { .. }));
    }

    #[test]
    fn malformed_file_is_a_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("chart.json");
        std::fs::write(&path, "{\"theme\": ").unwrap();

        let err = read_chart_json(&path).unwrap_err();
        assert!(matches!(err, ChartReadError::Parse { .. }));
    }
}
