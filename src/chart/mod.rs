//! Chart display configuration.
//!
//! Everything a renderer needs to draw the two dashboard charts is computed here
//! as plain data: categories, series, colours, bounds, bar gap. Renderers (the
//! Plotters TUI widgets, the ASCII plots, the JSON export) only draw what they
//! are given, so theme and sign-based colouring are decided in one place and
//! can be tested without a terminal.

use serde::{Deserialize, Serialize};

use crate::domain::{DashboardConfig, Dataset, KpiSummary, Theme};

pub mod palette;
pub mod spline;

pub use palette::{Palette, Rgba};
pub use spline::smooth_series;

/// Interpolation samples per segment when drawing a spline line.
pub const SPLINE_SAMPLES: usize = 12;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LineShape {
    Spline,
    Linear,
}

impl LineShape {
    pub fn from_smooth(smooth: bool) -> Self {
        if smooth { LineShape::Spline } else { LineShape::Linear }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineSeriesSpec {
    pub name: String,
    pub color: Rgba,
    pub dashed: bool,
    /// Fill under the line, if any.
    pub area: Option<Rgba>,
    pub values: Vec<f64>,
}

impl LineSeriesSpec {
    /// Points at category positions `0..n`, interpolated when `shape` is a spline.
    pub fn points(&self, shape: LineShape) -> Vec<(f64, f64)> {
        let raw: Vec<(f64, f64)> = self
            .values
            .iter()
            .enumerate()
            .map(|(i, &v)| (i as f64, v))
            .collect();
        match shape {
            LineShape::Linear => raw,
            LineShape::Spline => smooth_series(&raw, SPLINE_SAMPLES),
        }
    }
}

/// Sales vs prior-year line chart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineChartSpec {
    pub title: String,
    pub categories: Vec<String>,
    pub series: Vec<LineSeriesSpec>,
    pub shape: LineShape,
    pub x_axis_title: String,
    pub y_axis_title: String,
    pub y_bounds: [f64; 2],
}

/// Year-over-year change bar chart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BarChartSpec {
    pub title: String,
    pub categories: Vec<String>,
    pub values: Vec<f64>,
    /// One colour per bar, by sign of the value.
    pub colors: Vec<Rgba>,
    pub bar_width_pct: u8,
    /// Fraction of each category slot left empty (0 = touching bars).
    pub bar_gap: f64,
    pub x_axis_title: String,
    pub y_axis_title: String,
    pub y_bounds: [f64; 2],
}

/// Display configuration for the whole dashboard.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardChart {
    pub theme: Theme,
    pub palette: Palette,
    pub line: LineChartSpec,
    pub bar: BarChartSpec,
    pub kpis: KpiSummary,
}

/// Map a dataset, its KPIs and the session settings to chart configuration.
pub fn build_dashboard_chart(dataset: &Dataset, kpis: &KpiSummary, config: &DashboardConfig) -> DashboardChart {
    let palette = Palette::for_theme(config.theme);
    DashboardChart {
        theme: config.theme,
        line: build_line_chart(dataset, &palette, config),
        bar: build_bar_chart(dataset, &palette, config),
        palette,
        kpis: kpis.clone(),
    }
}

pub fn build_line_chart(dataset: &Dataset, palette: &Palette, config: &DashboardConfig) -> LineChartSpec {
    let values = dataset.values();
    let reference = dataset.reference_values();
    let y_bounds = padded_bounds(values.iter().chain(reference.iter()).copied(), false);

    LineChartSpec {
        title: "Sales vs last year".to_string(),
        categories: dataset.periods(),
        series: vec![
            LineSeriesSpec {
                name: "Sales".to_string(),
                color: palette.accent,
                dashed: false,
                area: Some(palette.area_fill),
                values,
            },
            LineSeriesSpec {
                name: "Last year".to_string(),
                color: palette.accent_secondary,
                dashed: true,
                area: None,
                values: reference,
            },
        ],
        shape: LineShape::from_smooth(config.smooth_line),
        x_axis_title: "Month".to_string(),
        y_axis_title: format!("Amount ({})", config.currency_unit),
        y_bounds,
    }
}

pub fn build_bar_chart(dataset: &Dataset, palette: &Palette, config: &DashboardConfig) -> BarChartSpec {
    let values = dataset.change_percents();
    let colors = values.iter().map(|&v| palette.for_change(v)).collect();
    let y_bounds = padded_bounds(values.iter().copied(), true);

    BarChartSpec {
        title: "YoY change (%)".to_string(),
        categories: dataset.periods(),
        values,
        colors,
        bar_width_pct: config.bar_width_pct,
        bar_gap: bar_gap(config.bar_width_pct),
        x_axis_title: "Month".to_string(),
        y_axis_title: "Change (%)".to_string(),
        y_bounds,
    }
}

/// Gap between bars for a bar width in percent: wider bars, smaller gap.
///
/// `(100 - width) / 200`, clamped to `[0, 0.5]`.
pub fn bar_gap(bar_width_pct: u8) -> f64 {
    ((100.0 - bar_width_pct as f64) / 200.0).clamp(0.0, 0.5)
}

/// Min/max of `values` padded by 5 % of the span.
///
/// With `include_zero` the range always contains 0 (bar baselines).
pub fn padded_bounds(values: impl Iterator<Item = f64>, include_zero: bool) -> [f64; 2] {
    let (mut lo, mut hi) = values
        .filter(|v| v.is_finite())
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| (lo.min(v), hi.max(v)));

    if include_zero {
        lo = lo.min(0.0);
        hi = hi.max(0.0);
    }
    if !lo.is_finite() || !hi.is_finite() {
        return [0.0, 1.0];
    }
    if hi <= lo {
        let pad = (lo.abs() * 0.05).max(1.0);
        return [lo - pad, hi + pad];
    }

    let pad = (hi - lo) * 0.05;
    [lo - pad, hi + pad]
}
