//! Shared domain types.
//!
//! These types are intentionally kept lightweight and serializable so they can be:
//!
//! - produced by the CSV preparer and the built-in sample
//! - consumed by the KPI calculator and the front-ends
//! - exported back to CSV or JSON

use std::path::PathBuf;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// Placeholder period label used by empty-dataset KPIs.
pub const EMPTY_PERIOD: &str = "-";

/// Default currency suffix appended by the formatter.
pub const DEFAULT_CURRENCY_UNIT: &str = "원";

/// Default bar width (percent of the category slot).
pub const DEFAULT_BAR_WIDTH_PCT: u8 = 60;

/// Accepted bar width range, in percent.
pub const BAR_WIDTH_RANGE: (u8, u8) = (20, 100);

/// One month of sales.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    /// Period label as given, e.g. `2024-01`.
    pub period: String,
    /// Sales for the period.
    pub value: f64,
    /// Sales for the same period one year earlier.
    pub reference_value: f64,
    /// Year-over-year change in percent.
    pub change_percent: f64,
}

impl Record {
    pub fn new(period: impl Into<String>, value: f64, reference_value: f64, change_percent: f64) -> Self {
        Self {
            period: period.into(),
            value,
            reference_value,
            change_percent,
        }
    }
}

/// Header text for each logical column role.
///
/// A dataset remembers the headers it was read under so an export writes the
/// same four columns back.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnNames {
    pub period: String,
    pub value: String,
    pub reference_value: String,
    pub change_percent: String,
}

impl Default for ColumnNames {
    fn default() -> Self {
        Self {
            period: "period".to_string(),
            value: "value".to_string(),
            reference_value: "reference_value".to_string(),
            change_percent: "change_percent".to_string(),
        }
    }
}

impl ColumnNames {
    pub fn as_array(&self) -> [&str; 4] {
        [
            &self.period,
            &self.value,
            &self.reference_value,
            &self.change_percent,
        ]
    }
}

/// Validated, ordered sales records.
///
/// Constructed once per load and never mutated afterwards. Duplicate period
/// labels are kept as separate rows.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Dataset {
    columns: ColumnNames,
    records: Vec<Record>,
}

impl Dataset {
    pub fn new(columns: ColumnNames, records: Vec<Record>) -> Self {
        Self { columns, records }
    }

    pub fn columns(&self) -> &ColumnNames {
        &self.columns
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn periods(&self) -> Vec<String> {
        self.records.iter().map(|r| r.period.clone()).collect()
    }

    pub fn values(&self) -> Vec<f64> {
        self.records.iter().map(|r| r.value).collect()
    }

    pub fn reference_values(&self) -> Vec<f64> {
        self.records.iter().map(|r| r.reference_value).collect()
    }

    pub fn change_percents(&self) -> Vec<f64> {
        self.records.iter().map(|r| r.change_percent).collect()
    }
}

/// A period label paired with its sales value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PeriodValue {
    pub period: String,
    pub value: f64,
}

impl PeriodValue {
    /// `("-", 0)`, reported for peak/trough of an empty dataset.
    pub fn empty() -> Self {
        Self {
            period: EMPTY_PERIOD.to_string(),
            value: 0.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrendDirection {
    Rising,
    Falling,
}

impl TrendDirection {
    pub fn label(self) -> &'static str {
        match self {
            TrendDirection::Rising => "rising trend",
            TrendDirection::Falling => "falling trend",
        }
    }
}

/// Aggregates derived from a [`Dataset`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KpiSummary {
    pub total_value: f64,
    pub average_change_percent: f64,
    pub peak: PeriodValue,
    pub trough: PeriodValue,
    pub trend_direction: TrendDirection,
}

/// Colour theme for charts and the TUI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    Dark,
    Light,
}

impl Theme {
    pub fn toggle(self) -> Self {
        match self {
            Theme::Dark => Theme::Light,
            Theme::Light => Theme::Dark,
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            Theme::Dark => "Dark",
            Theme::Light => "Light",
        }
    }
}

/// Header aliases accepted for each logical column, checked in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnAliases {
    pub period: Vec<String>,
    pub value: Vec<String>,
    pub reference_value: Vec<String>,
    pub change_percent: Vec<String>,
}

impl Default for ColumnAliases {
    fn default() -> Self {
        fn owned(names: &[&str]) -> Vec<String> {
            names.iter().map(|s| s.to_string()).collect()
        }
        Self {
            period: owned(&["period", "month", "월"]),
            value: owned(&["value", "sales", "revenue", "매출액"]),
            reference_value: owned(&["reference_value", "last_year", "prior_year", "전년동월"]),
            change_percent: owned(&["change_percent", "yoy", "change", "증감률"]),
        }
    }
}

impl ColumnAliases {
    /// Put user-supplied header names ahead of the defaults.
    pub fn with_overrides(
        mut self,
        period: Option<&str>,
        value: Option<&str>,
        reference_value: Option<&str>,
        change_percent: Option<&str>,
    ) -> Self {
        fn prepend(list: &mut Vec<String>, name: Option<&str>) {
            if let Some(name) = name {
                list.insert(0, name.to_string());
            }
        }
        prepend(&mut self.period, period);
        prepend(&mut self.value, value);
        prepend(&mut self.reference_value, reference_value);
        prepend(&mut self.change_percent, change_percent);
        self
    }
}

/// Session-scoped dashboard settings.
///
/// Everything a front-end may change at runtime lives here and is passed
/// explicitly into the pipeline and renderers.
#[derive(Debug, Clone)]
pub struct DashboardConfig {
    /// CSV to load; `None` uses the built-in sample.
    pub input: Option<PathBuf>,
    pub theme: Theme,
    pub smooth_line: bool,
    pub bar_width_pct: u8,
    pub show_index: bool,
    pub currency_unit: String,
    pub columns: ColumnAliases,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            input: None,
            theme: Theme::Dark,
            smooth_line: true,
            bar_width_pct: DEFAULT_BAR_WIDTH_PCT,
            show_index: false,
            currency_unit: DEFAULT_CURRENCY_UNIT.to_string(),
            columns: ColumnAliases::default(),
        }
    }
}

impl DashboardConfig {
    /// Step the bar width by `delta` percent, clamped to [`BAR_WIDTH_RANGE`].
    pub fn adjust_bar_width(&mut self, delta: i16) {
        let (lo, hi) = BAR_WIDTH_RANGE;
        let next = (self.bar_width_pct as i16 + delta).clamp(lo as i16, hi as i16);
        self.bar_width_pct = next as u8;
    }

    pub fn source_label(&self) -> String {
        match &self.input {
            Some(path) => path.display().to_string(),
            None => "built-in sample".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bar_width_clamps_to_range() {
        let mut config = DashboardConfig::default();
        config.adjust_bar_width(100);
        assert_eq!(config.bar_width_pct, 100);
        config.adjust_bar_width(-5);
        assert_eq!(config.bar_width_pct, 95);
        config.adjust_bar_width(-200);
        assert_eq!(config.bar_width_pct, 20);
    }

    #[test]
    fn overrides_take_priority() {
        let aliases = ColumnAliases::default().with_overrides(Some("Monat"), None, None, Some("delta"));
        assert_eq!(aliases.period[0], "Monat");
        assert_eq!(aliases.value[0], "value");
        assert_eq!(aliases.change_percent[0], "delta");
        assert!(aliases.change_percent.contains(&"증감률".to_string()));
    }
}
