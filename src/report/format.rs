//! Formatted terminal output.
//!
//! We keep formatting code in one place so:
//! - the preparer and KPI code stay free of presentation concerns
//! - output changes are localized (important for snapshot tests)
//!
//! Formatters never fail: a value that cannot be shown renders as `-`.

use crate::domain::{DashboardConfig, Dataset, KpiSummary};
use crate::io::ingest::PreparedData;

/// Shown in place of a value that cannot be formatted.
pub const PLACEHOLDER: &str = "-";

/// Largest magnitude rendered as currency (beyond this, integer conversion loses meaning).
const MAX_CURRENCY_ABS: f64 = 9.0e18;

/// How many dropped rows the run summary lists individually.
const MAX_LISTED_ROW_ERRORS: usize = 10;

/// Truncate toward zero and group thousands, e.g. `36,500,000원`.
pub fn format_currency(value: f64, unit: &str) -> String {
    match format_grouped(value) {
        Some(s) => format!("{s}{unit}"),
        None => PLACEHOLDER.to_string(),
    }
}

/// One decimal place with a `%` suffix, e.g. `6.9%`.
pub fn format_percent(value: f64) -> String {
    if !value.is_finite() {
        return PLACEHOLDER.to_string();
    }
    format!("{value:.1}%")
}

/// Integer part of `value` with `,` thousands separators.
fn format_grouped(value: f64) -> Option<String> {
    if !value.is_finite() || value.abs() >= MAX_CURRENCY_ABS {
        return None;
    }
    let n = value.trunc() as i64;
    let digits = n.unsigned_abs().to_string();

    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    if n < 0 {
        out.push('-');
    }
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    Some(out)
}

/// One headline metric.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KpiCard {
    pub title: &'static str,
    pub value: String,
    /// Secondary line (trend, help text).
    pub detail: Option<String>,
}

/// The four dashboard cards: total, average change, best month, worst month.
pub fn kpi_cards(summary: &KpiSummary, unit: &str) -> [KpiCard; 4] {
    [
        KpiCard {
            title: "Total sales",
            value: format_currency(summary.total_value, unit),
            detail: Some("sum over the shown period".to_string()),
        },
        KpiCard {
            title: "Avg YoY change",
            value: format_percent(summary.average_change_percent),
            detail: Some(summary.trend_direction.label().to_string()),
        },
        KpiCard {
            title: "Best month",
            value: format!(
                "{} · {}",
                summary.peak.period,
                format_currency(summary.peak.value, unit)
            ),
            detail: None,
        },
        KpiCard {
            title: "Worst month",
            value: format!(
                "{} · {}",
                summary.trough.period,
                format_currency(summary.trough.value, unit)
            ),
            detail: None,
        },
    ]
}

pub fn format_kpi_cards(summary: &KpiSummary, unit: &str) -> String {
    let mut out = String::new();
    for card in kpi_cards(summary, unit) {
        out.push_str(&format!("{:<15} {}", format!("{}:", card.title), card.value));
        if let Some(detail) = &card.detail {
            out.push_str(&format!(" ({detail})"));
        }
        out.push('\n');
    }
    out
}

/// Aligned text table of the dataset.
pub fn format_data_table(dataset: &Dataset, show_index: bool) -> String {
    let cols = dataset.columns();
    let mut out = String::new();

    let index_head = if show_index { format!("{:>4} ", "") } else { String::new() };
    out.push_str(
        format!(
            "{index_head}{:<12} {:>16} {:>16} {:>10}",
            truncate(&cols.period, 12),
            truncate(&cols.value, 16),
            truncate(&cols.reference_value, 16),
            truncate(&cols.change_percent, 10),
        )
        .trim_end(),
    );
    out.push('\n');

    let index_rule = if show_index { format!("{:-<4} ", "") } else { String::new() };
    out.push_str(&format!("{index_rule}{:-<12} {:-<16} {:-<16} {:-<10}\n", "", "", "", ""));

    for (idx, r) in dataset.records().iter().enumerate() {
        let index_cell = if show_index { format!("{idx:>4} ") } else { String::new() };
        out.push_str(
            format!(
                "{index_cell}{:<12} {:>16} {:>16} {:>10}",
                truncate(&r.period, 12),
                format_grouped(r.value).unwrap_or_else(|| PLACEHOLDER.to_string()),
                format_grouped(r.reference_value).unwrap_or_else(|| PLACEHOLDER.to_string()),
                format!("{:.1}", r.change_percent),
            )
            .trim_end(),
        );
        out.push('\n');
    }

    out
}

/// Header, source, row accounting and KPI cards for one run.
pub fn format_run_summary(prepared: &PreparedData, summary: &KpiSummary, config: &DashboardConfig) -> String {
    let mut out = String::new();

    out.push_str("=== salesdash - Monthly Sales Dashboard ===\n");
    out.push_str(&format!("Source: {}\n", config.source_label()));
    out.push_str(&format!(
        "Rows: read={} | used={} | dropped={}\n",
        prepared.rows_read,
        prepared.rows_used,
        prepared.rows_dropped()
    ));
    for err in prepared.row_errors.iter().take(MAX_LISTED_ROW_ERRORS) {
        out.push_str(&format!("  (dropped line {}) {}\n", err.line, err.message));
    }
    if prepared.row_errors.len() > MAX_LISTED_ROW_ERRORS {
        out.push_str(&format!(
            "  ... and {} more\n",
            prepared.row_errors.len() - MAX_LISTED_ROW_ERRORS
        ));
    }

    out.push_str("\nKPIs:\n");
    out.push_str(&format_kpi_cards(summary, &config.currency_unit));

    out
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    let mut out = String::new();
    for (i, ch) in s.chars().enumerate() {
        if i + 1 >= max {
            break;
        }
        out.push(ch);
    }
    out.push('.');
    out
}
