//! KPI computation.
//!
//! A single pass over the dataset produces the total, the mean YoY change, the
//! best and worst months and the trend direction. Empty datasets yield zeros
//! and `("-", 0)` placeholders instead of failing.

use crate::domain::{Dataset, KpiSummary, PeriodValue, TrendDirection};

/// Compute the KPI summary for a dataset.
pub fn compute_kpis(dataset: &Dataset) -> KpiSummary {
    let records = dataset.records();

    let total_value: f64 = records.iter().map(|r| r.value).sum();
    let average_change_percent = if records.is_empty() {
        0.0
    } else {
        records.iter().map(|r| r.change_percent).sum::<f64>() / records.len() as f64
    };

    // Strict comparisons keep the first occurrence on ties.
    let mut peak: Option<usize> = None;
    let mut trough: Option<usize> = None;
    for (i, r) in records.iter().enumerate() {
        if peak.is_none_or(|p| r.value > records[p].value) {
            peak = Some(i);
        }
        if trough.is_none_or(|t| r.value < records[t].value) {
            trough = Some(i);
        }
    }

    let to_period_value = |idx: Option<usize>| {
        idx.map(|i| PeriodValue {
            period: records[i].period.clone(),
            value: records[i].value,
        })
        .unwrap_or_else(PeriodValue::empty)
    };

    KpiSummary {
        total_value,
        average_change_percent,
        peak: to_period_value(peak),
        trough: to_period_value(trough),
        trend_direction: trend_for(average_change_percent),
    }
}

/// Zero counts as rising.
pub fn trend_for(average_change_percent: f64) -> TrendDirection {
    if average_change_percent >= 0.0 {
        TrendDirection::Rising
    } else {
        TrendDirection::Falling
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ColumnNames, Record};

    fn dataset(rows: &[(&str, f64, f64, f64)]) -> Dataset {
        Dataset::new(
            ColumnNames::default(),
            rows.iter()
                .map(|&(p, v, r, c)| Record::new(p, v, r, c))
                .collect(),
        )
    }

    #[test]
    fn three_month_scenario() {
        let ds = dataset(&[
            ("2024-01", 12_000_000.0, 10_500_000.0, 14.3),
            ("2024-02", 13_500_000.0, 11_200_000.0, 20.5),
            ("2024-03", 11_000_000.0, 12_800_000.0, -14.1),
        ]);
        let k = compute_kpis(&ds);
        assert_eq!(k.total_value, 36_500_000.0);
        assert!((k.average_change_percent - 6.9).abs() < 1e-9);
        assert_eq!(k.peak, PeriodValue { period: "2024-02".to_string(), value: 13_500_000.0 });
        assert_eq!(k.trough, PeriodValue { period: "2024-03".to_string(), value: 11_000_000.0 });
        assert_eq!(k.trend_direction, TrendDirection::Rising);
    }

    #[test]
    fn empty_dataset_uses_placeholders() {
        let k = compute_kpis(&Dataset::default());
        assert_eq!(k.total_value, 0.0);
        assert_eq!(k.average_change_percent, 0.0);
        assert_eq!(k.peak, PeriodValue::empty());
        assert_eq!(k.trough, PeriodValue::empty());
        assert_eq!(k.trend_direction, TrendDirection::Rising);
    }

    #[test]
    fn ties_pick_first_occurrence() {
        let ds = dataset(&[
            ("a", 5.0, 0.0, 0.0),
            ("b", 9.0, 0.0, 0.0),
            ("c", 9.0, 0.0, 0.0),
            ("d", 1.0, 0.0, 0.0),
            ("e", 1.0, 0.0, 0.0),
        ]);
        let k = compute_kpis(&ds);
        assert_eq!(k.peak.period, "b");
        assert_eq!(k.trough.period, "d");
    }

    #[test]
    fn negative_average_is_falling_and_zero_is_rising() {
        let ds = dataset(&[("a", 1.0, 1.0, -3.0), ("b", 1.0, 1.0, 1.0)]);
        assert_eq!(compute_kpis(&ds).trend_direction, TrendDirection::Falling);
        assert_eq!(trend_for(0.0), TrendDirection::Rising);
        assert_eq!(trend_for(-0.0), TrendDirection::Rising);
    }

    #[test]
    fn peak_and_trough_bound_every_record() {
        let ds = crate::data::sample_dataset();
        let k = compute_kpis(&ds);
        for r in ds.records() {
            assert!(k.peak.value >= r.value);
            assert!(k.trough.value <= r.value);
        }
        assert_eq!(k.peak.period, "2024-12");
        assert_eq!(k.trough.period, "2024-03");
    }

    #[test]
    fn single_record_is_both_peak_and_trough() {
        let ds = dataset(&[("2024-07", 20.0, 17.0, 17.6)]);
        let k = compute_kpis(&ds);
        assert_eq!(k.peak, k.trough);
        assert_eq!(k.total_value, 20.0);
    }
}
