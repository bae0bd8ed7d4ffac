//! The 12-month 2024 sample shown when no CSV is supplied.

use crate::domain::{ColumnNames, Dataset, Record};

const SAMPLE_PERIODS: [&str; 12] = [
    "2024-01", "2024-02", "2024-03", "2024-04", "2024-05", "2024-06", "2024-07", "2024-08", "2024-09",
    "2024-10", "2024-11", "2024-12",
];

const SAMPLE_SALES: [f64; 12] = [
    12_000_000.0,
    13_500_000.0,
    11_000_000.0,
    18_000_000.0,
    21_000_000.0,
    19_500_000.0,
    20_000_000.0,
    20_500_000.0,
    18_500_000.0,
    17_500_000.0,
    19_000_000.0,
    22_000_000.0,
];

const SAMPLE_LAST_YEAR: [f64; 12] = [
    10_500_000.0,
    11_200_000.0,
    12_800_000.0,
    15_200_000.0,
    18_500_000.0,
    18_000_000.0,
    17_000_000.0,
    16_000_000.0,
    17_500_000.0,
    16_500_000.0,
    17_200_000.0,
    19_000_000.0,
];

const SAMPLE_YOY: [f64; 12] = [14.3, 20.5, -14.1, 18.4, 13.5, 8.3, 17.6, 28.1, 5.7, 6.1, 10.5, 15.8];

/// The demo dataset, under the default column names.
pub fn sample_dataset() -> Dataset {
    let records = SAMPLE_PERIODS
        .iter()
        .zip(SAMPLE_SALES)
        .zip(SAMPLE_LAST_YEAR)
        .zip(SAMPLE_YOY)
        .map(|(((period, value), reference), change)| Record::new(*period, value, reference, change))
        .collect();
    Dataset::new(ColumnNames::default(), records)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sample_is_complete_and_chronological() {
        let ds = sample_dataset();
        assert_eq!(ds.len(), 12);
        let periods = ds.periods();
        let mut sorted = periods.clone();
        sorted.sort();
        assert_eq!(periods, sorted);
        assert_eq!(ds.records()[2], Record::new("2024-03", 11_000_000.0, 12_800_000.0, -14.1));
    }
}
