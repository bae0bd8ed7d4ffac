//! Export the current dataset back to CSV.
//!
//! The export mirrors the input format: the same four headers, one row per
//! retained record, UTF-8 with a byte-order mark so spreadsheet tools pick the
//! right encoding. Re-reading an export with the preparer yields an equal
//! dataset.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use chrono::{DateTime, Local};
use tracing::info;

use crate::domain::Dataset;
use crate::error::ExportError;

/// UTF-8 byte-order mark written ahead of the header row.
pub const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Serialize a dataset to CSV bytes (BOM included).
///
/// With `include_index` a leading unnamed column carries the 0-based row number.
pub fn dataset_to_csv_bytes(dataset: &Dataset, include_index: bool) -> Result<Vec<u8>, ExportError> {
    let mut buf = UTF8_BOM.to_vec();
    {
        let mut writer = csv::Writer::from_writer(&mut buf);

        let columns = dataset.columns().as_array();
        if include_index {
            writer.write_record(std::iter::once("").chain(columns))?;
        } else {
            writer.write_record(columns)?;
        }

        for (idx, r) in dataset.records().iter().enumerate() {
            let fields = [
                r.period.clone(),
                r.value.to_string(),
                r.reference_value.to_string(),
                r.change_percent.to_string(),
            ];
            if include_index {
                writer.write_record(std::iter::once(idx.to_string()).chain(fields))?;
            } else {
                writer.write_record(&fields)?;
            }
        }

        writer.flush()?;
    }
    Ok(buf)
}

/// Write the dataset CSV to `path`.
pub fn write_dataset_csv(path: &Path, dataset: &Dataset, include_index: bool) -> Result<(), ExportError> {
    let bytes = dataset_to_csv_bytes(dataset, include_index)?;
    let mut file = File::create(path).map_err(|source| ExportError::Create {
        path: path.display().to_string(),
        source,
    })?;
    file.write_all(&bytes)?;
    info!(path = %path.display(), rows = dataset.len(), include_index, "exported dataset CSV");
    Ok(())
}

/// File name used when exporting without an explicit target.
pub fn default_export_file_name(now: DateTime<Local>) -> String {
    format!("sales_data_{}.csv", now.format("%Y%m%d_%H%M%S"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ColumnAliases, ColumnNames, Record};
    use crate::io::ingest::prepare_from_reader;
    use chrono::TimeZone;

    fn dataset() -> Dataset {
        Dataset::new(
            ColumnNames::default(),
            vec![
                Record::new("2024-01", 12_000_000.0, 10_500_000.0, 14.3),
                Record::new("2024-03", 11_000_000.0, 12_800_000.0, -14.1),
            ],
        )
    }

    #[test]
    fn writes_bom_and_plain_numbers() {
        let bytes = dataset_to_csv_bytes(&dataset(), false).unwrap();
        assert!(bytes.starts_with(UTF8_BOM));
        let text = std::str::from_utf8(&bytes[UTF8_BOM.len()..]).unwrap();
        assert_eq!(
            text,
            "period,value,reference_value,change_percent\n\
             2024-01,12000000,10500000,14.3\n\
             2024-03,11000000,12800000,-14.1\n"
        );
    }

    #[test]
    fn index_column_is_unnamed_and_zero_based() {
        let bytes = dataset_to_csv_bytes(&dataset(), true).unwrap();
        let text = std::str::from_utf8(&bytes[UTF8_BOM.len()..]).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], ",period,value,reference_value,change_percent");
        assert_eq!(lines[2], "1,2024-03,11000000,12800000,-14.1");
    }

    #[test]
    fn export_round_trips_through_preparer() {
        let original = dataset();
        for include_index in [false, true] {
            let bytes = dataset_to_csv_bytes(&original, include_index).unwrap();
            let back = prepare_from_reader(bytes.as_slice(), &ColumnAliases::default()).unwrap();
            assert_eq!(back.dataset, original);
        }
    }

    #[test]
    fn default_name_has_timestamp() {
        let now = Local.with_ymd_and_hms(2024, 12, 31, 23, 5, 9).unwrap();
        assert_eq!(default_export_file_name(now), "sales_data_20241231_230509.csv");
    }
}
