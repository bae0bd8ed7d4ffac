//! CSV ingest and normalization.
//!
//! This module turns a four-column sales CSV into a validated `Dataset`:
//!
//! - **Strict schema** for the four logical columns (missing column -> `InvalidInputError`)
//! - **Row-level coercion** (a bad cell drops its row; the drop is recorded, never raised)
//! - **Order preserving** (surviving rows keep their input order)
//! - **Separation of concerns**: no KPI logic here

use std::collections::HashMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use csv::StringRecord;
use tracing::{debug, info};

use crate::domain::{ColumnAliases, ColumnNames, Dataset, Record};
use crate::error::{InvalidInputError, MissingColumn, PrepareError};

/// Cell contents treated as "no value", on top of the empty string.
///
/// These are the markers spreadsheet and dataframe exports commonly write for
/// missing data.
const MISSING_MARKERS: [&str; 12] = [
    "#N/A", "#NA", "N/A", "n/a", "NA", "<NA>", "NULL", "null", "NaN", "nan", "-nan", "None",
];

/// A row dropped during preparation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowError {
    /// 1-based line number in the source (the header is line 1).
    pub line: usize,
    pub message: String,
}

/// Preparer output: the dataset plus a report of what was dropped.
#[derive(Debug, Clone)]
pub struct PreparedData {
    pub dataset: Dataset,
    pub row_errors: Vec<RowError>,
    pub rows_read: usize,
    pub rows_used: usize,
}

impl PreparedData {
    /// Wrap an already-validated dataset (e.g. the built-in sample).
    pub fn from_dataset(dataset: Dataset) -> Self {
        let n = dataset.len();
        Self {
            dataset,
            row_errors: Vec::new(),
            rows_read: n,
            rows_used: n,
        }
    }

    pub fn rows_dropped(&self) -> usize {
        self.rows_read - self.rows_used
    }
}

/// Resolved column positions for the four logical roles.
#[derive(Debug, Clone, Copy)]
struct ColumnIndex {
    period: usize,
    value: usize,
    reference_value: usize,
    change_percent: usize,
}

/// Load and prepare a CSV file.
pub fn load_dataset(path: &Path, aliases: &ColumnAliases) -> Result<PreparedData, PrepareError> {
    let file = File::open(path).map_err(|source| PrepareError::Open {
        path: path.display().to_string(),
        source,
    })?;
    info!(path = %path.display(), "loading sales CSV");
    prepare_from_reader(file, aliases)
}

/// Prepare a dataset from any CSV byte stream.
pub fn prepare_from_reader<R: Read>(input: R, aliases: &ColumnAliases) -> Result<PreparedData, PrepareError> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(input);

    let headers = reader.headers().map_err(PrepareError::Header)?.clone();
    let (index, columns) = resolve_columns(&headers, aliases)?;

    let mut records = Vec::new();
    let mut row_errors = Vec::new();
    let mut rows_read = 0usize;

    for (idx, result) in reader.records().enumerate() {
        rows_read += 1;
        let fallback_line = idx + 2;

        let record = match result {
            Ok(r) => r,
            Err(e) => {
                let line = e
                    .position()
                    .map(|p| p.line() as usize)
                    .unwrap_or(fallback_line);
                debug!(line, error = %e, "dropping unparseable CSV record");
                row_errors.push(RowError {
                    line,
                    message: format!("CSV parse error: {e}"),
                });
                continue;
            }
        };

        let line = record
            .position()
            .map(|p| p.line() as usize)
            .unwrap_or(fallback_line);

        match parse_row(&record, index, &columns) {
            Ok(row) => records.push(row),
            Err(message) => {
                debug!(line, %message, "dropping incomplete row");
                row_errors.push(RowError { line, message });
            }
        }
    }

    let rows_used = records.len();
    info!(rows_read, rows_used, rows_dropped = rows_read - rows_used, "prepared dataset");

    Ok(PreparedData {
        dataset: Dataset::new(columns, records),
        row_errors,
        rows_read,
        rows_used,
    })
}

fn resolve_columns(
    headers: &StringRecord,
    aliases: &ColumnAliases,
) -> Result<(ColumnIndex, ColumnNames), InvalidInputError> {
    let header_map = build_header_map(headers);
    let mut missing = Vec::new();

    let mut lookup = |role: &'static str, accepted: &[String]| -> Option<(usize, String)> {
        let found = accepted.iter().find_map(|name| {
            header_map
                .get(&normalize_header_name(name))
                .map(|&idx| (idx, clean_header(&headers[idx]).to_string()))
        });
        if found.is_none() {
            missing.push(MissingColumn {
                role,
                accepted: accepted.to_vec(),
            });
        }
        found
    };

    let period = lookup("period", &aliases.period);
    let value = lookup("value", &aliases.value);
    let reference_value = lookup("reference_value", &aliases.reference_value);
    let change_percent = lookup("change_percent", &aliases.change_percent);

    match (period, value, reference_value, change_percent) {
        (Some(p), Some(v), Some(r), Some(c)) => Ok((
            ColumnIndex {
                period: p.0,
                value: v.0,
                reference_value: r.0,
                change_percent: c.0,
            },
            ColumnNames {
                period: p.1,
                value: v.1,
                reference_value: r.1,
                change_percent: c.1,
            },
        )),
        _ => Err(InvalidInputError { missing }),
    }
}

fn build_header_map(headers: &StringRecord) -> HashMap<String, usize> {
    let mut map = HashMap::new();
    for (idx, name) in headers.iter().enumerate() {
        // First occurrence wins for duplicated headers.
        map.entry(normalize_header_name(name)).or_insert(idx);
    }
    map
}

fn clean_header(name: &str) -> &str {
    // Excel and other tools sometimes emit UTF-8 CSVs with a BOM prefix on the
    // first header. If we don't strip it, schema validation will incorrectly
    // report missing columns.
    name.trim().trim_start_matches('\u{feff}').trim()
}

fn normalize_header_name(name: &str) -> String {
    clean_header(name).to_lowercase()
}

fn parse_row(record: &StringRecord, index: ColumnIndex, columns: &ColumnNames) -> Result<Record, String> {
    let period = get_cell(record, index.period)
        .ok_or_else(|| format!("Missing `{}` value.", columns.period))?;
    let value = parse_number(record, index.value, &columns.value)?;
    let reference_value = parse_number(record, index.reference_value, &columns.reference_value)?;
    let change_percent = parse_number(record, index.change_percent, &columns.change_percent)?;

    Ok(Record {
        period: period.to_string(),
        value,
        reference_value,
        change_percent,
    })
}

fn parse_number(record: &StringRecord, idx: usize, name: &str) -> Result<f64, String> {
    let raw = get_cell(record, idx).ok_or_else(|| format!("Missing `{name}` value."))?;
    coerce_f64(raw).ok_or_else(|| format!("Non-numeric `{name}` value '{raw}'."))
}

fn get_cell(record: &StringRecord, idx: usize) -> Option<&str> {
    record
        .get(idx)
        .map(str::trim)
        .filter(|s| !s.is_empty() && !is_missing_marker(s))
}

fn is_missing_marker(s: &str) -> bool {
    MISSING_MARKERS.contains(&s)
}

/// Coerce a cell to a finite number; anything else is "missing".
pub fn coerce_f64(s: &str) -> Option<f64> {
    let v = s.trim().parse::<f64>().ok()?;
    if v.is_finite() { Some(v) } else { None }
}
