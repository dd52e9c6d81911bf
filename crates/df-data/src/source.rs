//! CSV ingestion of exported logger sheets.

use crate::error::{DataError, DataResult};
use crate::table::{TIME_COLUMN, Table};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Where a test's log lives and how to read it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceOptions {
    pub path: PathBuf,
    /// Column holding the sample time.
    #[serde(default = "default_time_column")]
    pub time_column: String,
    /// Factor converting the time column to seconds (60 for minutes).
    #[serde(default = "default_time_scale")]
    pub time_scale: f64,
    /// Leading rows to ignore before the header row.
    #[serde(default)]
    pub skip_rows: usize,
    #[serde(default = "default_delimiter")]
    pub delimiter: char,
}

fn default_time_column() -> String {
    TIME_COLUMN.to_string()
}

fn default_time_scale() -> f64 {
    1.0
}

fn default_delimiter() -> char {
    ','
}

impl SourceOptions {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            time_column: default_time_column(),
            time_scale: default_time_scale(),
            skip_rows: 0,
            delimiter: default_delimiter(),
        }
    }
}

/// Read the file named by `options.path`.
pub fn read_csv(options: &SourceOptions) -> DataResult<Table> {
    read_csv_at(&options.path, options)
}

/// Read `path` using the parsing options (the path in `options` is ignored).
pub fn read_csv_at(path: &Path, options: &SourceOptions) -> DataResult<Table> {
    let bytes = std::fs::read(path)?;
    read_csv_bytes(&bytes, options)
}

/// Parse CSV content. Empty or non-numeric cells become `NaN`.
pub fn read_csv_bytes(bytes: &[u8], options: &SourceOptions) -> DataResult<Table> {
    if !options.delimiter.is_ascii() {
        return Err(DataError::Malformed {
            what: format!("delimiter {:?} (must be ASCII)", options.delimiter),
        });
    }

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .delimiter(options.delimiter as u8)
        .from_reader(bytes);

    let mut records = reader.records().skip(options.skip_rows);
    let header = match records.next() {
        Some(record) => record?,
        None => {
            return Err(DataError::Malformed {
                what: "CSV: no header row".to_string(),
            });
        }
    };
    let names: Vec<String> = header
        .iter()
        .map(|h| {
            let h = h.trim();
            if h == options.time_column {
                TIME_COLUMN.to_string()
            } else {
                h.to_string()
            }
        })
        .collect();

    if !names.iter().any(|n| n == TIME_COLUMN) {
        return Err(DataError::MissingColumn {
            name: options.time_column.clone(),
        });
    }

    let mut columns: Vec<Vec<f64>> = vec![Vec::new(); names.len()];
    for record in records {
        let record = record?;
        if record.iter().all(|cell| cell.trim().is_empty()) {
            continue;
        }
        for (idx, column) in columns.iter_mut().enumerate() {
            let value = record
                .get(idx)
                .and_then(|cell| cell.trim().parse::<f64>().ok())
                .unwrap_or(f64::NAN);
            column.push(value);
        }
    }

    let mut table = Table::from_columns(names, columns)?;
    if options.time_scale != 1.0 {
        let scaled: Vec<f64> = table.time().iter().map(|t| t * options.time_scale).collect();
        table.insert_column(TIME_COLUMN, scaled)?;
    }

    debug!(
        rows = table.len(),
        columns = table.names().len(),
        "parsed CSV source"
    );
    Ok(table)
}
