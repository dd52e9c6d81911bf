//! df-data: sensor log tables and ingestion.
//!
//! Provides:
//! - `Table`, a columnar time-series table keyed on `testing_time`
//! - CSV ingestion of exported logger sheets
//! - Thermocouple tree grouping

pub mod error;
pub mod source;
pub mod table;
pub mod trees;

pub use error::{DataError, DataResult};
pub use source::{SourceOptions, read_csv, read_csv_at, read_csv_bytes};
pub use table::{TIME_COLUMN, Table};
pub use trees::{ThermocoupleTree, TreeChannel, TreeSeries, group_trees, parse_height_cm};
