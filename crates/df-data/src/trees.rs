//! Thermocouple tree grouping.
//!
//! A logger sheet holds several vertical thermocouple trees side by side.
//! A tree is a named list of columns; each column name carries the
//! thermocouple height in centimetres, either as a leading number
//! (`"120mm"`, `"120 cm"`) or, failing that, as a dotted suffix
//! (`"TDD.120"`).

use crate::error::{DataError, DataResult};
use crate::table::Table;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThermocoupleTree {
    pub name: String,
    pub columns: Vec<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TreeChannel {
    pub column: String,
    pub height_cm: Option<f64>,
    pub values: Vec<f64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TreeSeries {
    pub name: String,
    pub time_s: Vec<f64>,
    pub channels: Vec<TreeChannel>,
}

/// Height in cm encoded in a thermocouple column name.
pub fn parse_height_cm(column: &str) -> Option<f64> {
    let column = column.trim();
    let digits: String = column
        .chars()
        .take_while(|c| c.is_ascii_digit() || *c == '.')
        .collect();
    if let Ok(v) = digits.trim_end_matches('.').parse::<f64>() {
        return Some(v);
    }
    column
        .rsplit_once('.')
        .and_then(|(_, suffix)| suffix.trim().parse::<f64>().ok())
}

/// Extract the channels of each tree from `table`.
pub fn group_trees(table: &Table, trees: &[ThermocoupleTree]) -> DataResult<Vec<TreeSeries>> {
    trees
        .iter()
        .map(|tree| {
            let channels = tree
                .columns
                .iter()
                .map(|column| {
                    let values = table.column(column)?.to_vec();
                    Ok(TreeChannel {
                        column: column.clone(),
                        height_cm: parse_height_cm(column),
                        values,
                    })
                })
                .collect::<Result<Vec<_>, DataError>>()?;
            Ok(TreeSeries {
                name: tree.name.clone(),
                time_s: table.time().to_vec(),
                channels,
            })
        })
        .collect()
}
