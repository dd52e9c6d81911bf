//! Columnar time-series table.

use crate::error::{DataError, DataResult};

/// Name of the mandatory time column, in seconds from ignition.
pub const TIME_COLUMN: &str = "testing_time";

/// Named `f64` columns of equal length. Missing samples are `NaN`.
///
/// The time column is always present and always first.
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    names: Vec<String>,
    columns: Vec<Vec<f64>>,
}

impl Table {
    /// Create a table holding only the time column.
    pub fn new(time: Vec<f64>) -> Self {
        Self {
            names: vec![TIME_COLUMN.to_string()],
            columns: vec![time],
        }
    }

    pub fn from_columns(names: Vec<String>, columns: Vec<Vec<f64>>) -> DataResult<Self> {
        if names.len() != columns.len() {
            return Err(DataError::Malformed {
                what: format!("table: {} names for {} columns", names.len(), columns.len()),
            });
        }
        let time_idx = names
            .iter()
            .position(|n| n == TIME_COLUMN)
            .ok_or_else(|| DataError::MissingColumn {
                name: TIME_COLUMN.to_string(),
            })?;

        let mut pairs: Vec<(String, Vec<f64>)> = names.into_iter().zip(columns).collect();
        let time = pairs.remove(time_idx);
        let mut table = Self::new(time.1);
        for (name, values) in pairs {
            if table.has_column(&name) {
                return Err(DataError::DuplicateColumn { name });
            }
            table.insert_column(&name, values)?;
        }
        Ok(table)
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.columns[0].len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn time(&self) -> &[f64] {
        &self.columns[0]
    }

    fn index_of(&self, name: &str) -> Option<usize> {
        self.names.iter().position(|n| n == name)
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.index_of(name).is_some()
    }

    pub fn column(&self, name: &str) -> DataResult<&[f64]> {
        self.index_of(name)
            .map(|idx| self.columns[idx].as_slice())
            .ok_or_else(|| DataError::MissingColumn {
                name: name.to_string(),
            })
    }

    /// Insert a column, replacing any existing column of the same name.
    pub fn insert_column(&mut self, name: &str, values: Vec<f64>) -> DataResult<()> {
        let expected = self.len();
        if values.len() != expected {
            return Err(DataError::LengthMismatch {
                name: name.to_string(),
                len: values.len(),
                expected,
            });
        }
        match self.index_of(name) {
            Some(idx) => self.columns[idx] = values,
            None => {
                self.names.push(name.to_string());
                self.columns.push(values);
            }
        }
        Ok(())
    }

    pub fn remove_column(&mut self, name: &str) -> DataResult<Vec<f64>> {
        if name == TIME_COLUMN {
            return Err(DataError::ProtectedColumn {
                name: name.to_string(),
            });
        }
        let idx = self.index_of(name).ok_or_else(|| DataError::MissingColumn {
            name: name.to_string(),
        })?;
        self.names.remove(idx);
        Ok(self.columns.remove(idx))
    }

    /// Names of the columns accepted by `predicate`, in table order.
    pub fn columns_matching<F>(&self, predicate: F) -> Vec<String>
    where
        F: Fn(&str) -> bool,
    {
        self.names
            .iter()
            .filter(|n| predicate(n))
            .cloned()
            .collect()
    }

    /// Rows recorded before ignition (`testing_time < 0`).
    pub fn prestart_mask(&self) -> Vec<bool> {
        self.time().iter().map(|t| *t < 0.0).collect()
    }

    /// Keep the rows where `mask` is set.
    pub fn select_rows(&self, mask: &[bool]) -> DataResult<Table> {
        if mask.len() != self.len() {
            return Err(DataError::LengthMismatch {
                name: "row mask".to_string(),
                len: mask.len(),
                expected: self.len(),
            });
        }
        let columns = self
            .columns
            .iter()
            .map(|col| {
                col.iter()
                    .zip(mask)
                    .filter(|(_, keep)| **keep)
                    .map(|(v, _)| *v)
                    .collect()
            })
            .collect();
        Ok(Table {
            names: self.names.clone(),
            columns,
        })
    }

    /// Rows with `start_s <= testing_time < end_s`.
    pub fn time_window(&self, start_s: f64, end_s: f64) -> Table {
        let mask: Vec<bool> = self
            .time()
            .iter()
            .map(|t| *t >= start_s && *t < end_s)
            .collect();
        let columns = self
            .columns
            .iter()
            .map(|col| {
                col.iter()
                    .zip(&mask)
                    .filter(|(_, keep)| **keep)
                    .map(|(v, _)| *v)
                    .collect()
            })
            .collect();
        Table {
            names: self.names.clone(),
            columns,
        }
    }

    /// Drop every row where any of `columns` (or the time column) is not
    /// finite. Returns the number of rows removed.
    pub fn drop_missing(&mut self, columns: &[&str]) -> DataResult<usize> {
        let mut indices = vec![0usize];
        for name in columns {
            let idx = self.index_of(name).ok_or_else(|| DataError::MissingColumn {
                name: name.to_string(),
            })?;
            indices.push(idx);
        }

        let keep: Vec<bool> = (0..self.len())
            .map(|row| indices.iter().all(|&c| self.columns[c][row].is_finite()))
            .collect();
        let removed = keep.iter().filter(|k| !**k).count();
        if removed > 0 {
            *self = self.select_rows(&keep)?;
        }
        Ok(removed)
    }
}
