//! Thermocouple tree extraction.

use std::path::Path;

use df_data::{Table, TreeSeries, group_trees, read_csv};

use crate::error::{AppError, AppResult};
use crate::project_service;

/// Peak reading of one tree channel.
#[derive(Debug, Clone)]
pub struct ChannelPeak {
    pub column: String,
    pub height_cm: Option<f64>,
    pub peak_c: Option<f64>,
}

/// Series of every configured thermocouple tree for a test.
///
/// Trees are looked up in the test's tree sources, falling back to the
/// door-frame log when none are listed. Each tree comes from the first sheet
/// holding all of its columns.
pub fn load_tree_series(project_path: &Path, test_id: &str) -> AppResult<Vec<TreeSeries>> {
    let project = project_service::load_project(project_path)?;
    let test = project_service::get_test(&project, test_id)?;
    let base = df_project::project_dir(project_path);

    let mut sources = test.resolved_tree_sources(base);
    if sources.is_empty() {
        sources.push(test.resolved_source(base));
    }
    let tables = sources
        .iter()
        .map(read_csv)
        .collect::<Result<Vec<Table>, _>>()?;

    let mut series = Vec::with_capacity(project.thermocouple_trees.len());
    for tree in &project.thermocouple_trees {
        let table = tables
            .iter()
            .find(|t| tree.columns.iter().all(|c| t.has_column(c)))
            .ok_or_else(|| {
                AppError::Data(format!(
                    "Thermocouple tree '{}' not found in any source of test {}",
                    tree.name, test_id
                ))
            })?;
        series.extend(group_trees(table, std::slice::from_ref(tree))?);
    }
    Ok(series)
}

/// Peak temperature per channel, ignoring missing samples.
pub fn channel_peaks(tree: &TreeSeries) -> Vec<ChannelPeak> {
    tree.channels
        .iter()
        .map(|ch| ChannelPeak {
            column: ch.column.clone(),
            height_cm: ch.height_cm,
            peak_c: ch
                .values
                .iter()
                .copied()
                .filter(|v| v.is_finite())
                .reduce(f64::max),
        })
        .collect()
}
