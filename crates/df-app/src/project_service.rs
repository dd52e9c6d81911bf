//! Project loading, saving, validation, and introspection.

use df_project::{Project, TestDef};
use std::path::{Path, PathBuf};

use crate::error::{AppError, AppResult};

/// Summary of a test for listing.
#[derive(Debug, Clone)]
pub struct TestSummary {
    pub id: String,
    pub description: Option<String>,
    /// Door-frame log, resolved against the project directory.
    pub source: PathBuf,
    pub tree_source_count: usize,
}

/// Load a project file (YAML, or JSON by extension), migrating old versions.
pub fn load_project(path: &Path) -> AppResult<Project> {
    Ok(df_project::load(path)?)
}

/// Save a project as YAML.
pub fn save_project(path: &Path, project: &Project) -> AppResult<()> {
    Ok(df_project::save_yaml(path, project)?)
}

pub fn validate_project(project: &Project) -> AppResult<()> {
    df_project::validate_project(project).map_err(|e| AppError::Validation(e.to_string()))
}

/// List all tests in the project.
pub fn list_tests(project: &Project, project_path: &Path) -> Vec<TestSummary> {
    let base = df_project::project_dir(project_path);
    project
        .tests
        .iter()
        .map(|test| TestSummary {
            id: test.id.clone(),
            description: test.description.clone(),
            source: test.resolved_source(base).path,
            tree_source_count: test.tree_sources.len(),
        })
        .collect()
}

/// Get a specific test by ID.
pub fn get_test<'a>(project: &'a Project, test_id: &str) -> AppResult<&'a TestDef> {
    project
        .test(test_id)
        .ok_or_else(|| AppError::TestNotFound(test_id.to_string()))
}
