//! Error types for the df-app service layer.

use std::path::PathBuf;

/// Application error wrapping the backend crates, shared by every frontend.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Project error: {0}")]
    Project(String),

    #[error("Project validation failed: {0}")]
    Validation(String),

    #[error("Test not found: {0}")]
    TestNotFound(String),

    #[error("Failed to read source file: {path}")]
    SourceRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Data error: {0}")]
    Data(String),

    #[error("Flow analysis failed: {0}")]
    Flow(String),

    #[error("Results error: {0}")]
    Results(String),

    #[error("Run not found: {0}")]
    RunNotFound(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("{failed} of {total} test(s) failed: {}", failed_ids.join(", "))]
    BatchFailed {
        failed: usize,
        total: usize,
        failed_ids: Vec<String>,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for df-app operations.
pub type AppResult<T> = Result<T, AppError>;

impl From<df_project::ProjectError> for AppError {
    fn from(err: df_project::ProjectError) -> Self {
        match err {
            df_project::ProjectError::Validation(e) => AppError::Validation(e.to_string()),
            other => AppError::Project(other.to_string()),
        }
    }
}

impl From<df_data::DataError> for AppError {
    fn from(err: df_data::DataError) -> Self {
        AppError::Data(err.to_string())
    }
}

impl From<df_flow::FlowError> for AppError {
    fn from(err: df_flow::FlowError) -> Self {
        AppError::Flow(err.to_string())
    }
}

impl From<df_results::ResultsError> for AppError {
    fn from(err: df_results::ResultsError) -> Self {
        match err {
            df_results::ResultsError::RunNotFound { run_id } => AppError::RunNotFound(run_id),
            other => AppError::Results(other.to_string()),
        }
    }
}
