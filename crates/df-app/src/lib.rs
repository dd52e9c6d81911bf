//! Shared application service layer for doorflow.
//!
//! Frontends go through this crate for project management, test processing
//! with a content-addressed run cache, and result querying.

pub mod error;
pub mod progress;
pub mod project_service;
pub mod query;
pub mod run_service;
pub mod trees;

pub use error::{AppError, AppResult};
pub use progress::{RunProgressEvent, RunStage};
pub use project_service::{
    TestSummary, get_test, list_tests, load_project, save_project, validate_project,
};
pub use query::{RunSummary, extract_series, get_run_summary, list_variables};
pub use run_service::{
    RunOptions, RunRequest, RunResponse, RunTimingSummary, batch_outcome, ensure_run,
    ensure_run_with_progress, list_runs, load_run, output_to_records, run_all,
};
pub use trees::{ChannelPeak, channel_peaks, load_tree_series};
