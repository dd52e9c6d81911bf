//! Run execution and caching service.

use std::path::Path;
use std::time::Instant;

use df_flow::{FlowOutput, MassFlowPipeline};
use df_project::Project;
use df_results::{
    BaselineSnapshot, HeightSnapshot, RunManifest, RunStore, TimeseriesRecord, compute_run_id,
    digest_bytes,
};
use rayon::prelude::*;

use crate::error::{AppError, AppResult};
use crate::progress::{RunProgressEvent, RunStage};
use crate::project_service;

/// Options for processing a test.
#[derive(Debug, Clone)]
pub struct RunOptions {
    pub use_cache: bool,
    pub engine_version: String,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            use_cache: true,
            engine_version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

/// Request to process one test.
pub struct RunRequest<'a> {
    pub project_path: &'a Path,
    pub test_id: &'a str,
    pub options: RunOptions,
}

/// Concise timing and execution summary for a run.
#[derive(Debug, Clone, Default)]
pub struct RunTimingSummary {
    pub read_time_s: f64,
    pub compute_time_s: f64,
    pub save_time_s: f64,
    pub load_cache_time_s: f64,
    pub total_time_s: f64,
}

/// Response from a run execution.
#[derive(Debug, Clone)]
pub struct RunResponse {
    pub run_id: String,
    pub manifest: RunManifest,
    pub loaded_from_cache: bool,
    pub timing: RunTimingSummary,
}

fn emit_progress(
    progress_cb: &mut Option<&mut dyn FnMut(RunProgressEvent)>,
    test_id: &str,
    stage: RunStage,
    started: Instant,
    message: &str,
) {
    if let Some(cb) = progress_cb.as_deref_mut() {
        cb(RunProgressEvent::stage(
            test_id,
            stage,
            started.elapsed().as_secs_f64(),
            Some(message.to_string()),
        ));
    }
}

/// Process a test, or load the cached result of an identical earlier run.
pub fn ensure_run(request: &RunRequest) -> AppResult<RunResponse> {
    ensure_run_with_progress(request, None)
}

/// [`ensure_run`], streaming stage events to `progress_cb`.
pub fn ensure_run_with_progress(
    request: &RunRequest,
    mut progress_cb: Option<&mut dyn FnMut(RunProgressEvent)>,
) -> AppResult<RunResponse> {
    let started = Instant::now();
    let test_id = request.test_id;

    emit_progress(
        &mut progress_cb,
        test_id,
        RunStage::LoadingProject,
        started,
        "Loading project",
    );
    let project = project_service::load_project(request.project_path)?;

    run_loaded(&project, request, progress_cb, started)
}

fn run_loaded(
    project: &Project,
    request: &RunRequest,
    mut progress_cb: Option<&mut dyn FnMut(RunProgressEvent)>,
    started: Instant,
) -> AppResult<RunResponse> {
    let test_id = request.test_id;
    let mut timing = RunTimingSummary::default();
    let test = project_service::get_test(project, test_id)?;
    let source = test.resolved_source(df_project::project_dir(request.project_path));

    emit_progress(
        &mut progress_cb,
        test_id,
        RunStage::ReadingData,
        started,
        "Reading source data",
    );
    let read_started = Instant::now();
    let bytes = std::fs::read(&source.path).map_err(|e| AppError::SourceRead {
        path: source.path.clone(),
        source: e,
    })?;
    timing.read_time_s = read_started.elapsed().as_secs_f64();

    emit_progress(
        &mut progress_cb,
        test_id,
        RunStage::CheckingCache,
        started,
        "Checking run cache",
    );
    let settings = project.flow_config();
    let run_id = compute_run_id(
        test,
        &settings,
        &digest_bytes(&bytes),
        &request.options.engine_version,
    );
    let store = RunStore::for_project(request.project_path)?;

    if request.options.use_cache && store.has_run(&run_id) {
        emit_progress(
            &mut progress_cb,
            test_id,
            RunStage::LoadingCachedResult,
            started,
            "Loading cached run",
        );
        let load_started = Instant::now();
        let manifest = store.load_manifest(&run_id)?;
        timing.load_cache_time_s = load_started.elapsed().as_secs_f64();
        timing.total_time_s = started.elapsed().as_secs_f64();
        tracing::info!("{}: cached run {}", test_id, run_id);

        emit_progress(
            &mut progress_cb,
            test_id,
            RunStage::Completed,
            started,
            "Loaded cached run",
        );
        return Ok(RunResponse {
            run_id,
            manifest,
            loaded_from_cache: true,
            timing,
        });
    }

    emit_progress(
        &mut progress_cb,
        test_id,
        RunStage::Computing,
        started,
        "Computing door mass flow",
    );
    let compute_started = Instant::now();
    let table = df_data::read_csv_bytes(&bytes, &source)?;
    let pipeline = MassFlowPipeline::new(settings)?;
    let output = pipeline.run(&table)?;
    timing.compute_time_s = compute_started.elapsed().as_secs_f64();
    tracing::info!(
        "{}: {} samples processed ({} rows dropped)",
        test_id,
        output.len(),
        output.rows_dropped
    );

    emit_progress(
        &mut progress_cb,
        test_id,
        RunStage::SavingResults,
        started,
        "Saving run output",
    );
    let manifest = build_manifest(&run_id, test_id, &request.options.engine_version, &output);
    let records = output_to_records(&output);
    let save_started = Instant::now();
    store.save_run(&manifest, &records)?;
    timing.save_time_s = save_started.elapsed().as_secs_f64();
    timing.total_time_s = started.elapsed().as_secs_f64();

    emit_progress(
        &mut progress_cb,
        test_id,
        RunStage::Completed,
        started,
        "Run completed",
    );

    Ok(RunResponse {
        run_id,
        manifest,
        loaded_from_cache: false,
        timing,
    })
}

/// Process every test of a project in parallel, keeping project order.
pub fn run_all(
    project_path: &Path,
    options: &RunOptions,
) -> AppResult<Vec<(String, AppResult<RunResponse>)>> {
    let project = project_service::load_project(project_path)?;
    let results = project
        .tests
        .par_iter()
        .map(|test| {
            let request = RunRequest {
                project_path,
                test_id: &test.id,
                options: options.clone(),
            };
            let outcome = run_loaded(&project, &request, None, Instant::now());
            (test.id.clone(), outcome)
        })
        .collect();
    Ok(results)
}

/// Fail when any test of a [`run_all`] batch failed.
pub fn batch_outcome(results: &[(String, AppResult<RunResponse>)]) -> AppResult<()> {
    let failed_ids: Vec<String> = results
        .iter()
        .filter(|(_, outcome)| outcome.is_err())
        .map(|(id, _)| id.clone())
        .collect();
    if failed_ids.is_empty() {
        return Ok(());
    }
    Err(AppError::BatchFailed {
        failed: failed_ids.len(),
        total: results.len(),
        failed_ids,
    })
}

fn build_manifest(
    run_id: &str,
    test_id: &str,
    engine_version: &str,
    output: &FlowOutput,
) -> RunManifest {
    RunManifest {
        run_id: run_id.to_string(),
        test_id: test_id.to_string(),
        timestamp: chrono::Utc::now().to_rfc3339(),
        engine_version: engine_version.to_string(),
        sample_count: output.len(),
        rows_dropped: output.rows_dropped,
        ambient_c: output.ambient_c,
        heights_cm: output.heights_cm(),
        baselines: output
            .baselines
            .iter()
            .map(|b| BaselineSnapshot {
                column: b.column.clone(),
                baseline_v: b.baseline_v,
            })
            .collect(),
    }
}

/// One record per processed sample.
pub fn output_to_records(output: &FlowOutput) -> Vec<TimeseriesRecord> {
    (0..output.len())
        .map(|row| TimeseriesRecord {
            time_s: output.time_s[row],
            heights: output
                .heights
                .iter()
                .map(|h| HeightSnapshot {
                    height_cm: h.height_cm,
                    delta_p_pa: h.delta_p_pa[row],
                    temperature_c: h.temperature_c[row],
                    density_kg_m3: h.density_kg_m3[row],
                    velocity_m_s: h.velocity_m_s[row],
                    mass_flux_kg_s: h.mass_flux_kg_s[row],
                })
                .collect(),
            mass_in_kg_s: output.mass_in_kg_s[row],
            mass_out_kg_s: output.mass_out_kg_s[row],
            mass_average_kg_s: output.mass_average_kg_s[row],
            mass_pyrolysate_kg_s: output.mass_pyrolysate_kg_s[row],
            neutral_plane_m: output.neutral_plane_m[row],
            neutral_plane_smooth_m: output.neutral_plane_smooth_m[row],
            hrr_kw: output.hrr_kw[row],
        })
        .collect()
}

/// Stored runs of a test, most recent first.
pub fn list_runs(project_path: &Path, test_id: &str) -> AppResult<Vec<RunManifest>> {
    let store = RunStore::for_project(project_path)?;
    Ok(store.list_runs(test_id)?)
}

/// Load a specific run.
pub fn load_run(
    project_path: &Path,
    run_id: &str,
) -> AppResult<(RunManifest, Vec<TimeseriesRecord>)> {
    let store = RunStore::for_project(project_path)?;

    let manifest = store.load_manifest(run_id)?;
    let records = store.load_timeseries(run_id)?;

    Ok((manifest, records))
}
