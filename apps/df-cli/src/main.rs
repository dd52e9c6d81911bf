use clap::{Parser, Subcommand};
use df_app::{
    AppResult, RunOptions, RunProgressEvent, RunRequest, RunResponse, project_service, query,
    run_service, trees,
};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "df-cli")]
#[command(about = "DoorFlow CLI - door mass flow from fire test pressure probes", long_about = None)]
struct Cli {
    /// Print stage timings
    #[arg(long, global = true)]
    timing: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate project file syntax and structure
    Validate {
        /// Path to the project YAML file
        project_path: PathBuf,
    },
    /// List tests in a project
    Tests {
        /// Path to the project YAML file
        project_path: PathBuf,
    },
    /// Process one test
    Run {
        /// Path to the project YAML file
        project_path: PathBuf,
        /// Test ID to process
        test_id: String,
        /// Skip cache and force re-run
        #[arg(long)]
        no_cache: bool,
    },
    /// Process every test in a project
    RunAll {
        /// Path to the project YAML file
        project_path: PathBuf,
        /// Skip cache and force re-run
        #[arg(long)]
        no_cache: bool,
    },
    /// List cached runs of a test
    Runs {
        /// Path to the project YAML file
        project_path: PathBuf,
        /// Test ID to list runs for
        test_id: String,
    },
    /// Show details of a cached run
    ShowRun {
        /// Path to the project YAML file
        project_path: PathBuf,
        /// Run ID to display
        run_id: String,
    },
    /// Export time series data from a run
    ExportSeries {
        /// Path to the project YAML file
        project_path: PathBuf,
        /// Run ID
        run_id: String,
        /// Variable name (e.g., mass_in, neutral_plane, velocity)
        variable: String,
        /// Probe height in cm, for per-height variables
        #[arg(long)]
        height: Option<f64>,
        /// Output CSV file path (optional, defaults to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Summarise the thermocouple trees of a test
    Trees {
        /// Path to the project YAML file
        project_path: PathBuf,
        /// Test ID
        test_id: String,
    },
}

fn main() -> AppResult<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    if cli.timing {
        df_core::timing::enable_timing();
    }

    match cli.command {
        Commands::Validate { project_path } => cmd_validate(&project_path),
        Commands::Tests { project_path } => cmd_tests(&project_path),
        Commands::Run {
            project_path,
            test_id,
            no_cache,
        } => cmd_run(&project_path, &test_id, !no_cache),
        Commands::RunAll {
            project_path,
            no_cache,
        } => cmd_run_all(&project_path, !no_cache),
        Commands::Runs {
            project_path,
            test_id,
        } => cmd_runs(&project_path, &test_id),
        Commands::ShowRun {
            project_path,
            run_id,
        } => cmd_show_run(&project_path, &run_id),
        Commands::ExportSeries {
            project_path,
            run_id,
            variable,
            height,
            output,
        } => cmd_export_series(&project_path, &run_id, &variable, height, output.as_deref()),
        Commands::Trees {
            project_path,
            test_id,
        } => cmd_trees(&project_path, &test_id),
    }
}

fn cmd_validate(project_path: &Path) -> AppResult<()> {
    println!("Validating project: {}", project_path.display());
    let project = project_service::load_project(project_path)?;
    project_service::validate_project(&project)?;
    println!("✓ Project is valid");
    Ok(())
}

fn cmd_tests(project_path: &Path) -> AppResult<()> {
    let project = project_service::load_project(project_path)?;
    let tests = project_service::list_tests(&project, project_path);

    if tests.is_empty() {
        println!("No tests found in project");
    } else {
        println!("Tests in project '{}':", project.name);
        for test in tests {
            let description = test.description.as_deref().unwrap_or("");
            println!("  {} - {} {}", test.id, test.source.display(), description);
            if test.tree_source_count > 0 {
                println!("      {} tree logger sheet(s)", test.tree_source_count);
            }
        }
    }
    Ok(())
}

fn cmd_run(project_path: &Path, test_id: &str, use_cache: bool) -> AppResult<()> {
    println!("Processing test: {}", test_id);

    let request = RunRequest {
        project_path,
        test_id,
        options: RunOptions {
            use_cache,
            ..RunOptions::default()
        },
    };

    let mut last_emit = Instant::now();
    let mut last_stage = None;
    let response = run_service::ensure_run_with_progress(
        &request,
        Some(&mut |event| {
            let emit_now =
                last_stage != Some(event.stage) || last_emit.elapsed().as_millis() >= 100;
            if emit_now {
                render_cli_progress(&event);
                last_stage = Some(event.stage);
                last_emit = Instant::now();
            }
        }),
    )?;
    clear_progress_line();

    report_response(&response);
    print_timing_summary(&response.timing);

    let (_manifest, records) = run_service::load_run(project_path, &response.run_id)?;
    let summary = query::get_run_summary(&records)?;
    print_summary(&summary);

    Ok(())
}

fn cmd_run_all(project_path: &Path, use_cache: bool) -> AppResult<()> {
    let options = RunOptions {
        use_cache,
        ..RunOptions::default()
    };
    let results = run_service::run_all(project_path, &options)?;

    for (test_id, outcome) in &results {
        match outcome {
            Ok(response) => {
                print!("{}: ", test_id);
                report_response(response);
            }
            Err(e) => println!("✗ {}: {}", test_id, e),
        }
    }
    run_service::batch_outcome(&results)
}

fn report_response(response: &RunResponse) {
    if response.loaded_from_cache {
        println!("✓ Loaded from cache: {}", response.run_id);
    } else {
        println!("✓ Analysis completed: {}", response.run_id);
    }
}

fn clear_progress_line() {
    print!("\r{}\r", " ".repeat(100));
    let _ = io::stdout().flush();
}

fn render_cli_progress(event: &RunProgressEvent) {
    let spinner = ['|', '/', '-', '\\'];
    let spin_idx = ((event.elapsed_wall_s * 10.0) as usize) % spinner.len();
    let mut line = format!(
        "\r{} {}  elapsed={:.2}s",
        spinner[spin_idx],
        event.stage.label(),
        event.elapsed_wall_s
    );
    if let Some(msg) = &event.message {
        line.push_str(&format!("  {}", msg));
    }
    print!("{}", line);
    let _ = io::stdout().flush();
}

fn print_timing_summary(timing: &df_app::RunTimingSummary) {
    let total = timing.total_time_s.max(1.0e-12);

    println!("\nTiming summary:");
    println!(
        "  Read:    {:.3}s ({:.1}%)",
        timing.read_time_s,
        100.0 * timing.read_time_s / total
    );
    if timing.compute_time_s > 0.0 {
        println!(
            "  Compute: {:.3}s ({:.1}%)",
            timing.compute_time_s,
            100.0 * timing.compute_time_s / total
        );
        println!(
            "  Save:    {:.3}s ({:.1}%)",
            timing.save_time_s,
            100.0 * timing.save_time_s / total
        );
    }
    if timing.load_cache_time_s > 0.0 {
        println!("  Cache load: {:.3}s", timing.load_cache_time_s);
    }
    println!("  Total:   {:.3}s", timing.total_time_s);
}

fn print_summary(summary: &query::RunSummary) {
    println!("  Samples: {}", summary.record_count);
    println!(
        "  Time range: {:.1} - {:.1} s",
        summary.time_range.0, summary.time_range.1
    );
    println!("  Peak inflow:  {:.3} kg/s", summary.peak_inflow_kg_s);
    println!("  Peak outflow: {:.3} kg/s", summary.peak_outflow_kg_s);
    println!("  Peak HRR:     {:.1} kW", summary.peak_hrr_kw);
    match summary.mean_neutral_plane_m {
        Some(z) => println!("  Mean neutral plane: {:.2} m", z),
        None => println!("  Mean neutral plane: none"),
    }
}

fn cmd_runs(project_path: &Path, test_id: &str) -> AppResult<()> {
    let runs = run_service::list_runs(project_path, test_id)?;

    if runs.is_empty() {
        println!("No cached runs found for test: {}", test_id);
    } else {
        println!("Cached runs for test '{}':", test_id);
        for manifest in runs {
            println!(
                "  {} ({}, {} samples)",
                manifest.run_id, manifest.timestamp, manifest.sample_count
            );
        }
    }
    Ok(())
}

fn cmd_show_run(project_path: &Path, run_id: &str) -> AppResult<()> {
    println!("Loading run: {}", run_id);

    let (manifest, records) = run_service::load_run(project_path, run_id)?;
    let summary = query::get_run_summary(&records)?;

    println!("\nRun Summary:");
    println!("  Test: {}", manifest.test_id);
    println!("  Created: {}", manifest.timestamp);
    println!("  Engine: {}", manifest.engine_version);
    println!("  Ambient: {:.1} °C", manifest.ambient_c);
    println!("  Rows dropped: {}", manifest.rows_dropped);
    print_summary(&summary);

    println!("\nProbe heights (cm):");
    let heights: Vec<String> = summary.heights_cm.iter().map(|h| format!("{}", h)).collect();
    println!("  {}", heights.join(", "));

    if !manifest.baselines.is_empty() {
        println!("\nPressure baselines (V):");
        for b in &manifest.baselines {
            println!("  {:<10} {:.4}", b.column, b.baseline_v);
        }
    }

    println!("\nVariables:");
    println!("  door:       {}", query::DOOR_VARIABLES.join(", "));
    println!("  per height: {}", query::HEIGHT_VARIABLES.join(", "));

    Ok(())
}

fn cmd_export_series(
    project_path: &Path,
    run_id: &str,
    variable: &str,
    height: Option<f64>,
    output: Option<&Path>,
) -> AppResult<()> {
    let (_manifest, records) = run_service::load_run(project_path, run_id)?;
    let series = query::extract_series(&records, variable, height)?;

    let mut csv = String::from("time_s,value\n");
    for (t, val) in &series {
        csv.push_str(&format!("{},{}\n", t, val));
    }

    if let Some(path) = output {
        std::fs::write(path, csv)?;
        println!(
            "✓ Exported {} data points to {}",
            series.len(),
            path.display()
        );
    } else {
        print!("{}", csv);
    }

    Ok(())
}

fn cmd_trees(project_path: &Path, test_id: &str) -> AppResult<()> {
    let series = trees::load_tree_series(project_path, test_id)?;

    if series.is_empty() {
        println!("No thermocouple trees configured");
        return Ok(());
    }
    for tree in &series {
        println!("Tree '{}' ({} samples):", tree.name, tree.time_s.len());
        for peak in trees::channel_peaks(tree) {
            let height = peak
                .height_cm
                .map(|h| format!("{:>6.0} cm", h))
                .unwrap_or_else(|| "     ? cm".to_string());
            let value = peak
                .peak_c
                .map(|t| format!("{:.1} °C", t))
                .unwrap_or_else(|| "no data".to_string());
            println!("  {:<12} {}  peak {}", peak.column, height, value);
        }
    }
    Ok(())
}
