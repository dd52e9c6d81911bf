mod common;

use df_app::{
    AppError, RunOptions, RunRequest, batch_outcome, ensure_run, list_runs, load_run,
    load_tree_series, query, run_all,
};
use df_results::RunStore;

fn request(project_path: &std::path::Path, use_cache: bool) -> RunRequest<'_> {
    RunRequest {
        project_path,
        test_id: common::TEST_ID,
        options: RunOptions {
            use_cache,
            ..RunOptions::default()
        },
    }
}

#[test]
fn run_persists_in_project_store() {
    let project_path = common::write_fixture("df_app_persist");

    let response = ensure_run(&request(&project_path, true)).expect("run failed");
    assert!(!response.loaded_from_cache);
    assert_eq!(response.manifest.sample_count, 79);
    assert_eq!(response.manifest.rows_dropped, 1);
    assert_eq!(response.manifest.heights_cm.len(), 9);
    assert!((response.manifest.ambient_c - 18.0).abs() < 1e-9);
    assert!((response.manifest.baselines[0].baseline_v - 0.5).abs() < 1e-9);

    let store = RunStore::for_project(&project_path).expect("failed to create run store");
    assert!(store.has_run(&response.run_id));

    let runs = list_runs(&project_path, common::TEST_ID).unwrap();
    assert_eq!(runs.len(), 1);
    assert_eq!(runs[0].run_id, response.run_id);

    let (_manifest, records) = load_run(&project_path, &response.run_id).unwrap();
    let summary = query::get_run_summary(&records).unwrap();
    assert_eq!(summary.record_count, 79);
    assert!(summary.peak_inflow_kg_s > 0.0);
    assert!(summary.peak_outflow_kg_s > 0.0);
    let plane = summary.mean_neutral_plane_m.expect("neutral plane");
    assert!((plane - 1.0).abs() < 0.05, "neutral plane {plane}");
}

#[test]
fn second_run_hits_cache() {
    let project_path = common::write_fixture("df_app_cache");

    let first = ensure_run(&request(&project_path, true)).unwrap();
    let second = ensure_run(&request(&project_path, true)).unwrap();
    assert!(second.loaded_from_cache);
    assert_eq!(first.run_id, second.run_id);

    let forced = ensure_run(&request(&project_path, false)).unwrap();
    assert!(!forced.loaded_from_cache);
    assert_eq!(forced.run_id, first.run_id);
}

#[test]
fn changed_data_gets_new_run_id() {
    let project_path = common::write_fixture("df_app_rehash");
    let first = ensure_run(&request(&project_path, true)).unwrap();

    let data = project_path.parent().unwrap().join("data/Alpha2.csv");
    let mut content = std::fs::read_to_string(&data).unwrap();
    content.push_str("60,,,,,,,,,,,,,,,,,,,,,\n");
    std::fs::write(&data, content).unwrap();

    let second = ensure_run(&request(&project_path, true)).unwrap();
    assert!(!second.loaded_from_cache);
    assert_ne!(first.run_id, second.run_id);
    assert_eq!(list_runs(&project_path, common::TEST_ID).unwrap().len(), 2);
}

#[test]
fn unknown_test_is_reported() {
    let project_path = common::write_fixture("df_app_unknown");
    let request = RunRequest {
        project_path: &project_path,
        test_id: "Delta",
        options: RunOptions::default(),
    };
    assert!(matches!(ensure_run(&request), Err(AppError::TestNotFound(_))));
}

#[test]
fn run_all_processes_every_test() {
    let project_path = common::write_fixture("df_app_all");
    let results = run_all(&project_path, &RunOptions::default()).unwrap();
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].0, common::TEST_ID);
    assert!(results[0].1.is_ok());
    assert!(batch_outcome(&results).is_ok());
}

#[test]
fn run_all_reports_failed_tests() {
    let project_path = common::write_fixture("df_app_all_failing");
    let mut project = df_project::load_yaml(&project_path).unwrap();
    project.tests.push(df_project::TestDef {
        id: "Beta1".into(),
        description: None,
        source: df_data::SourceOptions::new("data/Beta1.csv"),
        tree_sources: vec![],
    });
    df_project::save_yaml(&project_path, &project).unwrap();

    let results = run_all(&project_path, &RunOptions::default()).unwrap();
    assert_eq!(results.len(), 2);
    assert!(results[0].1.is_ok());
    assert!(matches!(results[1].1, Err(AppError::SourceRead { .. })));

    match batch_outcome(&results) {
        Err(AppError::BatchFailed {
            failed,
            total,
            failed_ids,
        }) => {
            assert_eq!((failed, total), (1, 2));
            assert_eq!(failed_ids, vec!["Beta1".to_string()]);
        }
        other => panic!("expected a failed batch, got {other:?}"),
    }
}

#[test]
fn trees_come_from_logger_sheet() {
    let project_path = common::write_fixture("df_app_trees");
    let trees = load_tree_series(&project_path, common::TEST_ID).unwrap();
    assert_eq!(trees.len(), 1);
    assert_eq!(trees[0].time_s, vec![-30.0, 30.0, 60.0]);

    let peaks = df_app::channel_peaks(&trees[0]);
    assert_eq!(peaks[1].height_cm, Some(40.0));
    assert_eq!(peaks[1].peak_c, Some(120.0));
    assert_eq!(peaks[2].peak_c, Some(300.0));
}
