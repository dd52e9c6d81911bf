use std::fs;
use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

use df_results::{HeightSnapshot, ResultsError, RunManifest, RunStore, TimeseriesRecord};

fn unique_temp_dir(prefix: &str) -> PathBuf {
    let mut dir = std::env::temp_dir();
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_nanos();
    dir.push(format!("{}_{}", prefix, nanos));
    dir
}

fn manifest(run_id: &str, test_id: &str, timestamp: &str) -> RunManifest {
    RunManifest {
        run_id: run_id.to_string(),
        test_id: test_id.to_string(),
        timestamp: timestamp.to_string(),
        engine_version: "0.1.0".to_string(),
        sample_count: 2,
        rows_dropped: 0,
        ambient_c: 18.5,
        heights_cm: vec![20.0],
        baselines: vec![],
    }
}

fn records() -> Vec<TimeseriesRecord> {
    [(-1.0, None), (0.5, Some(1.25))]
        .into_iter()
        .map(|(time_s, neutral_plane_m)| TimeseriesRecord {
            time_s,
            heights: vec![HeightSnapshot {
                height_cm: 20.0,
                delta_p_pa: 1.5,
                temperature_c: 18.5,
                density_kg_m3: 1.25,
                velocity_m_s: 1.5,
                mass_flux_kg_s: 0.25,
            }],
            mass_in_kg_s: 0.25,
            mass_out_kg_s: 0.0,
            mass_average_kg_s: 0.125,
            mass_pyrolysate_kg_s: -0.25,
            neutral_plane_m,
            neutral_plane_smooth_m: neutral_plane_m,
            hrr_kw: 540.0,
        })
        .collect()
}

#[test]
fn save_list_load_roundtrip() {
    let project_dir = unique_temp_dir("df_results_project");
    fs::create_dir_all(&project_dir).expect("failed to create temp project dir");
    let project_path = project_dir.join("project.yaml");

    let store = RunStore::for_project(&project_path).expect("failed to create run store");
    assert!(store.root_dir().ends_with(".doorflow/runs"));

    let older = manifest("run-old", "Alpha2", "2026-02-25T12:00:00Z");
    let newer = manifest("run-new", "Alpha2", "2026-02-26T12:00:00Z");
    let other = manifest("run-beta", "Beta1", "2026-02-26T13:00:00Z");
    for m in [&older, &newer, &other] {
        store.save_run(m, &records()).expect("failed to save run");
    }

    let runs = store.list_runs("Alpha2").expect("failed to list runs");
    let ids: Vec<&str> = runs.iter().map(|m| m.run_id.as_str()).collect();
    assert_eq!(ids, vec!["run-new", "run-old"]);

    assert!(store.has_run("run-new"));
    assert_eq!(store.load_manifest("run-new").unwrap(), newer);
    assert_eq!(store.load_timeseries("run-new").unwrap(), records());

    store.delete_run("run-new").unwrap();
    assert!(!store.has_run("run-new"));
    assert!(matches!(
        store.load_manifest("run-new"),
        Err(ResultsError::RunNotFound { .. })
    ));
    assert_eq!(store.list_runs("Alpha2").unwrap().len(), 1);
}

#[test]
fn missing_run_is_reported() {
    let store = RunStore::new(unique_temp_dir("df_results_empty")).unwrap();
    assert!(!store.has_run("nope"));
    assert!(matches!(
        store.load_timeseries("nope"),
        Err(ResultsError::RunNotFound { .. })
    ));
    assert!(store.list_runs("Alpha2").unwrap().is_empty());
}
