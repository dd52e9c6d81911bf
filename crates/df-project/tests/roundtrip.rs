use df_data::{SourceOptions, ThermocoupleTree};
use df_flow::HrrMethod;
use df_project::schema::*;
use df_project::{load, load_json, load_yaml, project_dir, save_json, save_yaml, validate_project};
use std::path::Path;

fn sample_project() -> Project {
    let mut project = Project::new("BRE door frame 2016");
    project.hrr.method = HrrMethod::OxygenDepletion {
        column: "O2_out".into(),
    };
    project.tests.push(TestDef {
        id: "Alpha2".into(),
        description: Some("two cribs".into()),
        source: SourceOptions::new("data/Alpha2.csv"),
        tree_sources: vec![SourceOptions {
            time_column: "Time [min]".into(),
            time_scale: 60.0,
            skip_rows: 1,
            ..SourceOptions::new("data/Alpha2_LoggerA.csv")
        }],
    });
    project.thermocouple_trees.push(ThermocoupleTree {
        name: "centre".into(),
        columns: vec!["20mm".into(), "40mm".into()],
    });
    project
}

#[test]
fn roundtrip_yaml_project() {
    let project = sample_project();
    validate_project(&project).unwrap();

    let path = std::env::temp_dir().join("df_project_roundtrip.yaml");
    save_yaml(&path, &project).unwrap();
    let loaded = load_yaml(&path).unwrap();
    assert_eq!(project, loaded);
}

#[test]
fn roundtrip_json_project() {
    let project = sample_project();
    let path = std::env::temp_dir().join("df_project_roundtrip.json");
    save_json(&path, &project).unwrap();
    assert_eq!(load_json(&path).unwrap(), project);
    assert_eq!(load(&path).unwrap(), project);
}

#[test]
fn minimal_yaml_takes_rig_defaults() {
    let yaml = "\
version: 1
name: minimal
tests:
  - id: Gamma
    source: { path: Gamma.csv }
";
    let dir = std::env::temp_dir().join("df_project_minimal");
    std::fs::create_dir_all(&dir).unwrap();
    let path = dir.join("project.yaml");
    std::fs::write(&path, yaml).unwrap();

    // Version 1 files must spell out their sensors.
    assert!(load_yaml(&path).is_err());

    std::fs::write(&path, yaml.replace("version: 1", "version: 0")).unwrap();
    let project = load_yaml(&path).unwrap();
    assert_eq!(project.version, df_project::LATEST_VERSION);
    assert_eq!(project.probes.len(), 13);
    assert_eq!(project.filter.window_length, 21);
    assert_eq!(project.flow.gamma, 0.94);

    let test = project.test("Gamma").unwrap();
    assert_eq!(test.source.time_column, "testing_time");
    assert_eq!(
        test.resolved_source(project_dir(&path)).path,
        dir.join("Gamma.csv")
    );
}

#[test]
fn project_dir_of_bare_file_name() {
    assert_eq!(project_dir(Path::new("project.yaml")), Path::new("."));
    assert_eq!(project_dir(Path::new("a/project.yaml")), Path::new("a"));
}
