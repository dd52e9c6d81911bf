use std::path::Path;

#[test]
fn demo_project_loads_and_validates() {
    let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("../../demos/door_frame/project.yaml");
    let project = df_project::load_yaml(&path)
        .unwrap_or_else(|e| panic!("Failed to load {}: {}", path.display(), e));
    df_project::validate_project(&project).unwrap();

    assert_eq!(project.tests.len(), 2);
    assert_eq!(project.probes, df_flow::default_probes());
    assert_eq!(project.thermocouples, df_flow::default_thermocouples());

    let alpha = project.test("Alpha2").unwrap();
    assert_eq!(alpha.tree_sources[0].time_scale, 60.0);
    for test in &project.tests {
        let source = test.resolved_source(df_project::project_dir(&path));
        assert!(source.path.exists(), "missing {}", source.path.display());
    }
}
