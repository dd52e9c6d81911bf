//! Temporary project with a synthetic door-frame test.

use std::fmt::Write as _;
use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

use df_data::{SourceOptions, ThermocoupleTree};
use df_project::{Project, TestDef, save_yaml};

pub const TEST_ID: &str = "Alpha2";

fn unique_temp_dir(prefix: &str) -> PathBuf {
    let mut dir = std::env::temp_dir();
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_nanos();
    dir.push(format!("{}_{}", prefix, nanos));
    dir
}

/// Door-frame log: 20 s of pre-test data, then a pressure profile ramping up
/// to `4 (1 - z)` Pa with a hot upper layer. Row 45 has a missing sample.
fn door_csv(project: &Project) -> String {
    let mut out = String::from("testing_time");
    for probe in &project.probes {
        write!(out, ",{}", probe.column).unwrap();
    }
    for tc in &project.thermocouples {
        write!(out, ",{}", tc.column).unwrap();
    }
    out.push('\n');

    for row in 0..80 {
        let t = row as f64 - 20.0;
        let ramp = (t / 10.0).clamp(0.0, 1.0);
        write!(out, "{}", t).unwrap();
        for probe in &project.probes {
            let z = probe.height_cm / 100.0;
            let factor = project.calibration.factor(probe.family);
            let volts = 0.5 + 4.0 * (1.0 - z) * ramp / factor;
            if row == 45 && probe.column == "P5.60" {
                out.push(',');
            } else {
                write!(out, ",{}", volts).unwrap();
            }
        }
        for tc in &project.thermocouples {
            let z = tc.height_cm / 100.0;
            write!(out, ",{}", 18.0 + 150.0 * z * ramp).unwrap();
        }
        out.push('\n');
    }
    out
}

const LOGGER_CSV: &str = "Logger A export\n\
Time [min],20mm,40mm,60mm\n\
-0.5,18.0,18.2,18.1\n\
0.5,60.0,120.0,240.0\n\
1.0,80.0,,300.0\n";

/// Writes the project, its door log and a tree logger sheet; returns the
/// project file path.
pub fn write_fixture(prefix: &str) -> PathBuf {
    let dir = unique_temp_dir(prefix);
    std::fs::create_dir_all(dir.join("data")).unwrap();

    let mut project = Project::new("fixture");
    project.tests.push(TestDef {
        id: TEST_ID.into(),
        description: Some("synthetic".into()),
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
        columns: vec!["20mm".into(), "40mm".into(), "60mm".into()],
    });

    std::fs::write(dir.join("data/Alpha2.csv"), door_csv(&project)).unwrap();
    std::fs::write(dir.join("data/Alpha2_LoggerA.csv"), LOGGER_CSV).unwrap();

    let path = dir.join("project.yaml");
    save_yaml(&path, &project).unwrap();
    path
}
