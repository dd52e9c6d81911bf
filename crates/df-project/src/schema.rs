//! Project schema definitions.

use df_data::{SourceOptions, ThermocoupleTree};
use df_flow::{
    Calibration, DoorGeometry, FlowConfig, FlowParams, HrrParams, ProbeDef, ThermocoupleDef,
};
use df_signal::SavitzkyGolay;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Project {
    pub version: u32,
    pub name: String,
    #[serde(default)]
    pub door: DoorGeometry,
    #[serde(default)]
    pub calibration: Calibration,
    #[serde(default)]
    pub flow: FlowParams,
    #[serde(default)]
    pub filter: SavitzkyGolay,
    #[serde(default)]
    pub hrr: HrrParams,
    #[serde(default)]
    pub probes: Vec<ProbeDef>,
    #[serde(default)]
    pub thermocouples: Vec<ThermocoupleDef>,
    #[serde(default)]
    pub tests: Vec<TestDef>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub thermocouple_trees: Vec<ThermocoupleTree>,
}

/// One fire test and where its logs live.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TestDef {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Door-frame log: pressure probes and door thermocouples.
    pub source: SourceOptions,
    /// Logger sheets holding the thermocouple trees.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tree_sources: Vec<SourceOptions>,
}

impl Project {
    /// Empty project at the current schema version with the default rig.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            version: crate::migrate::LATEST_VERSION,
            name: name.into(),
            door: DoorGeometry::default(),
            calibration: Calibration::default(),
            flow: FlowParams::default(),
            filter: SavitzkyGolay::default(),
            hrr: HrrParams::default(),
            probes: df_flow::default_probes(),
            thermocouples: df_flow::default_thermocouples(),
            tests: Vec::new(),
            thermocouple_trees: Vec::new(),
        }
    }

    /// Pipeline settings shared by every test in the project.
    pub fn flow_config(&self) -> FlowConfig {
        FlowConfig {
            door: self.door,
            calibration: self.calibration,
            flow: self.flow,
            filter: self.filter,
            hrr: self.hrr.clone(),
            probes: self.probes.clone(),
            thermocouples: self.thermocouples.clone(),
        }
    }

    pub fn test(&self, id: &str) -> Option<&TestDef> {
        self.tests.iter().find(|t| t.id == id)
    }
}

impl TestDef {
    /// Door-frame source with a relative path resolved against `base_dir`.
    pub fn resolved_source(&self, base_dir: &Path) -> SourceOptions {
        resolve(&self.source, base_dir)
    }

    pub fn resolved_tree_sources(&self, base_dir: &Path) -> Vec<SourceOptions> {
        self.tree_sources
            .iter()
            .map(|s| resolve(s, base_dir))
            .collect()
    }
}

fn resolve(source: &SourceOptions, base_dir: &Path) -> SourceOptions {
    let mut resolved = source.clone();
    if source.path.is_relative() {
        resolved.path = base_dir.join(&source.path);
    }
    resolved
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn relative_sources_resolve_against_project_dir() {
        let test = TestDef {
            id: "Alpha2".into(),
            description: None,
            source: SourceOptions::new("data/Alpha2.csv"),
            tree_sources: vec![SourceOptions::new("/abs/LoggerA.csv")],
        };
        let base = Path::new("/projects/bre");
        assert_eq!(
            test.resolved_source(base).path,
            Path::new("/projects/bre/data/Alpha2.csv")
        );
        assert_eq!(
            test.resolved_tree_sources(base)[0].path,
            Path::new("/abs/LoggerA.csv")
        );
    }

    #[test]
    fn flow_config_carries_project_settings() {
        let mut project = Project::new("p");
        project.flow.discharge_coefficient = 0.7;
        let cfg = project.flow_config();
        assert_eq!(cfg.flow.discharge_coefficient, 0.7);
        assert_eq!(cfg.probes.len(), 13);
    }
}
