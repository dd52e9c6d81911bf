//! Schema migration framework.

use crate::ProjectError;
use crate::schema::Project;

pub const LATEST_VERSION: u32 = 1;

pub fn migrate_to_latest(mut project: Project) -> Result<Project, ProjectError> {
    while project.version < LATEST_VERSION {
        project = migrate_one_version(project)?;
    }
    Ok(project)
}

fn migrate_one_version(project: Project) -> Result<Project, ProjectError> {
    match project.version {
        0 => migrate_v0_to_v1(project),
        v => Err(ProjectError::Migration {
            what: format!("No migration path from version {}", v),
        }),
    }
}

/// Version 0 files predate configurable sensor layouts and always described
/// the 2016 door-frame rig.
fn migrate_v0_to_v1(mut project: Project) -> Result<Project, ProjectError> {
    if project.probes.is_empty() {
        project.probes = df_flow::default_probes();
    }
    if project.thermocouples.is_empty() {
        project.thermocouples = df_flow::default_thermocouples();
    }
    project.version = 1;
    Ok(project)
}
