//! Project validation logic.

use crate::schema::{Project, TestDef};
use df_flow::{DoorLayout, HrrMethod};
use std::collections::HashSet;

#[derive(thiserror::Error, Debug)]
pub enum ValidationError {
    #[error("Duplicate ID: {id} in {context}")]
    DuplicateId { id: String, context: String },

    #[error("Invalid value: {field} = {value} ({reason})")]
    InvalidValue {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Unsupported version: {version}")]
    UnsupportedVersion { version: u32 },
}

pub fn validate_project(project: &Project) -> Result<(), ValidationError> {
    if project.version > crate::migrate::LATEST_VERSION {
        return Err(ValidationError::UnsupportedVersion {
            version: project.version,
        });
    }

    let mut test_ids = HashSet::new();
    for test in &project.tests {
        if !test_ids.insert(&test.id) {
            return Err(ValidationError::DuplicateId {
                id: test.id.clone(),
                context: "tests".to_string(),
            });
        }
        validate_test(test)?;
    }

    validate_coefficients(project)?;
    validate_sensors(project)?;

    let mut tree_names = HashSet::new();
    for tree in &project.thermocouple_trees {
        if !tree_names.insert(&tree.name) {
            return Err(ValidationError::DuplicateId {
                id: tree.name.clone(),
                context: "thermocouple_trees".to_string(),
            });
        }
        if tree.columns.is_empty() {
            return Err(invalid(
                format!("thermocouple_trees.{}.columns", tree.name),
                "[]",
                "a tree needs at least one column",
            ));
        }
    }

    Ok(())
}

fn validate_test(test: &TestDef) -> Result<(), ValidationError> {
    if test.id.trim().is_empty() {
        return Err(invalid("tests.id", "\"\"", "test id must not be empty"));
    }
    for (i, source) in std::iter::once(&test.source)
        .chain(&test.tree_sources)
        .enumerate()
    {
        let field = if i == 0 {
            format!("tests.{}.source", test.id)
        } else {
            format!("tests.{}.tree_sources[{}]", test.id, i - 1)
        };
        if source.path.as_os_str().is_empty() {
            return Err(invalid(format!("{field}.path"), "\"\"", "path must not be empty"));
        }
        positive(&format!("{field}.time_scale"), source.time_scale)?;
    }
    Ok(())
}

fn validate_coefficients(project: &Project) -> Result<(), ValidationError> {
    if project.door.number_of_heights == 0 {
        return Err(invalid(
            "door.number_of_heights",
            "0",
            "door needs at least one probe height",
        ));
    }
    positive("door.delta_height_m", project.door.delta_height_m)?;
    positive("door.door_width_m", project.door.door_width_m)?;
    positive("calibration.omega_factor", project.calibration.omega_factor)?;
    positive("calibration.gems_factor", project.calibration.gems_factor)?;
    positive("flow.gamma", project.flow.gamma)?;
    positive("flow.discharge_coefficient", project.flow.discharge_coefficient)?;
    if let Some(t) = project.flow.ambient_c {
        if !t.is_finite() {
            return Err(invalid("flow.ambient_c", t, "must be finite"));
        }
    }

    if let Err(e) = project.filter.validate() {
        return Err(invalid(
            "filter",
            format!(
                "{}/{}",
                project.filter.window_length, project.filter.polyorder
            ),
            e,
        ));
    }
    if let Err(e) = project.hrr.validate() {
        return Err(invalid("hrr", "", e));
    }
    if let HrrMethod::OxygenDepletion { column } = &project.hrr.method {
        if column.trim().is_empty() {
            return Err(invalid(
                "hrr.method.column",
                "\"\"",
                "oxygen depletion needs an O2 column",
            ));
        }
    }
    Ok(())
}

fn validate_sensors(project: &Project) -> Result<(), ValidationError> {
    if project.probes.is_empty() {
        return Err(invalid("probes", "[]", "at least one pressure probe is required"));
    }
    if project.thermocouples.is_empty() && project.flow.ambient_c.is_none() {
        return Err(invalid(
            "thermocouples",
            "[]",
            "ambient temperature needs thermocouples or flow.ambient_c",
        ));
    }

    let mut columns = HashSet::new();
    let sensor_columns = project
        .probes
        .iter()
        .map(|p| &p.column)
        .chain(project.thermocouples.iter().map(|t| &t.column));
    for column in sensor_columns {
        if !columns.insert(column) {
            return Err(ValidationError::DuplicateId {
                id: column.clone(),
                context: "sensor columns".to_string(),
            });
        }
        if column == df_data::TIME_COLUMN {
            return Err(invalid(
                "sensor column",
                column,
                "reserved for the time axis",
            ));
        }
    }

    DoorLayout::build(&project.door, &project.probes, &project.thermocouples)
        .map(|_| ())
        .map_err(|e| invalid("sensor layout", "", e))
}

fn positive(field: &str, value: f64) -> Result<(), ValidationError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(invalid(field, value, "must be positive"))
    }
}

fn invalid(
    field: impl Into<String>,
    value: impl ToString,
    reason: impl ToString,
) -> ValidationError {
    ValidationError::InvalidValue {
        field: field.into(),
        value: value.to_string(),
        reason: reason.to_string(),
    }
}
