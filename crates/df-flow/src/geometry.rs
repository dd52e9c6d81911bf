//! Door opening geometry.

use crate::config::{DoorGeometry, ProbeDef, ThermocoupleDef};
use crate::error::{FlowError, FlowResult};
use df_core::numeric::ensure_positive;
use df_core::units::{Area, m2};

/// Door area attributed to each probe height, bottom strip first.
pub fn door_areas(geometry: &DoorGeometry) -> Vec<Area> {
    vec![m2(geometry.delta_height_m * geometry.door_width_m); geometry.number_of_heights]
}

pub fn validate_geometry(geometry: &DoorGeometry) -> FlowResult<()> {
    if geometry.number_of_heights == 0 {
        return Err(FlowError::Config {
            what: "door needs at least one probe height".to_string(),
        });
    }
    ensure_positive(geometry.delta_height_m, "delta_height_m")?;
    ensure_positive(geometry.door_width_m, "door_width_m")?;
    Ok(())
}

/// Strip index of a probe mounted at `height_cm`. Strip `i` is centred on
/// `(i + 1) * delta_height`.
pub fn slot_index(geometry: &DoorGeometry, height_cm: f64) -> FlowResult<usize> {
    let steps = height_cm / 100.0 / geometry.delta_height_m;
    let rounded = steps.round();
    if !steps.is_finite() || (steps - rounded).abs() > 1e-6 || rounded < 1.0 {
        return Err(FlowError::Layout { height_cm });
    }
    let idx = rounded as usize - 1;
    if idx >= geometry.number_of_heights {
        return Err(FlowError::Layout { height_cm });
    }
    Ok(idx)
}

/// Height of strip `idx` above the floor, m.
pub fn slot_height_m(geometry: &DoorGeometry, idx: usize) -> f64 {
    (idx + 1) as f64 * geometry.delta_height_m
}

/// One door strip with the sensors assigned to it.
#[derive(Debug, Clone)]
pub struct Slot {
    pub height_cm: f64,
    pub area: Area,
    /// Indices into the configured probe list.
    pub probes: Vec<usize>,
    /// Index into the configured thermocouple list.
    pub thermocouple: Option<usize>,
}

/// Probes and thermocouples resolved onto the door strips.
#[derive(Debug, Clone)]
pub struct DoorLayout {
    pub slots: Vec<Slot>,
}

impl DoorLayout {
    /// Every strip needs at least one probe; a strip may have at most one
    /// thermocouple.
    pub fn build(
        geometry: &DoorGeometry,
        probes: &[ProbeDef],
        thermocouples: &[ThermocoupleDef],
    ) -> FlowResult<Self> {
        validate_geometry(geometry)?;
        let mut slots: Vec<Slot> = door_areas(geometry)
            .into_iter()
            .enumerate()
            .map(|(idx, area)| Slot {
                height_cm: slot_height_m(geometry, idx) * 100.0,
                area,
                probes: Vec::new(),
                thermocouple: None,
            })
            .collect();

        for (i, probe) in probes.iter().enumerate() {
            let idx = slot_index(geometry, probe.height_cm)?;
            slots[idx].probes.push(i);
        }
        for (i, tc) in thermocouples.iter().enumerate() {
            let idx = slot_index(geometry, tc.height_cm)?;
            if slots[idx].thermocouple.replace(i).is_some() {
                return Err(FlowError::Config {
                    what: format!("two thermocouples at {} cm", tc.height_cm),
                });
            }
        }
        for slot in &mut slots {
            match slot.probes.first() {
                Some(&first) => slot.height_cm = probes[first].height_cm,
                None => {
                    return Err(FlowError::Config {
                        what: format!("no pressure probe at {:.0} cm", slot.height_cm),
                    });
                }
            }
        }
        Ok(Self { slots })
    }

    pub fn heights_cm(&self) -> Vec<f64> {
        self.slots.iter().map(|s| s.height_cm).collect()
    }
}
