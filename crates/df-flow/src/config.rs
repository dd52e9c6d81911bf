//! Pipeline configuration: probe layout, calibration and coefficients.
//!
//! Every section has defaults matching the 2016 door-frame rig, so a project
//! file only needs to spell out what differs.

use df_signal::SavitzkyGolay;
use serde::{Deserialize, Serialize};

/// Pressure transducer family; each has its own linear conversion constant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TransducerFamily {
    Omega,
    Gems,
}

/// Linear conversion constants, Pa per volt.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Calibration {
    pub omega_factor: f64,
    pub gems_factor: f64,
}

impl Default for Calibration {
    fn default() -> Self {
        Self {
            omega_factor: 2.49,
            gems_factor: 10.0,
        }
    }
}

impl Calibration {
    pub fn factor(&self, family: TransducerFamily) -> f64 {
        match family {
            TransducerFamily::Omega => self.omega_factor,
            TransducerFamily::Gems => self.gems_factor,
        }
    }
}

/// A bidirectional pressure probe in the door opening.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProbeDef {
    pub column: String,
    pub height_cm: f64,
    pub family: TransducerFamily,
}

/// A door-frame thermocouple.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThermocoupleDef {
    pub column: String,
    pub height_cm: f64,
}

/// Door opening split into equal horizontal strips, one per probe height.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DoorGeometry {
    pub number_of_heights: usize,
    pub delta_height_m: f64,
    pub door_width_m: f64,
}

impl Default for DoorGeometry {
    fn default() -> Self {
        Self {
            number_of_heights: 9,
            delta_height_m: 0.2,
            door_width_m: 0.8,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FlowParams {
    /// Probe calibration constant.
    pub gamma: f64,
    /// Door discharge coefficient (0.68 per SFPE; Prahl & Emmons give 0.7).
    pub discharge_coefficient: f64,
    /// Fixed ambient temperature in °C. When absent it is measured from the
    /// pre-test thermocouple readings.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ambient_c: Option<f64>,
}

impl Default for FlowParams {
    fn default() -> Self {
        Self {
            gamma: 0.94,
            discharge_coefficient: 0.68,
            ambient_c: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(tag = "type")]
pub enum HrrMethod {
    /// All oxygen entering through the door is consumed inside.
    #[default]
    AllInflowOxygen,
    /// Measured oxygen mole fraction in the outflowing gases.
    OxygenDepletion { column: String },
}

/// Oxygen consumption calorimetry constants.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HrrParams {
    pub method: HrrMethod,
    /// Ambient oxygen mole fraction.
    pub xo2_ambient: f64,
    /// Expansion factor.
    pub alpha: f64,
    /// Heat released per kg of oxygen consumed, MJ/kg.
    pub e_o2_mj_per_kg: f64,
    pub molar_mass_air: f64,
    pub molar_mass_o2: f64,
}

impl Default for HrrParams {
    fn default() -> Self {
        Self {
            method: HrrMethod::AllInflowOxygen,
            xo2_ambient: 0.2095,
            alpha: 1.105,
            e_o2_mj_per_kg: 13.1,
            molar_mass_air: 29.0,
            molar_mass_o2: 32.0,
        }
    }
}

/// Everything the pipeline needs besides the data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FlowConfig {
    pub door: DoorGeometry,
    pub calibration: Calibration,
    pub flow: FlowParams,
    pub filter: SavitzkyGolay,
    pub hrr: HrrParams,
    pub probes: Vec<ProbeDef>,
    pub thermocouples: Vec<ThermocoupleDef>,
}

impl Default for FlowConfig {
    fn default() -> Self {
        Self {
            door: DoorGeometry::default(),
            calibration: Calibration::default(),
            flow: FlowParams::default(),
            filter: SavitzkyGolay::default(),
            hrr: HrrParams::default(),
            probes: default_probes(),
            thermocouples: default_thermocouples(),
        }
    }
}

/// Probe layout of the door-frame rig: three probes at 0.4 m and 1.6 m,
/// one at every other height.
pub fn default_probes() -> Vec<ProbeDef> {
    let omega = [
        ("P1.20", 20.0),
        ("P2.40", 40.0),
        ("P3.40", 40.0),
        ("P4.40", 40.0),
        ("P5.60", 60.0),
        ("P6.80", 80.0),
    ];
    let gems = [
        ("P7.100", 100.0),
        ("P8.120", 120.0),
        ("P9.140", 140.0),
        ("P10.160", 160.0),
        ("P11.160", 160.0),
        ("P12.160", 160.0),
        ("P13.180", 180.0),
    ];
    let probe = |family| {
        move |(column, height_cm): &(&str, f64)| ProbeDef {
            column: column.to_string(),
            height_cm: *height_cm,
            family,
        }
    };
    omega
        .iter()
        .map(probe(TransducerFamily::Omega))
        .chain(gems.iter().map(probe(TransducerFamily::Gems)))
        .collect()
}

/// Door thermocouples `TDD.40` to `TDD.180`; the lowest strip has none.
pub fn default_thermocouples() -> Vec<ThermocoupleDef> {
    (2..=9)
        .map(|i| {
            let height_cm = (i * 20) as f64;
            ThermocoupleDef {
                column: format!("TDD.{}", i * 20),
                height_cm,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_layout_matches_rig() {
        let probes = default_probes();
        assert_eq!(probes.len(), 13);
        assert_eq!(
            probes
                .iter()
                .filter(|p| p.family == TransducerFamily::Omega)
                .count(),
            6
        );
        assert_eq!(probes.iter().filter(|p| p.height_cm == 160.0).count(), 3);

        let tcs = default_thermocouples();
        assert_eq!(tcs.len(), 8);
        assert_eq!(tcs[0].column, "TDD.40");
        assert_eq!(tcs[7].column, "TDD.180");
    }

    #[test]
    fn calibration_factor_by_family() {
        let cal = Calibration::default();
        assert_eq!(cal.factor(TransducerFamily::Omega), 2.49);
        assert_eq!(cal.factor(TransducerFamily::Gems), 10.0);
    }
}
