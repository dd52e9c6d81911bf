//! Internal heat-release rate by oxygen consumption calorimetry.

use crate::config::HrrParams;
use crate::error::{FlowError, FlowResult};
use df_core::numeric::ensure_finite;

impl HrrParams {
    /// `E · (M_O2 / M_a) · X⁰_O2` in kJ per kg of air.
    fn ambient_oxygen_energy(&self) -> f64 {
        self.e_o2_mj_per_kg * 1000.0 * (self.molar_mass_o2 / self.molar_mass_air) * self.xo2_ambient
    }

    pub fn validate(&self) -> FlowResult<()> {
        let checks = [
            (self.xo2_ambient > 0.0 && self.xo2_ambient < 1.0, "xo2_ambient"),
            (self.alpha > 0.0, "alpha"),
            (self.e_o2_mj_per_kg > 0.0, "e_o2_mj_per_kg"),
            (self.molar_mass_air > 0.0, "molar_mass_air"),
            (self.molar_mass_o2 > 0.0, "molar_mass_o2"),
        ];
        match checks.iter().find(|(ok, _)| !ok) {
            Some((_, name)) => Err(FlowError::Config {
                what: format!("hrr.{name} out of range"),
            }),
            None => Ok(()),
        }
    }
}

/// HRR (kW) when every kilogram of inflowing air has its oxygen consumed.
pub fn hrr_all_inflow(params: &HrrParams, mass_in_kg_s: f64) -> f64 {
    params.ambient_oxygen_energy() * mass_in_kg_s
}

/// Oxygen depletion factor for a measured outflow mole fraction.
pub fn depletion_factor(xo2_ambient: f64, xo2: f64) -> f64 {
    (xo2_ambient - xo2) / (xo2_ambient * (1.0 - xo2))
}

/// HRR (kW) from the measured oxygen fraction in the outflowing gases.
///
/// A mole fraction outside `[0, 1)` has no depletion factor and is rejected.
pub fn hrr_oxygen_depletion(
    params: &HrrParams,
    xo2: f64,
    mass_out_kg_s: f64,
) -> FlowResult<f64> {
    if !(0.0..1.0).contains(&xo2) {
        return Err(FlowError::NonPhysical {
            what: "oxygen mole fraction",
        });
    }
    let phi = depletion_factor(params.xo2_ambient, xo2);
    let q =
        params.ambient_oxygen_energy() * phi / (1.0 + phi * (params.alpha - 1.0)) * mass_out_kg_s;
    Ok(ensure_finite(q, "heat release rate")?)
}
