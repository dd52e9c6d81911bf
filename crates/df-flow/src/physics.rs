//! Physical relations for flow through the door.
//!
//! Each probe sees a bidirectional orifice flow: the local pressure
//! difference drives gas in (ΔP > 0) or out (ΔP < 0) of the compartment.

use crate::error::{FlowError, FlowResult};
use df_core::numeric::{direction, ensure_finite};
use df_core::units::constants::{AIR_RHO_T, CELSIUS_OFFSET_ROUNDED};
use df_core::units::{Area, Density, MassRate, Pressure, Temperature, Velocity};
use df_core::units::{kg_per_m3, kgps, mps, to_celsius};

/// Ideal-gas density of hot air, `ρ = 353 / (T + 273)` with T in °C.
pub fn gas_density(temperature: Temperature) -> FlowResult<Density> {
    let absolute = to_celsius(temperature) + CELSIUS_OFFSET_ROUNDED;
    if !(absolute > 0.0) {
        return Err(FlowError::NonPhysical {
            what: "absolute temperature",
        });
    }
    Ok(kg_per_m3(AIR_RHO_T / absolute))
}

/// Orifice velocity `v = γ √(2|ΔP| / ρ)`, signed like ΔP.
pub fn probe_velocity(delta_p: Pressure, rho: Density, gamma: f64) -> FlowResult<Velocity> {
    let dp = delta_p.value;
    let rho = rho.value;
    if !(rho > 0.0) {
        return Err(FlowError::NonPhysical { what: "density" });
    }
    let speed = gamma * (2.0 * dp.abs() / rho).sqrt();
    ensure_finite(speed, "velocity")?;
    Ok(mps(direction(dp) * speed))
}

/// Mass flow through one door strip, `ṁ = C_d ρ v A`.
pub fn strip_mass_flow(cd: f64, rho: Density, velocity: Velocity, area: Area) -> FlowResult<MassRate> {
    let mdot = cd * rho.value * velocity.value * area.value;
    ensure_finite(mdot, "mass flow rate")?;
    Ok(kgps(mdot))
}
