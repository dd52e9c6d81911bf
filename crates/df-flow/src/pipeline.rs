//! The door mass-flow pipeline.
//!
//! Raw transducer voltages and door thermocouple readings go in; per-height
//! flow quantities, in/out totals, the neutral plane and the internal HRR
//! come out. Stages run in a fixed order:
//!
//! 1. ambient temperature from the pre-test thermocouple readings
//! 2. zero every pressure channel against its pre-test mean, then scale by
//!    the transducer calibration factor
//! 3. drop rows with missing samples and smooth the pressure channels
//! 4. average co-located probes and pick the effective temperature per height
//! 5. density, velocity and mass flux per height, then totals
//! 6. neutral plane, raw and smoothed, and the internal HRR

use crate::config::{FlowConfig, HrrMethod};
use crate::error::{FlowError, FlowResult};
use crate::geometry::DoorLayout;
use crate::hrr::{hrr_all_inflow, hrr_oxygen_depletion};
use crate::neutral_plane::{neutral_plane_height, smooth_neutral_plane};
use crate::physics::{gas_density, probe_velocity, strip_mass_flow};
use df_core::numeric::{ensure_finite, ensure_positive};
use df_core::timing::Timer;
use df_core::units::{celsius, pa};
use df_data::{TIME_COLUMN, Table};
use df_signal::{SignalError, masked_mean, nan_mean, smooth_columns, zero_against_baseline};
use serde::{Deserialize, Serialize};

/// Pre-test mean of one raw pressure channel, in volts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProbeBaseline {
    pub column: String,
    pub baseline_v: f64,
}

/// Flow quantities for one door strip.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeightSeries {
    pub height_cm: f64,
    pub area_m2: f64,
    /// Probe columns averaged into `delta_p_pa`.
    pub probes: Vec<String>,
    pub delta_p_pa: Vec<f64>,
    pub temperature_c: Vec<f64>,
    pub density_kg_m3: Vec<f64>,
    pub velocity_m_s: Vec<f64>,
    pub mass_flux_kg_s: Vec<f64>,
}

/// Everything the pipeline produces for one test.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlowOutput {
    pub time_s: Vec<f64>,
    pub ambient_c: f64,
    pub rows_dropped: usize,
    pub baselines: Vec<ProbeBaseline>,
    pub heights: Vec<HeightSeries>,
    pub mass_in_kg_s: Vec<f64>,
    pub mass_out_kg_s: Vec<f64>,
    pub mass_average_kg_s: Vec<f64>,
    /// Gas generated inside the compartment, `mass_out - mass_in`.
    pub mass_pyrolysate_kg_s: Vec<f64>,
    pub neutral_plane_m: Vec<Option<f64>>,
    /// `neutral_plane_m` smoothed with the pressure filter.
    pub neutral_plane_smooth_m: Vec<Option<f64>>,
    pub hrr_kw: Vec<f64>,
}

impl FlowOutput {
    pub fn len(&self) -> usize {
        self.time_s.len()
    }

    pub fn is_empty(&self) -> bool {
        self.time_s.is_empty()
    }

    pub fn heights_cm(&self) -> Vec<f64> {
        self.heights.iter().map(|h| h.height_cm).collect()
    }

    pub fn height(&self, height_cm: f64) -> Option<&HeightSeries> {
        self.heights
            .iter()
            .find(|h| (h.height_cm - height_cm).abs() < 1e-6)
    }
}

/// Validated pipeline, ready to run against any number of tests.
#[derive(Debug, Clone)]
pub struct MassFlowPipeline {
    config: FlowConfig,
    layout: DoorLayout,
}

impl MassFlowPipeline {
    pub fn new(config: FlowConfig) -> FlowResult<Self> {
        validate_config(&config)?;
        let layout = DoorLayout::build(&config.door, &config.probes, &config.thermocouples)?;
        Ok(Self { config, layout })
    }

    pub fn config(&self) -> &FlowConfig {
        &self.config
    }

    pub fn layout(&self) -> &DoorLayout {
        &self.layout
    }

    pub fn run(&self, table: &Table) -> FlowResult<FlowOutput> {
        let timer = Timer::start("mass_flow_pipeline");
        let cfg = &self.config;
        let prestart = table.prestart_mask();
        if !prestart.iter().any(|p| *p) {
            return Err(FlowError::NoPrestart {
                what: "pressure baselines".to_string(),
            });
        }

        let ambient_c = match cfg.flow.ambient_c {
            Some(t) => t,
            None => measure_ambient(table, cfg, &prestart)?,
        };
        tracing::debug!("ambient temperature {:.2} °C", ambient_c);

        // Baselines use every pre-test row, before missing samples are dropped.
        let mut work = Table::new(table.time().to_vec());
        let mut baselines = Vec::with_capacity(cfg.probes.len());
        for probe in &cfg.probes {
            let raw = table.column(&probe.column)?;
            let (baseline_v, zeroed) =
                zero_against_baseline(raw, &prestart).map_err(|e| match e {
                    SignalError::EmptySelection { .. } => FlowError::NoPrestart {
                        what: format!("baseline of {}", probe.column),
                    },
                    other => other.into(),
                })?;
            let factor = cfg.calibration.factor(probe.family);
            let delta_p = zeroed.into_iter().map(|v| v * factor).collect();
            work.insert_column(&probe.column, delta_p)?;
            baselines.push(ProbeBaseline {
                column: probe.column.clone(),
                baseline_v,
            });
        }
        for tc in &cfg.thermocouples {
            work.insert_column(&tc.column, table.column(&tc.column)?.to_vec())?;
        }
        let oxygen_column = match &cfg.hrr.method {
            HrrMethod::OxygenDepletion { column } => {
                work.insert_column(column, table.column(column)?.to_vec())?;
                Some(column.as_str())
            }
            HrrMethod::AllInflowOxygen => None,
        };

        let used: Vec<String> = work
            .names()
            .iter()
            .filter(|n| n.as_str() != TIME_COLUMN)
            .cloned()
            .collect();
        let used: Vec<&str> = used.iter().map(String::as_str).collect();
        let rows_dropped = work.drop_missing(&used)?;
        if rows_dropped > 0 {
            tracing::info!("dropped {} rows with missing samples", rows_dropped);
        }

        let raw_dp: Vec<Vec<f64>> = cfg
            .probes
            .iter()
            .map(|p| work.column(&p.column).map(<[f64]>::to_vec))
            .collect::<Result<_, _>>()?;
        let smoothed = smooth_columns(&cfg.filter, &raw_dp)?;

        let n = work.len();
        let mut heights = Vec::with_capacity(self.layout.slots.len());
        for slot in &self.layout.slots {
            let delta_p_pa: Vec<f64> = (0..n)
                .map(|row| {
                    let sum: f64 = slot.probes.iter().map(|&i| smoothed[i][row]).sum();
                    sum / slot.probes.len() as f64
                })
                .collect();

            let measured = match slot.thermocouple {
                Some(i) => Some(work.column(&cfg.thermocouples[i].column)?),
                None => None,
            };
            let temperature_c: Vec<f64> = delta_p_pa
                .iter()
                .enumerate()
                .map(|(row, dp)| match measured {
                    Some(col) if *dp <= 0.0 => col[row],
                    _ => ambient_c,
                })
                .collect();

            let mut density_kg_m3 = Vec::with_capacity(n);
            let mut velocity_m_s = Vec::with_capacity(n);
            let mut mass_flux_kg_s = Vec::with_capacity(n);
            for (dp, t) in delta_p_pa.iter().zip(&temperature_c) {
                let rho = gas_density(celsius(*t))?;
                let v = probe_velocity(pa(*dp), rho, cfg.flow.gamma)?;
                let mdot = strip_mass_flow(cfg.flow.discharge_coefficient, rho, v, slot.area)?;
                density_kg_m3.push(rho.value);
                velocity_m_s.push(v.value);
                mass_flux_kg_s.push(mdot.value);
            }

            heights.push(HeightSeries {
                height_cm: slot.height_cm,
                area_m2: slot.area.value,
                probes: slot
                    .probes
                    .iter()
                    .map(|&i| cfg.probes[i].column.clone())
                    .collect(),
                delta_p_pa,
                temperature_c,
                density_kg_m3,
                velocity_m_s,
                mass_flux_kg_s,
            });
        }

        let (mass_in_kg_s, mass_out_kg_s) = split_totals(&heights, n);
        let mass_average_kg_s: Vec<f64> = mass_in_kg_s
            .iter()
            .zip(&mass_out_kg_s)
            .map(|(i, o)| (i + o) / 2.0)
            .collect();
        let mass_pyrolysate_kg_s: Vec<f64> = mass_in_kg_s
            .iter()
            .zip(&mass_out_kg_s)
            .map(|(i, o)| o - i)
            .collect();

        let heights_m: Vec<f64> = heights.iter().map(|h| h.height_cm / 100.0).collect();
        let neutral_plane_m: Vec<Option<f64>> = (0..n)
            .map(|row| {
                let profile: Vec<f64> = heights.iter().map(|h| h.delta_p_pa[row]).collect();
                neutral_plane_height(&heights_m, &profile)
            })
            .collect();
        let neutral_plane_smooth_m = smooth_neutral_plane(&cfg.filter, &neutral_plane_m)?;

        let hrr_kw: Vec<f64> = match oxygen_column {
            None => mass_in_kg_s
                .iter()
                .map(|m| {
                    ensure_finite(hrr_all_inflow(&cfg.hrr, *m), "heat release rate")
                        .map_err(FlowError::from)
                })
                .collect::<FlowResult<_>>()?,
            Some(column) => work
                .column(column)?
                .iter()
                .zip(&mass_out_kg_s)
                .map(|(x, m)| hrr_oxygen_depletion(&cfg.hrr, *x, *m))
                .collect::<FlowResult<_>>()?,
        };

        let elapsed = timer.stop_and_print();
        tracing::debug!("pipeline finished {} samples in {:.3}s", n, elapsed);

        Ok(FlowOutput {
            time_s: work.time().to_vec(),
            ambient_c,
            rows_dropped,
            baselines,
            heights,
            mass_in_kg_s,
            mass_out_kg_s,
            mass_average_kg_s,
            mass_pyrolysate_kg_s,
            neutral_plane_m,
            neutral_plane_smooth_m,
            hrr_kw,
        })
    }
}

/// Mean over pre-test rows of the per-thermocouple means.
fn measure_ambient(table: &Table, cfg: &FlowConfig, prestart: &[bool]) -> FlowResult<f64> {
    let mut means = Vec::with_capacity(cfg.thermocouples.len());
    for tc in &cfg.thermocouples {
        if let Some(mean) = masked_mean(table.column(&tc.column)?, prestart)? {
            means.push(mean);
        }
    }
    nan_mean(&means).ok_or_else(|| FlowError::NoPrestart {
        what: "ambient temperature".to_string(),
    })
}

/// Inflow sums positive strip fluxes; outflow sums the magnitude of the rest.
fn split_totals(heights: &[HeightSeries], n: usize) -> (Vec<f64>, Vec<f64>) {
    let mut mass_in = vec![0.0; n];
    let mut mass_out = vec![0.0; n];
    for h in heights {
        for (row, mdot) in h.mass_flux_kg_s.iter().enumerate() {
            if *mdot > 0.0 {
                mass_in[row] += mdot;
            } else {
                mass_out[row] += mdot.abs();
            }
        }
    }
    (mass_in, mass_out)
}

fn validate_config(cfg: &FlowConfig) -> FlowResult<()> {
    if cfg.probes.is_empty() {
        return Err(FlowError::Config {
            what: "no pressure probes configured".to_string(),
        });
    }
    ensure_positive(cfg.flow.gamma, "gamma")?;
    ensure_positive(cfg.flow.discharge_coefficient, "discharge_coefficient")?;
    ensure_positive(cfg.calibration.omega_factor, "omega_factor")?;
    ensure_positive(cfg.calibration.gems_factor, "gems_factor")?;
    if let Some(t) = cfg.flow.ambient_c {
        if !t.is_finite() {
            return Err(FlowError::Config {
                what: "ambient_c must be finite".to_string(),
            });
        }
    }
    if cfg.thermocouples.is_empty() && cfg.flow.ambient_c.is_none() {
        return Err(FlowError::Config {
            what: "ambient temperature needs thermocouples or a fixed ambient_c".to_string(),
        });
    }
    cfg.filter.validate()?;
    cfg.hrr.validate()?;
    Ok(())
}
