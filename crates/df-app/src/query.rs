//! Query helpers for extracting data from loaded runs.

use df_results::{HeightSnapshot, TimeseriesRecord};

use crate::error::{AppError, AppResult};

/// Whole-door variables, one value per sample.
pub const DOOR_VARIABLES: &[&str] = &[
    "mass_in",
    "mass_out",
    "mass_average",
    "mass_pyrolysate",
    "neutral_plane",
    "neutral_plane_smooth",
    "hrr",
];

/// Variables recorded at every probe height.
pub const HEIGHT_VARIABLES: &[&str] = &[
    "delta_p",
    "temperature",
    "density",
    "velocity",
    "mass_flux",
];

/// Summary of a run's time range and flow extremes.
#[derive(Debug, Clone)]
pub struct RunSummary {
    pub time_range: (f64, f64),
    pub record_count: usize,
    pub heights_cm: Vec<f64>,
    pub peak_inflow_kg_s: f64,
    pub peak_outflow_kg_s: f64,
    pub peak_hrr_kw: f64,
    /// Mean over the samples that have a neutral plane.
    pub mean_neutral_plane_m: Option<f64>,
}

/// Get run summary from timeseries records.
pub fn get_run_summary(records: &[TimeseriesRecord]) -> AppResult<RunSummary> {
    let (first, last) = match (records.first(), records.last()) {
        (Some(first), Some(last)) => (first, last),
        _ => return Err(AppError::InvalidInput("No records in run".to_string())),
    };

    let peak = |f: fn(&TimeseriesRecord) -> f64| {
        records.iter().map(f).fold(f64::NEG_INFINITY, f64::max)
    };
    let planes: Vec<f64> = records.iter().filter_map(|r| r.neutral_plane_m).collect();
    let mean_neutral_plane_m = if planes.is_empty() {
        None
    } else {
        Some(planes.iter().sum::<f64>() / planes.len() as f64)
    };

    Ok(RunSummary {
        time_range: (first.time_s, last.time_s),
        record_count: records.len(),
        heights_cm: first.heights.iter().map(|h| h.height_cm).collect(),
        peak_inflow_kg_s: peak(|r| r.mass_in_kg_s),
        peak_outflow_kg_s: peak(|r| r.mass_out_kg_s),
        peak_hrr_kw: peak(|r| r.hrr_kw),
        mean_neutral_plane_m,
    })
}

/// Every variable name accepted by [`extract_series`].
pub fn list_variables() -> Vec<&'static str> {
    DOOR_VARIABLES
        .iter()
        .chain(HEIGHT_VARIABLES)
        .copied()
        .collect()
}

/// Extract `(time_s, value)` pairs for a variable.
///
/// Per-height variables need `height_cm`. Samples without a neutral plane
/// are left out of the `neutral_plane` and `neutral_plane_smooth` series.
pub fn extract_series(
    records: &[TimeseriesRecord],
    variable: &str,
    height_cm: Option<f64>,
) -> AppResult<Vec<(f64, f64)>> {
    if DOOR_VARIABLES.contains(&variable) {
        return Ok(records
            .iter()
            .filter_map(|r| door_value(r, variable).map(|v| (r.time_s, v)))
            .collect());
    }

    let pick: fn(&HeightSnapshot) -> f64 = match variable {
        "delta_p" => |h: &HeightSnapshot| h.delta_p_pa,
        "temperature" => |h: &HeightSnapshot| h.temperature_c,
        "density" => |h: &HeightSnapshot| h.density_kg_m3,
        "velocity" => |h: &HeightSnapshot| h.velocity_m_s,
        "mass_flux" => |h: &HeightSnapshot| h.mass_flux_kg_s,
        _ => {
            return Err(AppError::InvalidInput(format!(
                "Unknown variable: {} (expected one of {})",
                variable,
                list_variables().join(", ")
            )));
        }
    };
    let height_cm = height_cm.ok_or_else(|| {
        AppError::InvalidInput(format!("Variable {} needs a probe height", variable))
    })?;

    records
        .iter()
        .map(|r| {
            r.height(height_cm)
                .map(|h| (r.time_s, pick(h)))
                .ok_or_else(|| {
                    AppError::InvalidInput(format!("No probe height {} cm in run", height_cm))
                })
        })
        .collect()
}

fn door_value(record: &TimeseriesRecord, variable: &str) -> Option<f64> {
    match variable {
        "mass_in" => Some(record.mass_in_kg_s),
        "mass_out" => Some(record.mass_out_kg_s),
        "mass_average" => Some(record.mass_average_kg_s),
        "mass_pyrolysate" => Some(record.mass_pyrolysate_kg_s),
        "neutral_plane" => record.neutral_plane_m,
        "neutral_plane_smooth" => record.neutral_plane_smooth_m,
        "hrr" => Some(record.hrr_kw),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(time_s: f64, dp: f64, plane: Option<f64>) -> TimeseriesRecord {
        TimeseriesRecord {
            time_s,
            heights: vec![HeightSnapshot {
                height_cm: 20.0,
                delta_p_pa: dp,
                temperature_c: 20.0,
                density_kg_m3: 1.2,
                velocity_m_s: 1.0,
                mass_flux_kg_s: 0.1,
            }],
            mass_in_kg_s: dp.max(0.0),
            mass_out_kg_s: (-dp).max(0.0),
            mass_average_kg_s: dp.abs() / 2.0,
            mass_pyrolysate_kg_s: -dp,
            neutral_plane_m: plane,
            neutral_plane_smooth_m: plane.map(|z| z + 0.25),
            hrr_kw: 10.0 * time_s,
        }
    }

    fn records() -> Vec<TimeseriesRecord> {
        vec![
            record(0.0, 1.0, Some(1.0)),
            record(1.0, -2.0, None),
            record(2.0, 3.0, Some(2.0)),
        ]
    }

    #[test]
    fn summary() {
        let summary = get_run_summary(&records()).unwrap();
        assert_eq!(summary.record_count, 3);
        assert_eq!(summary.time_range, (0.0, 2.0));
        assert_eq!(summary.heights_cm, vec![20.0]);
        assert_eq!(summary.peak_inflow_kg_s, 3.0);
        assert_eq!(summary.peak_outflow_kg_s, 2.0);
        assert_eq!(summary.peak_hrr_kw, 20.0);
        assert_eq!(summary.mean_neutral_plane_m, Some(1.5));
        assert!(get_run_summary(&[]).is_err());
    }

    #[test]
    fn door_series() {
        let series = extract_series(&records(), "mass_in", None).unwrap();
        assert_eq!(series, vec![(0.0, 1.0), (1.0, 0.0), (2.0, 3.0)]);

        let planes = extract_series(&records(), "neutral_plane", None).unwrap();
        assert_eq!(planes, vec![(0.0, 1.0), (2.0, 2.0)]);

        let smooth = extract_series(&records(), "neutral_plane_smooth", None).unwrap();
        assert_eq!(smooth, vec![(0.0, 1.25), (2.0, 2.25)]);

        let pyrolysate = extract_series(&records(), "mass_pyrolysate", None).unwrap();
        assert_eq!(pyrolysate, vec![(0.0, -1.0), (1.0, 2.0), (2.0, -3.0)]);
    }

    #[test]
    fn negative_peaks_are_reported() {
        let cooling: Vec<TimeseriesRecord> = records()
            .into_iter()
            .map(|mut r| {
                r.hrr_kw = -5.0 - r.time_s;
                r
            })
            .collect();
        let summary = get_run_summary(&cooling).unwrap();
        assert_eq!(summary.peak_hrr_kw, -5.0);
    }

    #[test]
    fn height_series() {
        let series = extract_series(&records(), "delta_p", Some(20.0)).unwrap();
        assert_eq!(series[1], (1.0, -2.0));

        assert!(extract_series(&records(), "delta_p", None).is_err());
        assert!(extract_series(&records(), "delta_p", Some(40.0)).is_err());
        assert!(extract_series(&records(), "pressure", Some(20.0)).is_err());
    }

    #[test]
    fn variables_are_listed() {
        let vars = list_variables();
        assert_eq!(vars.len(), 12);
        assert!(vars.contains(&"mass_pyrolysate"));
        assert!(vars.contains(&"neutral_plane_smooth"));
        assert!(vars.contains(&"neutral_plane"));
        assert!(vars.contains(&"mass_flux"));
    }
}
