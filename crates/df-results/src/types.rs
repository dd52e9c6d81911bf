//! Result data types.

use serde::{Deserialize, Serialize};

pub type RunId = String;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunManifest {
    pub run_id: RunId,
    pub test_id: String,
    /// RFC 3339.
    pub timestamp: String,
    pub engine_version: String,
    pub sample_count: usize,
    pub rows_dropped: usize,
    pub ambient_c: f64,
    pub heights_cm: Vec<f64>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub baselines: Vec<BaselineSnapshot>,
}

/// Pre-test offset removed from a pressure channel, volts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BaselineSnapshot {
    pub column: String,
    pub baseline_v: f64,
}

/// One sample of a processed test; one line of `timeseries.jsonl`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeseriesRecord {
    pub time_s: f64,
    pub heights: Vec<HeightSnapshot>,
    pub mass_in_kg_s: f64,
    pub mass_out_kg_s: f64,
    pub mass_average_kg_s: f64,
    pub mass_pyrolysate_kg_s: f64,
    pub neutral_plane_m: Option<f64>,
    pub neutral_plane_smooth_m: Option<f64>,
    pub hrr_kw: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeightSnapshot {
    pub height_cm: f64,
    pub delta_p_pa: f64,
    pub temperature_c: f64,
    pub density_kg_m3: f64,
    pub velocity_m_s: f64,
    pub mass_flux_kg_s: f64,
}

impl TimeseriesRecord {
    pub fn height(&self, height_cm: f64) -> Option<&HeightSnapshot> {
        self.heights
            .iter()
            .find(|h| (h.height_cm - height_cm).abs() < 1e-6)
    }
}
