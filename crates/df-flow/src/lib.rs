//! df-flow: mass flow through a compartment door from bidirectional
//! pressure probes and door-frame thermocouples.
//!
//! [`MassFlowPipeline`] turns a test [`df_data::Table`] into per-height
//! densities, velocities and mass fluxes, in/out totals, the neutral-plane
//! height and the internal heat-release rate.

pub mod config;
pub mod error;
pub mod geometry;
pub mod hrr;
pub mod neutral_plane;
pub mod physics;
pub mod pipeline;

pub use config::{
    Calibration, DoorGeometry, FlowConfig, FlowParams, HrrMethod, HrrParams, ProbeDef,
    ThermocoupleDef, TransducerFamily, default_probes, default_thermocouples,
};
pub use error::{FlowError, FlowResult};
pub use geometry::{DoorLayout, Slot, door_areas};
pub use neutral_plane::{neutral_plane_height, smooth_neutral_plane};
pub use pipeline::{FlowOutput, HeightSeries, MassFlowPipeline, ProbeBaseline};
