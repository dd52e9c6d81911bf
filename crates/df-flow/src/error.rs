//! Error types for the door-flow pipeline.

use df_core::error::DfError;
use df_data::DataError;
use df_signal::SignalError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum FlowError {
    #[error("Invalid configuration: {what}")]
    Config { what: String },

    #[error("No pre-test rows (testing_time < 0) to compute {what}")]
    NoPrestart { what: String },

    #[error("Probe height {height_cm} cm does not fall on a door slot")]
    Layout { height_cm: f64 },

    #[error("Non-physical value: {what}")]
    NonPhysical { what: &'static str },

    #[error("Signal error: {0}")]
    Signal(#[from] SignalError),

    #[error("Data error: {0}")]
    Data(#[from] DataError),
}

pub type FlowResult<T> = Result<T, FlowError>;

impl From<DfError> for FlowError {
    fn from(e: DfError) -> Self {
        match e {
            DfError::NotPositive { what, value } => FlowError::Config {
                what: format!("{what} must be positive, got {value}"),
            },
            DfError::InvalidArg { what } => FlowError::Config {
                what: what.to_string(),
            },
            DfError::NonFinite { what, .. }
            | DfError::LengthMismatch { what, .. }
            | DfError::Invariant { what } => FlowError::NonPhysical { what },
        }
    }
}
