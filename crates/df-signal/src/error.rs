//! Error types for signal processing.

use df_core::error::DfError;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum SignalError {
    #[error("Invalid filter configuration: {what}")]
    InvalidFilter { what: String },

    #[error("Signal too short: {len} samples for a window of {window}")]
    TooShort { len: usize, window: usize },

    #[error("Non-finite sample at index {index}")]
    NonFiniteSample { index: usize },

    #[error("Mask length {mask} does not match signal length {len}")]
    MaskLength { mask: usize, len: usize },

    #[error("No finite samples selected for {what}")]
    EmptySelection { what: &'static str },

    #[error("Numeric error: {what}")]
    Numeric { what: &'static str },
}

pub type SignalResult<T> = Result<T, SignalError>;

impl From<SignalError> for DfError {
    fn from(e: SignalError) -> Self {
        match e {
            SignalError::InvalidFilter { .. } => DfError::InvalidArg { what: "filter" },
            SignalError::TooShort { .. } => DfError::InvalidArg {
                what: "signal length",
            },
            SignalError::NonFiniteSample { .. } => DfError::InvalidArg { what: "sample" },
            SignalError::MaskLength { mask, len } => DfError::LengthMismatch {
                what: "mask",
                expected: len,
                actual: mask,
            },
            SignalError::EmptySelection { what } => DfError::InvalidArg { what },
            SignalError::Numeric { what } => DfError::Invariant { what },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = SignalError::TooShort { len: 5, window: 21 };
        assert!(err.to_string().contains("21"));
    }

    #[test]
    fn error_conversion() {
        let err: DfError = SignalError::EmptySelection { what: "baseline" }.into();
        assert!(matches!(err, DfError::InvalidArg { what: "baseline" }));
    }
}
