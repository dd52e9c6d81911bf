//! df-signal: numerical helpers for sensor channels.
//!
//! Provides:
//! - NaN-aware statistics and pre-test baseline zeroing
//! - Savitzky–Golay smoothing with `interp` edge handling
//! - Parallel smoothing of many channels
//!
//! Missing samples are represented as `NaN` throughout.

pub mod baseline;
pub mod error;
pub mod savgol;

pub use baseline::{masked_mean, nan_mean, zero_against_baseline};
pub use error::{SignalError, SignalResult};
pub use savgol::{SavitzkyGolay, smooth_columns};
