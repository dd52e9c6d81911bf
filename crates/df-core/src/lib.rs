//! df-core: stable foundation for doorflow.
//!
//! Contains:
//! - units (uom SI types + constructors)
//! - numeric (Real + tolerances + float helpers)
//! - timing (wall-clock stage timers)
//! - error (shared error types)

pub mod error;
pub mod numeric;
pub mod timing;
pub mod units;

// Re-exports: nice ergonomics for downstream crates
pub use error::{DfError, DfResult};
pub use numeric::*;
pub use units::*;
