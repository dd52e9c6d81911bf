//! Savitzky–Golay smoothing.
//!
//! A window of `window_length` samples is fitted by least squares with a
//! polynomial of degree `polyorder`; the smoothed sample is the fit evaluated
//! at the window centre. The first and last `window_length / 2` samples are
//! taken from a single fit over the first (last) full window, evaluated at each
//! edge position.

use crate::error::{SignalError, SignalResult};
use nalgebra::DMatrix;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

pub const DEFAULT_WINDOW_LENGTH: usize = 21;
pub const DEFAULT_POLYORDER: usize = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SavitzkyGolay {
    #[serde(default = "default_window_length")]
    pub window_length: usize,
    #[serde(default = "default_polyorder")]
    pub polyorder: usize,
}

fn default_window_length() -> usize {
    DEFAULT_WINDOW_LENGTH
}

fn default_polyorder() -> usize {
    DEFAULT_POLYORDER
}

impl Default for SavitzkyGolay {
    fn default() -> Self {
        Self {
            window_length: DEFAULT_WINDOW_LENGTH,
            polyorder: DEFAULT_POLYORDER,
        }
    }
}

impl SavitzkyGolay {
    pub fn new(window_length: usize, polyorder: usize) -> SignalResult<Self> {
        let filter = Self {
            window_length,
            polyorder,
        };
        filter.validate()?;
        Ok(filter)
    }

    pub fn validate(&self) -> SignalResult<()> {
        if self.window_length % 2 == 0 {
            return Err(SignalError::InvalidFilter {
                what: format!("window_length {} must be odd", self.window_length),
            });
        }
        if self.polyorder >= self.window_length {
            return Err(SignalError::InvalidFilter {
                what: format!(
                    "polyorder {} must be less than window_length {}",
                    self.polyorder, self.window_length
                ),
            });
        }
        Ok(())
    }

    fn half_width(&self) -> usize {
        self.window_length / 2
    }

    /// Least-squares projection `(AᵀA)⁻¹Aᵀ` for the centred Vandermonde
    /// matrix `A[i][j] = (i - m)^j`. Row `j` maps a window onto the `j`-th
    /// polynomial coefficient.
    fn projection(&self) -> SignalResult<DMatrix<f64>> {
        let m = self.half_width() as f64;
        let cols = self.polyorder + 1;
        let a = DMatrix::from_fn(self.window_length, cols, |i, j| {
            (i as f64 - m).powi(j as i32)
        });
        let at = a.transpose();
        let ata = &at * &a;
        ata.lu().solve(&at).ok_or(SignalError::Numeric {
            what: "Savitzky-Golay normal equations are singular",
        })
    }

    /// Window weights that evaluate the fit at offset `x` from the centre.
    fn weights_at(projection: &DMatrix<f64>, x: f64) -> Vec<f64> {
        let mut weights = vec![0.0; projection.ncols()];
        for j in 0..projection.nrows() {
            let scale = x.powi(j as i32);
            for (k, w) in weights.iter_mut().enumerate() {
                *w += scale * projection[(j, k)];
            }
        }
        weights
    }

    /// Convolution coefficients for the window centre.
    pub fn coefficients(&self) -> SignalResult<Vec<f64>> {
        self.validate()?;
        let projection = self.projection()?;
        Ok(Self::weights_at(&projection, 0.0))
    }

    /// Smooth one channel. Every sample must be finite.
    pub fn apply(&self, values: &[f64]) -> SignalResult<Vec<f64>> {
        self.validate()?;
        let n = values.len();
        let w = self.window_length;
        if n < w {
            return Err(SignalError::TooShort { len: n, window: w });
        }
        if let Some(index) = values.iter().position(|v| !v.is_finite()) {
            return Err(SignalError::NonFiniteSample { index });
        }

        let m = self.half_width();
        let projection = self.projection()?;
        let centre = Self::weights_at(&projection, 0.0);
        let dot = |weights: &[f64], window: &[f64]| -> f64 {
            weights.iter().zip(window).map(|(a, b)| a * b).sum()
        };

        let mut out = vec![0.0; n];
        for i in m..n - m {
            out[i] = dot(&centre, &values[i - m..=i + m]);
        }

        let head = &values[..w];
        let tail = &values[n - w..];
        for i in 0..m {
            let offset = i as f64 - m as f64;
            out[i] = dot(&Self::weights_at(&projection, offset), head);

            let j = n - m + i;
            let offset = (i + 1) as f64;
            out[j] = dot(&Self::weights_at(&projection, offset), tail);
        }

        Ok(out)
    }
}

/// Smooth many channels in parallel, preserving order.
pub fn smooth_columns(filter: &SavitzkyGolay, columns: &[Vec<f64>]) -> SignalResult<Vec<Vec<f64>>> {
    filter.validate()?;
    columns
        .par_iter()
        .map(|column| filter.apply(column))
        .collect()
}
