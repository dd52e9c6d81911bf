//! NaN-aware means and baseline zeroing.

use crate::error::{SignalError, SignalResult};

/// Mean of the finite samples, or `None` when there are none.
pub fn nan_mean(values: &[f64]) -> Option<f64> {
    let (sum, count) = values
        .iter()
        .filter(|v| v.is_finite())
        .fold((0.0, 0usize), |(sum, count), v| (sum + v, count + 1));
    if count == 0 {
        None
    } else {
        Some(sum / count as f64)
    }
}

/// [`nan_mean`] over the rows where `mask` is set.
pub fn masked_mean(values: &[f64], mask: &[bool]) -> SignalResult<Option<f64>> {
    if values.len() != mask.len() {
        return Err(SignalError::MaskLength {
            mask: mask.len(),
            len: values.len(),
        });
    }
    let selected: Vec<f64> = values
        .iter()
        .zip(mask)
        .filter(|(_, keep)| **keep)
        .map(|(v, _)| *v)
        .collect();
    Ok(nan_mean(&selected))
}

/// Subtract the mean of the masked (pre-test) rows from every sample.
///
/// Returns the baseline together with the zeroed channel. Missing samples stay
/// missing.
pub fn zero_against_baseline(values: &[f64], mask: &[bool]) -> SignalResult<(f64, Vec<f64>)> {
    let baseline = masked_mean(values, mask)?.ok_or(SignalError::EmptySelection {
        what: "pre-test baseline",
    })?;
    let zeroed = values.iter().map(|v| v - baseline).collect();
    Ok((baseline, zeroed))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nan_mean_skips_missing() {
        assert_eq!(nan_mean(&[1.0, f64::NAN, 3.0]), Some(2.0));
        assert_eq!(nan_mean(&[f64::NAN]), None);
        assert_eq!(nan_mean(&[]), None);
    }

    #[test]
    fn masked_mean_uses_selected_rows() {
        let values = [1.0, 2.0, 10.0, 20.0];
        let mask = [true, true, false, false];
        assert_eq!(masked_mean(&values, &mask).unwrap(), Some(1.5));
    }

    #[test]
    fn masked_mean_rejects_length_mismatch() {
        let err = masked_mean(&[1.0, 2.0], &[true]).unwrap_err();
        assert_eq!(err, SignalError::MaskLength { mask: 1, len: 2 });
    }

    #[test]
    fn zeroing_subtracts_prestart_mean() {
        let values = [0.5, 0.7, f64::NAN, 1.6];
        let mask = [true, true, false, false];
        let (baseline, zeroed) = zero_against_baseline(&values, &mask).unwrap();
        assert!((baseline - 0.6).abs() < 1e-12);
        assert!((zeroed[0] + 0.1).abs() < 1e-12);
        assert!(zeroed[2].is_nan());
        assert!((zeroed[3] - 1.0).abs() < 1e-12);
    }

    #[test]
    fn zeroing_without_prestart_rows_fails() {
        let err = zero_against_baseline(&[1.0, 2.0], &[false, false]).unwrap_err();
        assert!(matches!(err, SignalError::EmptySelection { .. }));
    }
}
