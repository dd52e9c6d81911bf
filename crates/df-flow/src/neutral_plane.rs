//! Neutral-plane height from the vertical pressure profile.

use df_signal::{SavitzkyGolay, SignalResult};

/// Height (m) where the door pressure profile crosses zero.
///
/// Scans bottom-up for the first adjacent pair going from inflow (`ΔP > 0`)
/// to outflow (`ΔP ≤ 0`) and interpolates linearly between them. Profiles
/// without such a crossing have no neutral plane.
pub fn neutral_plane_height(heights_m: &[f64], delta_p: &[f64]) -> Option<f64> {
    heights_m
        .windows(2)
        .zip(delta_p.windows(2))
        .find(|(_, p)| p[0] > 0.0 && p[1] <= 0.0)
        .map(|(z, p)| z[0] + (z[1] - z[0]) * p[0] / (p[0] - p[1]))
}

/// Savitzky–Golay smoothing of the samples that have a neutral plane.
///
/// Samples without a plane stay `None`; the rest are smoothed as one
/// contiguous series. Fewer planes than the filter window are returned as-is.
pub fn smooth_neutral_plane(
    filter: &SavitzkyGolay,
    planes: &[Option<f64>],
) -> SignalResult<Vec<Option<f64>>> {
    let present: Vec<f64> = planes.iter().flatten().copied().collect();
    if present.len() < filter.window_length {
        return Ok(planes.to_vec());
    }
    let mut smoothed = filter.apply(&present)?.into_iter();
    Ok(planes
        .iter()
        .map(|p| p.and_then(|_| smoothed.next()))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn interpolates_between_probes() {
        let z = [0.2, 0.4, 0.6];
        let dp = [2.0, 1.0, -1.0];
        let h = neutral_plane_height(&z, &dp).unwrap();
        assert!((h - 0.5).abs() < 1e-12);
    }

    #[test]
    fn zero_reading_is_the_plane() {
        let z = [0.2, 0.4, 0.6];
        let dp = [1.0, 0.0, -1.0];
        assert!((neutral_plane_height(&z, &dp).unwrap() - 0.4).abs() < 1e-12);
    }

    #[test]
    fn no_crossing_has_no_plane() {
        assert_eq!(neutral_plane_height(&[0.2, 0.4], &[1.0, 2.0]), None);
        assert_eq!(neutral_plane_height(&[0.2, 0.4], &[-1.0, -2.0]), None);
        // Outflow below inflow is not a neutral plane.
        assert_eq!(neutral_plane_height(&[0.2, 0.4], &[-1.0, 1.0]), None);
        assert_eq!(neutral_plane_height(&[0.2], &[1.0]), None);
    }

    #[test]
    fn smoothing_keeps_gaps_and_flattens_noise() {
        let filter = SavitzkyGolay::new(5, 1).unwrap();
        let planes: Vec<Option<f64>> = (0..12)
            .map(|i| match i {
                3 | 8 => None,
                _ if i % 2 == 0 => Some(1.1),
                _ => Some(0.9),
            })
            .collect();
        let smooth = smooth_neutral_plane(&filter, &planes).unwrap();

        assert_eq!(smooth.len(), planes.len());
        assert_eq!(smooth[3], None);
        assert_eq!(smooth[8], None);
        let interior = smooth[5].unwrap();
        assert!((interior - 1.0).abs() < 0.05);
    }

    #[test]
    fn short_plane_series_is_left_alone() {
        let filter = SavitzkyGolay::new(5, 2).unwrap();
        let planes = vec![Some(1.0), None, Some(1.2), Some(0.8)];
        assert_eq!(smooth_neutral_plane(&filter, &planes).unwrap(), planes);
    }

    #[test]
    fn linear_plane_is_unchanged_by_smoothing() {
        let filter = SavitzkyGolay::new(5, 2).unwrap();
        let planes: Vec<Option<f64>> = (0..10).map(|i| Some(0.5 + 0.05 * i as f64)).collect();
        let smooth = smooth_neutral_plane(&filter, &planes).unwrap();
        for (a, b) in smooth.iter().zip(&planes) {
            assert!((a.unwrap() - b.unwrap()).abs() < 1e-9);
        }
    }

    proptest! {
        #[test]
        fn plane_lies_between_crossing_probes(
            lower in 0.001f64..50.0,
            upper in -50.0f64..=0.0,
        ) {
            let h = neutral_plane_height(&[0.4, 0.6], &[lower, upper]).unwrap();
            prop_assert!(h > 0.4 - 1e-12 && h <= 0.6 + 1e-12);
        }
    }
}
