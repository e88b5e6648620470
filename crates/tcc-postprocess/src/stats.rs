//! BT statistics and intensity diagnostics, grounded on `thresholding.py`'s
//! `get_bt_statistics`/`estimate_convective_intensity`. These are pure
//! helpers over a raw BT sample, independent of a full pipeline run, used
//! by feature extraction and exposed for CLI diagnostics.

use tcc_common::{BtStats, Intensity};

/// Computes {min, max, mean, std} over `values`. Returns the all-zero
/// statistics if `values` is empty rather than dividing by zero.
pub fn get_bt_statistics(values: &[f32]) -> BtStats {
    if values.is_empty() {
        return BtStats {
            min: 0.0,
            max: 0.0,
            mean: 0.0,
            std: 0.0,
        };
    }

    let min = values.iter().copied().fold(f32::INFINITY, f32::min);
    let max = values.iter().copied().fold(f32::NEG_INFINITY, f32::max);
    let mean = values.iter().sum::<f32>() / values.len() as f32;
    let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f32>() / values.len() as f32;

    BtStats {
        min,
        max,
        mean,
        std: variance.sqrt(),
    }
}

/// Coarse intensity estimate from a sample's minimum BT, using the same
/// intensity keying. A thin wrapper over [`Intensity::from_min_bt`] kept
/// here for symmetry with `get_bt_statistics` at the diagnostics call site.
pub fn estimate_convective_intensity(values: &[f32]) -> Intensity {
    let min_bt = values.iter().copied().fold(f32::INFINITY, f32::min);
    Intensity::from_min_bt(if min_bt.is_finite() { min_bt } else { f32::MAX })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_sample_yields_zeroed_statistics() {
        let stats = get_bt_statistics(&[]);
        assert_eq!(stats.min, 0.0);
        assert_eq!(stats.mean, 0.0);
    }

    #[test]
    fn computes_min_mean_max_std() {
        let stats = get_bt_statistics(&[190.0, 200.0, 210.0]);
        assert_eq!(stats.min, 190.0);
        assert_eq!(stats.max, 210.0);
        assert!((stats.mean - 200.0).abs() < 1e-6);
    }

    #[test]
    fn intensity_keyed_on_minimum_of_sample() {
        let intensity = estimate_convective_intensity(&[250.0, 185.0, 230.0]);
        assert_eq!(intensity, Intensity::Extreme);
    }

    #[test]
    fn empty_sample_yields_none_intensity() {
        assert_eq!(estimate_convective_intensity(&[]), Intensity::None);
    }
}
