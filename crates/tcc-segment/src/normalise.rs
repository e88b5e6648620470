//! BT → [0,1] normalisation. Pure, idempotent on its codomain.

use tcc_common::BtField;

pub const DEFAULT_MIN_K: f32 = 180.0;
pub const DEFAULT_MAX_K: f32 = 320.0;

/// Linearly maps `field` from `[min_k, max_k]` to `[0, 1]`, clamped.
pub fn normalise(field: &BtField, min_k: f32, max_k: f32) -> Vec<f32> {
    let span = max_k - min_k;
    field
        .data
        .iter()
        .map(|&k| ((k - min_k) / span).clamp(0.0, 1.0))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clamps_out_of_range_values() {
        let field = BtField::new(vec![100.0, 180.0, 250.0, 320.0, 400.0], 5, 1);
        let normed = normalise(&field, DEFAULT_MIN_K, DEFAULT_MAX_K);
        assert_eq!(normed[0], 0.0);
        assert_eq!(normed[1], 0.0);
        assert_eq!(normed[3], 1.0);
        assert_eq!(normed[4], 1.0);
        assert!((normed[2] - 0.5).abs() < 0.001);
    }

    #[test]
    fn is_idempotent_on_codomain() {
        let field = BtField::new(vec![150.0, 200.0, 300.0, 400.0], 4, 1);
        let once = normalise(&field, DEFAULT_MIN_K, DEFAULT_MAX_K);
        let once_field = BtField::new(once.clone(), 4, 1);
        // Re-normalising an already-[0,1] array with the same physical
        // bounds must not change already-clamped values further.
        let twice = normalise(&once_field, DEFAULT_MIN_K, DEFAULT_MAX_K);
        for (a, b) in once.iter().zip(twice.iter()) {
            assert_eq!(a.clamp(0.0, 1.0), *b);
        }
    }

    #[test]
    fn empty_input_yields_empty_output() {
        let field = BtField::new(vec![], 0, 0);
        assert!(normalise(&field, DEFAULT_MIN_K, DEFAULT_MAX_K).is_empty());
    }
}
