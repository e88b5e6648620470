//! The Segmenter component: normalises a brightness-temperature field,
//! tiles it to the frozen model's fixed input shape, runs inference
//! through a [`SegmenterBackend`], and resamples the result back to the
//! field's native resolution.

pub mod backend;
pub mod error;
pub mod normalise;
pub mod onnx_backend;
pub mod resample;
pub mod stub_backend;

pub use backend::SegmenterBackend;
pub use error::{ModelError, Result};

use tcc_common::{BtField, ProbMap};

const TILE: usize = 512;

/// Runs the full inference contract: `infer(normalised, native_shape) ->
/// ProbMap at native_shape`.
pub fn infer(field: &BtField, backend: &dyn SegmenterBackend, min_k: f32, max_k: f32) -> Result<ProbMap> {
    let normalised = normalise::normalise(field, min_k, max_k);

    let tiled = resample::resample_bilinear(&normalised, field.width, field.height, TILE, TILE);
    let probabilities = backend.infer(&tiled)?;

    let native = resample::resample_bilinear(&probabilities, TILE, TILE, field.width, field.height);

    Ok(ProbMap::new(native, field.width, field.height))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stub_backend::ConstantSegmenter;

    #[test]
    fn empty_sky_yields_uniform_low_probability() {
        let field = BtField::new(vec![300.0; 16 * 16], 16, 16);
        let backend = ConstantSegmenter { probability: 0.0 };
        let result = infer(&field, &backend, normalise::DEFAULT_MIN_K, normalise::DEFAULT_MAX_K).unwrap();
        assert_eq!(result.width, 16);
        assert_eq!(result.height, 16);
        assert!(result.data.iter().all(|&p| p == 0.0));
    }

    #[test]
    fn constant_high_probability_survives_resample_round_trip() {
        let field = BtField::new(vec![190.0; 64 * 48], 64, 48);
        let backend = ConstantSegmenter { probability: 1.0 };
        let result = infer(&field, &backend, normalise::DEFAULT_MIN_K, normalise::DEFAULT_MAX_K).unwrap();
        assert_eq!(result.data.len(), 64 * 48);
        assert!(result.data.iter().all(|&p| (p - 1.0).abs() < 1e-6));
    }
}
