//! A deterministic `SegmenterBackend` used in tests in place of a loaded
//! ONNX model. Never wired into the CLI or orchestrator defaults.

use crate::backend::SegmenterBackend;
use crate::error::Result;

/// Always reports the given constant probability for every pixel.
pub struct ConstantSegmenter {
    pub probability: f32,
}

impl SegmenterBackend for ConstantSegmenter {
    fn infer(&self, tile: &[f32]) -> Result<Vec<f32>> {
        Ok(vec![self.probability; tile.len()])
    }
}

/// Passes the normalised input straight through as the probability, useful
/// for exercising the resample round-trip without a real model.
pub struct IdentitySegmenter;

impl SegmenterBackend for IdentitySegmenter {
    fn infer(&self, tile: &[f32]) -> Result<Vec<f32>> {
        Ok(tile.to_vec())
    }
}
