//! ONNX Runtime-backed segmenter: the production `SegmenterBackend`.

use std::path::Path;
use std::sync::Mutex;

use ort::session::{builder::GraphOptimizationLevel, Session};
use ort::value::Tensor;
use tracing::info;

use crate::backend::{sigmoid, SegmenterBackend};
use crate::error::{ModelError, Result};

const TILE: usize = 512;

/// Wraps a frozen ONNX U-Net-style encoder-decoder, loaded once at
/// construction and treated as read-only thereafter: trained model
/// weights are loaded once per orchestrator.
pub struct OnnxSegmenter {
    session: Mutex<Session>,
}

impl OnnxSegmenter {
    pub fn load(weights_path: &Path) -> Result<Self> {
        if !weights_path.exists() {
            return Err(ModelError::WeightsMissing(weights_path.display().to_string()));
        }

        let session = Session::builder()
            .map_err(|e| ModelError::WeightsMissing(e.to_string()))?
            .with_optimization_level(GraphOptimizationLevel::Level3)
            .map_err(|e| ModelError::WeightsMissing(e.to_string()))?
            .commit_from_file(weights_path)
            .map_err(|e| ModelError::WeightsMissing(e.to_string()))?;

        info!(path = %weights_path.display(), "loaded segmenter weights");

        Ok(Self {
            session: Mutex::new(session),
        })
    }
}

impl SegmenterBackend for OnnxSegmenter {
    fn infer(&self, tile: &[f32]) -> Result<Vec<f32>> {
        if tile.len() != TILE * TILE {
            return Err(ModelError::ShapeIncompatible(format!(
                "expected {} input values, got {}",
                TILE * TILE,
                tile.len()
            )));
        }

        let input = Tensor::from_array(([1usize, 1, TILE, TILE], tile.to_vec()))
            .map_err(|e| ModelError::ShapeIncompatible(e.to_string()))?;

        let mut session = self
            .session
            .lock()
            .map_err(|_| ModelError::ShapeIncompatible("segmenter session poisoned".to_string()))?;

        let outputs = session
            .run(ort::inputs![input])
            .map_err(|e| ModelError::ShapeIncompatible(e.to_string()))?;

        let (_, logits) = outputs[0]
            .try_extract_tensor::<f32>()
            .map_err(|e| ModelError::ShapeIncompatible(e.to_string()))?;

        if logits.len() != TILE * TILE {
            return Err(ModelError::ShapeIncompatible(format!(
                "expected {} output values, got {}",
                TILE * TILE,
                logits.len()
            )));
        }

        Ok(sigmoid(logits))
    }
}
