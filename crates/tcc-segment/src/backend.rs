//! The segmenter backend seam: dispatch across hardware backends is an
//! implementation concern hidden behind the Segmenter contract.

use crate::error::Result;

/// A frozen model that maps a 512×512 normalised tile to a 512×512
/// per-pixel foreground probability. Implementations own whatever hardware
/// dispatch (CPU/GPU, batching) they need; nothing outside this trait
/// observes the choice.
pub trait SegmenterBackend: Send + Sync {
    /// `tile` is exactly 512*512 normalised values in row-major order.
    /// Returns exactly 512*512 probabilities in [0, 1], same order.
    fn infer(&self, tile: &[f32]) -> Result<Vec<f32>>;
}

/// Applies the logistic function to raw logits, turning them into
/// probabilities via a logistic transfer.
pub fn sigmoid(logits: &[f32]) -> Vec<f32> {
    logits.iter().map(|&x| 1.0 / (1.0 + (-x).exp())).collect()
}
