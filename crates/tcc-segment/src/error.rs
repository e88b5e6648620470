//! Model error kind.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, ModelError>;

#[derive(Debug, Error)]
pub enum ModelError {
    #[error("model weights not found: {0}")]
    WeightsMissing(String),

    #[error("model input/output shape incompatible: {0}")]
    ShapeIncompatible(String),
}
