//! Ingest error kind.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, IngestError>;

#[derive(Debug, Error)]
pub enum IngestError {
    #[error("granule file not found: {0}")]
    MissingFile(String),

    #[error("granule container unreadable: {0}")]
    UnreadableContainer(String),

    #[error("no IR dataset found among candidate names")]
    NoIrDataset,

    #[error("geolocation shape mismatch: IR is {ir_shape:?}, geolocation is {geo_shape:?}")]
    ShapeMismatch {
        ir_shape: (usize, usize),
        geo_shape: (usize, usize),
    },
}

impl From<std::io::Error> for IngestError {
    fn from(err: std::io::Error) -> Self {
        IngestError::UnreadableContainer(err.to_string())
    }
}

impl From<netcdf::Error> for IngestError {
    fn from(err: netcdf::Error) -> Self {
        IngestError::UnreadableContainer(err.to_string())
    }
}
