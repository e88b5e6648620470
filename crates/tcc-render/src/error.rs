//! Serialise error kind. The only place a partially written artefact is
//! worse than none, so these always propagate.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, SerialiseError>;

#[derive(Debug, Error)]
pub enum SerialiseError {
    #[error("output path not writable: {0}")]
    PathNotWritable(String),

    #[error("encoder unavailable: {0}")]
    EncoderUnavailable(String),
}

impl From<std::io::Error> for SerialiseError {
    fn from(err: std::io::Error) -> Self {
        SerialiseError::PathNotWritable(err.to_string())
    }
}

impl From<netcdf::Error> for SerialiseError {
    fn from(err: netcdf::Error) -> Self {
        SerialiseError::EncoderUnavailable(err.to_string())
    }
}

impl From<serde_json::Error> for SerialiseError {
    fn from(err: serde_json::Error) -> Self {
        SerialiseError::EncoderUnavailable(err.to_string())
    }
}
