//! Top-level error type raised across the orchestrator boundary. Ingest and
//! model failures are recoverable by design and never reach this type; they
//! are caught at the façade and reported as `{success: false, error}`. Only
//! a serialisation failure, or an I/O failure incidental to writing report
//! artefacts, is ever raised out of a frame.

use thiserror::Error;

/// Result type alias using [`TccError`].
pub type Result<T> = std::result::Result<T, TccError>;

/// The error kinds the orchestrator façade ever raises. Crates that detect a
/// specific failure keep their own granular enum (`IngestError`,
/// `ModelError`, `SerialiseError`); only `SerialiseError` is ever converted
/// into this one, at the `process_one`/`process_directory`/`report`
/// boundary, since "no partial successes" means serialisation failures must
/// propagate rather than degrade.
#[derive(Debug, Error)]
pub enum TccError {
    #[error("serialise error: {0}")]
    Serialise(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
