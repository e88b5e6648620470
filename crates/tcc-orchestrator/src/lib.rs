//! The Orchestrator component: the façade external collaborators call,
//! exposing `process_one`, `process_directory`, `predict`, and `report`.

pub mod discovery;
pub mod facade;
pub mod types;

pub use facade::TccOrchestrator;
pub use types::{DirectoryResult, ExportPaths, FrameResult, OutputPaths, PredictResult, ReportResult};
