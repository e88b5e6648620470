//! Façade result types: the structured dictionaries returned by
//! `process_one`, `process_directory`, `predict`, and `report`.

use std::collections::HashMap;
use std::path::PathBuf;

use serde::Serialize;
use tcc_common::Cluster;
use tcc_render::{AnalysisReport, PredictionsReport};
use tcc_tracker::Prediction;

/// Where a successful `process_one` call wrote its three artefacts.
#[derive(Debug, Clone, Serialize)]
pub struct OutputPaths {
    pub mask_npy: PathBuf,
    pub mask_png: PathBuf,
    pub netcdf: PathBuf,
}

/// Result of one `process_one` call. `success = false` covers every
/// recoverable Ingest/Model failure; serialisation failures are raised
/// instead of represented here.
#[derive(Debug, Clone, Serialize)]
pub struct FrameResult {
    pub success: bool,
    pub id: String,
    pub error: Option<String>,
    pub pixel_count: usize,
    pub cluster_count: usize,
    pub total_area_km2: f64,
    pub clusters: Vec<Cluster>,
    pub output_paths: Option<OutputPaths>,
}

impl FrameResult {
    pub fn failure(id: String, error: String) -> Self {
        Self {
            success: false,
            id,
            error: Some(error),
            pixel_count: 0,
            cluster_count: 0,
            total_area_km2: 0.0,
            clusters: Vec::new(),
            output_paths: None,
        }
    }
}

/// The file paths produced by a batch run's trajectory/report exports.
#[derive(Debug, Clone, Serialize)]
pub struct ExportPaths {
    pub trajectory_csv: PathBuf,
    pub trajectory_nc: PathBuf,
    pub tcc_analysis_json: Option<PathBuf>,
    pub tcc_predictions_json: Option<PathBuf>,
}

/// Result of `process_directory`.
#[derive(Debug, Clone, Serialize)]
pub struct DirectoryResult {
    pub files_processed: usize,
    pub files_failed: usize,
    pub total_observations: usize,
    pub active_tracks: usize,
    pub export_paths: ExportPaths,
}

/// One flattened prediction row, mirroring [`tcc_render::reports::PredictionRow`].
#[derive(Debug, Clone, Serialize)]
pub struct PredictResult {
    pub predictions: HashMap<u32, Vec<Prediction>>,
    pub active_tracks: usize,
    pub interval_h: f64,
    pub total_steps: u32,
    pub generated_at_iso: String,
}

/// Result of `report(out_dir)`.
#[derive(Debug, Clone, Serialize)]
pub struct ReportResult {
    pub status: String,
    pub metadata: serde_json::Value,
    pub exports: ExportPaths,
    pub summary: AnalysisReport,
}

/// Adapter used only to reuse [`tcc_render::reports::flatten_predictions`],
/// which expects a `BTreeMap` for deterministic ordering.
pub fn to_predictions_report(
    predictions: &HashMap<u32, Vec<Prediction>>,
    interval_h: f64,
    total_steps: u32,
    generated_at: String,
) -> PredictionsReport {
    use std::collections::BTreeMap;
    use tcc_render::reports::{flatten_predictions, PredictionRow};

    let ordered: BTreeMap<u32, Vec<Prediction>> = predictions.iter().map(|(k, v)| (*k, v.clone())).collect();
    let rows = flatten_predictions(&ordered, |p: &Prediction| PredictionRow {
        track_id: p.track_id,
        step: p.step,
        hours_ahead: p.hours_ahead,
        lat: p.lat,
        lon: p.lon,
        speed_km: p.speed_km,
        direction_deg: p.direction_deg,
        confidence: p.confidence,
    });

    PredictionsReport {
        generated_at,
        interval_h,
        total_steps,
        predictions: rows,
    }
}
