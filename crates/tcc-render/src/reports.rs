//! Run-summary JSON exports (`tcc_analysis.json`, `tcc_predictions.json`),
//! grounded on `pipeline.py`'s `generate_report()`.

use std::collections::BTreeMap;
use std::path::Path;

use serde::Serialize;
use tcc_common::TrackedObservation;

use crate::error::Result;

/// Per-classification observation counts for the run summary.
#[derive(Debug, Clone, Serialize)]
pub struct ClassCounts {
    pub confirmed_tcc: usize,
    pub likely_tcc: usize,
    pub cloud_cluster: usize,
}

/// Run-summary payload for `tcc_analysis.json`.
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisReport {
    pub files_processed: usize,
    pub files_failed: usize,
    pub total_observations: usize,
    pub active_tracks: usize,
    pub class_counts: ClassCounts,
    pub generated_at: String,
}

pub fn class_counts(observations: &[TrackedObservation]) -> ClassCounts {
    use tcc_common::Classification;

    let mut counts = ClassCounts {
        confirmed_tcc: 0,
        likely_tcc: 0,
        cloud_cluster: 0,
    };
    for obs in observations {
        match obs.classification {
            Classification::ConfirmedTcc => counts.confirmed_tcc += 1,
            Classification::LikelyTcc => counts.likely_tcc += 1,
            Classification::CloudCluster => counts.cloud_cluster += 1,
        }
    }
    counts
}

pub fn write_analysis_json(report: &AnalysisReport, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let json = serde_json::to_string_pretty(report)?;
    std::fs::write(path, json)?;
    Ok(())
}

/// One serialisable prediction row, flattened from the tracker's
/// `track_id -> [Prediction]` map for JSON export.
#[derive(Debug, Clone, Serialize)]
pub struct PredictionRow {
    pub track_id: u32,
    pub step: u32,
    pub hours_ahead: f64,
    pub lat: f64,
    pub lon: f64,
    pub speed_km: f64,
    pub direction_deg: f64,
    pub confidence: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct PredictionsReport {
    pub generated_at: String,
    pub interval_h: f64,
    pub total_steps: u32,
    pub predictions: Vec<PredictionRow>,
}

/// Flattens a `track_id -> predictions` map (as returned by
/// `TccTracker::predict_future`) into the serialisable row list, preserving
/// ascending track id order for deterministic output.
pub fn flatten_predictions<T>(by_track: &BTreeMap<u32, Vec<T>>, to_row: impl Fn(&T) -> PredictionRow) -> Vec<PredictionRow> {
    let mut rows = Vec::new();
    for predictions in by_track.values() {
        for p in predictions {
            rows.push(to_row(p));
        }
    }
    rows
}

pub fn write_predictions_json(report: &PredictionsReport, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let json = serde_json::to_string_pretty(report)?;
    std::fs::write(path, json)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tcc_common::{BtStats, Classification, Cluster, Intensity, ShapeMetrics};

    fn observation(classification: Classification) -> TrackedObservation {
        let min_bt = match classification {
            Classification::ConfirmedTcc => 210.0,
            Classification::LikelyTcc => 225.0,
            Classification::CloudCluster => 240.0,
        };
        let cluster = Cluster {
            id: 1,
            pixel_coords: vec![],
            pixel_centroid: (0.0, 0.0),
            geo_centroid: (0.0, 0.0),
            pixel_count: 10,
            area_km2: 160.0,
            radius_km: 7.1,
            bt_stats: BtStats { min: min_bt, max: min_bt, mean: min_bt, std: 0.0 },
            shape: ShapeMetrics::default(),
            cloud_top_height_km: 5.0,
            intensity: Intensity::from_min_bt(min_bt),
            classification,
        };
        TrackedObservation::from_cluster(&cluster, 1, "t0".to_string(), 1)
    }

    #[test]
    fn class_counts_tally_by_classification() {
        let observations = vec![
            observation(Classification::ConfirmedTcc),
            observation(Classification::ConfirmedTcc),
            observation(Classification::LikelyTcc),
            observation(Classification::CloudCluster),
        ];
        let counts = class_counts(&observations);
        assert_eq!(counts.confirmed_tcc, 2);
        assert_eq!(counts.likely_tcc, 1);
        assert_eq!(counts.cloud_cluster, 1);
    }

    #[test]
    fn writes_analysis_json_to_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tcc_analysis.json");
        let report = AnalysisReport {
            files_processed: 3,
            files_failed: 0,
            total_observations: 5,
            active_tracks: 2,
            class_counts: class_counts(&[observation(Classification::ConfirmedTcc)]),
            generated_at: "2023-11-30T00:45:00Z".to_string(),
        };
        write_analysis_json(&report, &path).unwrap();
        let contents = std::fs::read_to_string(&path).unwrap();
        assert!(contents.contains("\"files_processed\": 3"));
    }
}
