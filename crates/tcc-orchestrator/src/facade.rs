//! The Orchestrator façade: wires Ingest → Segmenter → Post-processor →
//! Tracker → Serialiser behind `process_one`, `process_directory`,
//! `predict`, and `report`.

use std::path::Path;
use std::sync::Arc;

use chrono::Utc;
use tcc_common::{PipelineConfig, Result as CommonResult, TccError, TrackedObservation};
use tcc_segment::SegmenterBackend;
use tcc_tracker::TccTracker;
use tracing::{error, info, warn};

use crate::discovery::discover_containers;
use crate::types::{
    to_predictions_report, DirectoryResult, ExportPaths, FrameResult, OutputPaths, PredictResult, ReportResult,
};

/// Per-directory run statistics, kept so `report()` can describe the most
/// recent `process_directory` call even when invoked separately.
#[derive(Debug, Clone, Default)]
struct RunStats {
    files_processed: usize,
    files_failed: usize,
}

/// Owns the segmenter backend and the stateful tracker for one processing
/// session. A single orchestrator instance is not shared across concurrent
/// callers; parallelism happens across independent instances.
pub struct TccOrchestrator {
    config: PipelineConfig,
    backend: Arc<dyn SegmenterBackend>,
    tracker: TccTracker,
    observations: Vec<TrackedObservation>,
    last_run: RunStats,
}

impl TccOrchestrator {
    pub fn new(config: PipelineConfig, backend: Arc<dyn SegmenterBackend>) -> Self {
        Self {
            tracker: TccTracker::new(config.clone()),
            config,
            backend,
            observations: Vec::new(),
            last_run: RunStats::default(),
        }
    }

    /// Runs the full per-frame pipeline on one granule. Ingest/model
    /// failures are caught and reported as `{success: false, error}`;
    /// serialisation failures are raised.
    pub fn process_one(&mut self, path: &Path, out_dir: &Path, id: Option<String>) -> CommonResult<FrameResult> {
        let id = id.unwrap_or_else(|| {
            path.file_stem()
                .and_then(|s| s.to_str())
                .unwrap_or("unknown")
                .to_string()
        });

        let (bt, geo, parsed_timestamp) = match tcc_ingest::open(path, &self.config) {
            Ok(opened) => opened,
            Err(err) => {
                warn!(path = %path.display(), error = %err, "process_one: ingest failed");
                return Ok(FrameResult::failure(id, err.to_string()));
            }
        };

        let prob = match tcc_segment::infer(
            &bt,
            self.backend.as_ref(),
            tcc_segment::normalise::DEFAULT_MIN_K,
            tcc_segment::normalise::DEFAULT_MAX_K,
        ) {
            Ok(prob) => prob,
            Err(err) => {
                warn!(path = %path.display(), error = %err, "process_one: model inference failed");
                return Ok(FrameResult::failure(id, err.to_string()));
            }
        };

        let (mask, clusters) = tcc_postprocess::derive(&prob, &bt, &geo, &self.config);
        let timestamp = parsed_timestamp.unwrap_or_else(Utc::now);

        let tracked = self.tracker.update(&clusters, &timestamp.to_rfc3339());
        self.observations.extend(tracked);

        let frame_dir = out_dir.join(&id);
        let output_paths = OutputPaths {
            mask_npy: frame_dir.join("mask.npy"),
            mask_png: frame_dir.join("mask.png"),
            netcdf: frame_dir.join("output.nc"),
        };

        if let Err(err) = self.write_frame_outputs(&bt, &prob, &mask, &geo, timestamp, &clusters, &output_paths) {
            error!(path = %path.display(), error = %err, "process_one: serialisation failed, removing partial output");
            Self::remove_partial(&output_paths);
            return Err(TccError::Serialise(err.to_string()));
        }

        let total_area_km2: f64 = clusters.iter().map(|c| c.area_km2).sum();
        info!(id = %id, cluster_count = clusters.len(), "process_one complete");

        Ok(FrameResult {
            success: true,
            id,
            error: None,
            pixel_count: mask.count_foreground(),
            cluster_count: clusters.len(),
            total_area_km2,
            clusters,
            output_paths: Some(output_paths),
        })
    }

    #[allow(clippy::too_many_arguments)]
    fn write_frame_outputs(
        &self,
        bt: &tcc_common::BtField,
        prob: &tcc_common::ProbMap,
        mask: &tcc_common::Mask,
        geo: &tcc_common::GeoGrid,
        timestamp: chrono::DateTime<Utc>,
        clusters: &[tcc_common::Cluster],
        paths: &OutputPaths,
    ) -> tcc_render::Result<()> {
        tcc_render::write_binary_mask(mask, &paths.mask_npy)?;
        tcc_render::write_png(mask, &paths.mask_png)?;
        tcc_render::write_netcdf(bt, prob, mask, geo, timestamp, clusters, &self.config, &paths.netcdf)?;
        Ok(())
    }

    /// No partial successes for per-frame output: remove whatever subset
    /// of the three artefacts made it to disk before the failure.
    fn remove_partial(paths: &OutputPaths) {
        let _ = std::fs::remove_file(&paths.mask_npy);
        let _ = std::fs::remove_file(&paths.mask_png);
        let _ = std::fs::remove_file(&paths.netcdf);
    }

    /// Discovers containers recursively, sorts by filename, resets the
    /// tracker, processes each, and invokes the trajectory serialisers.
    pub fn process_directory(&mut self, in_dir: &Path, out_dir: &Path) -> CommonResult<DirectoryResult> {
        self.tracker.reset();
        self.observations.clear();

        let containers = discover_containers(in_dir);
        let mut files_processed = 0usize;
        let mut files_failed = 0usize;

        for path in &containers {
            let id = path.file_stem().and_then(|s| s.to_str()).map(|s| s.to_string());
            let result = self.process_one(path, out_dir, id)?;
            if result.success {
                files_processed += 1;
            } else {
                files_failed += 1;
            }
        }

        self.last_run = RunStats {
            files_processed,
            files_failed,
        };

        let export_paths = ExportPaths {
            trajectory_csv: out_dir.join("trajectory.csv"),
            trajectory_nc: out_dir.join("trajectory.nc"),
            tcc_analysis_json: None,
            tcc_predictions_json: None,
        };
        tcc_render::write_trajectory_csv(&self.observations, &export_paths.trajectory_csv)
            .map_err(|e| TccError::Serialise(e.to_string()))?;
        tcc_render::write_trajectory_netcdf(&self.observations, &export_paths.trajectory_nc)
            .map_err(|e| TccError::Serialise(e.to_string()))?;

        info!(
            files_processed,
            files_failed,
            active_tracks = self.tracker.active_track_count(),
            "process_directory complete"
        );

        Ok(DirectoryResult {
            files_processed,
            files_failed,
            total_observations: self.observations.len(),
            active_tracks: self.tracker.active_track_count(),
            export_paths,
        })
    }

    /// Extrapolates every eligible track `steps` steps ahead.
    pub fn predict(&self, steps: u32) -> PredictResult {
        let predictions = self.tracker.predict_future(steps, self.config.prediction_interval_h);
        PredictResult {
            active_tracks: self.tracker.active_track_count(),
            interval_h: self.config.prediction_interval_h,
            total_steps: steps,
            generated_at_iso: Utc::now().to_rfc3339(),
            predictions,
        }
    }

    /// Writes the full reporting artefact set (`trajectory.{csv,nc}`,
    /// `tcc_analysis.json`, `tcc_predictions.json`) and returns the
    /// façade's summary dictionary.
    pub fn report(&self, out_dir: &Path) -> CommonResult<ReportResult> {
        std::fs::create_dir_all(out_dir)?;

        let trajectory_csv = out_dir.join("tcc_trajectory.csv");
        let trajectory_nc = out_dir.join("tcc_trajectory.nc");
        let analysis_json = out_dir.join("tcc_analysis.json");
        let predictions_json = out_dir.join("tcc_predictions.json");

        tcc_render::write_trajectory_csv(&self.observations, &trajectory_csv)
            .map_err(|e| TccError::Serialise(e.to_string()))?;
        tcc_render::write_trajectory_netcdf(&self.observations, &trajectory_nc)
            .map_err(|e| TccError::Serialise(e.to_string()))?;

        let generated_at = Utc::now().to_rfc3339();
        let summary = tcc_render::reports::AnalysisReport {
            files_processed: self.last_run.files_processed,
            files_failed: self.last_run.files_failed,
            total_observations: self.observations.len(),
            active_tracks: self.tracker.active_track_count(),
            class_counts: tcc_render::reports::class_counts(&self.observations),
            generated_at: generated_at.clone(),
        };
        tcc_render::write_analysis_json(&summary, &analysis_json).map_err(|e| TccError::Serialise(e.to_string()))?;

        let predict_steps = 4;
        let predictions = self.predict(predict_steps);
        let predictions_report = to_predictions_report(
            &predictions.predictions,
            predictions.interval_h,
            predictions.total_steps,
            generated_at,
        );
        tcc_render::write_predictions_json(&predictions_report, &predictions_json)
            .map_err(|e| TccError::Serialise(e.to_string()))?;

        let exports = ExportPaths {
            trajectory_csv,
            trajectory_nc,
            tcc_analysis_json: Some(analysis_json),
            tcc_predictions_json: Some(predictions_json),
        };

        Ok(ReportResult {
            status: "ok".to_string(),
            metadata: serde_json::json!({
                "config": self.config,
            }),
            exports,
            summary,
        })
    }
}
