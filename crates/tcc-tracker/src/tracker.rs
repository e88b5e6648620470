//! The multi-object tracker: Kalman-filtered constant-velocity tracks,
//! Hungarian assignment, lost-track eviction.

use std::collections::HashMap;

use serde::Serialize;
use tcc_common::{haversine_km, Cluster, PipelineConfig, TrackedObservation};
use tracing::{debug, info};

use crate::hungarian::assignment;
use crate::kalman::KalmanFilter;

struct Track {
    id: u32,
    kalman: KalmanFilter,
    frames_since_update: u32,
    observation_count: u32,
    history: Vec<TrackedObservation>,
}

/// A single extrapolated future position.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Prediction {
    pub track_id: u32,
    pub step: u32,
    pub hours_ahead: f64,
    pub lat: f64,
    pub lon: f64,
    pub speed_km: f64,
    pub direction_deg: f64,
    pub confidence: f64,
}

const KM_PER_DEGREE: f64 = 111.0;

pub struct TccTracker {
    tracks: HashMap<u32, Track>,
    next_id: u32,
    config: PipelineConfig,
}

impl TccTracker {
    pub fn new(config: PipelineConfig) -> Self {
        Self {
            tracks: HashMap::new(),
            next_id: 1,
            config,
        }
    }

    /// Runs one frame of the tracker update algorithm.
    pub fn update(&mut self, clusters: &[Cluster], timestamp: &str) -> Vec<TrackedObservation> {
        for track in self.tracks.values_mut() {
            track.kalman.predict();
            track.frames_since_update += 1;
        }

        if clusters.is_empty() {
            self.evict_lost_tracks();
            return Vec::new();
        }

        let mut track_ids: Vec<u32> = self.tracks.keys().copied().collect();
        track_ids.sort_unstable();

        let cost: Vec<Vec<f64>> = clusters
            .iter()
            .map(|cluster| {
                track_ids
                    .iter()
                    .map(|id| {
                        let (lat, lon) = self.tracks[id].kalman.position();
                        haversine_km(cluster.geo_centroid.0, cluster.geo_centroid.1, lat, lon)
                    })
                    .collect()
            })
            .collect();

        let assigned = assignment(&cost, clusters.len(), track_ids.len());

        let mut results = Vec::with_capacity(clusters.len());
        let mut claimed_clusters = vec![false; clusters.len()];

        for (cluster_idx, maybe_track_idx) in assigned.iter().enumerate() {
            let Some(track_idx) = maybe_track_idx else {
                continue;
            };
            let distance = cost[cluster_idx][*track_idx];
            if distance > self.config.max_track_distance_km {
                continue;
            }

            let track_id = track_ids[*track_idx];
            let cluster = &clusters[cluster_idx];
            let track = self.tracks.get_mut(&track_id).expect("assigned track must exist");

            track.kalman.update(cluster.geo_centroid);
            track.frames_since_update = 0;
            track.observation_count += 1;

            let observation = TrackedObservation::from_cluster(cluster, track_id, timestamp.to_string(), track.observation_count);
            track.history.push(observation.clone());
            results.push(observation);
            claimed_clusters[cluster_idx] = true;
        }

        for (cluster_idx, cluster) in clusters.iter().enumerate() {
            if claimed_clusters[cluster_idx] {
                continue;
            }
            let track_id = self.next_id;
            self.next_id += 1;

            let kalman = KalmanFilter::new(
                cluster.geo_centroid.0,
                cluster.geo_centroid.1,
                self.config.kalman_process_noise,
                self.config.kalman_measurement_noise,
            );

            let observation = TrackedObservation::from_cluster(cluster, track_id, timestamp.to_string(), 1);
            let track = Track {
                id: track_id,
                kalman,
                frames_since_update: 0,
                observation_count: 1,
                history: vec![observation.clone()],
            };
            self.tracks.insert(track_id, track);
            results.push(observation);
        }

        self.evict_lost_tracks();
        debug!(active_tracks = self.tracks.len(), observations = results.len(), "tracker update complete");
        results
    }

    fn evict_lost_tracks(&mut self) {
        let before = self.tracks.len();
        self.tracks.retain(|_, track| track.frames_since_update <= self.config.track_lost_threshold);
        let evicted = before - self.tracks.len();
        if evicted > 0 {
            info!(evicted, "evicted lost tracks");
        }
    }

    /// Extrapolates every track with at least 2 observations `steps` steps
    /// ahead.
    pub fn predict_future(&self, steps: u32, interval_h: f64) -> HashMap<u32, Vec<Prediction>> {
        let mut out = HashMap::new();
        for track in self.tracks.values() {
            if track.observation_count < 2 {
                continue;
            }
            let states = track.kalman.extrapolate(steps);
            let predictions = states
                .into_iter()
                .enumerate()
                .map(|(i, (lat, lon, v_lat, v_lon))| {
                    let step = (i + 1) as u32;
                    let speed_km = (v_lat * v_lat + v_lon * v_lon).sqrt() * KM_PER_DEGREE;
                    let direction_deg = v_lon.atan2(v_lat).to_degrees().rem_euclid(360.0);
                    let confidence = (1.0 - 0.1 * step as f64).max(0.3);
                    Prediction {
                        track_id: track.id,
                        step,
                        hours_ahead: step as f64 * interval_h,
                        lat,
                        lon,
                        speed_km,
                        direction_deg,
                        confidence,
                    }
                })
                .collect();
            out.insert(track.id, predictions);
        }
        out
    }

    /// Clears all tracks and resets `next_id` to 1.
    pub fn reset(&mut self) {
        self.tracks.clear();
        self.next_id = 1;
    }

    pub fn active_track_count(&self) -> usize {
        self.tracks.len()
    }

    pub fn history(&self, track_id: u32) -> Option<&[TrackedObservation]> {
        self.tracks.get(&track_id).map(|t| t.history.as_slice())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tcc_common::{BtStats, Classification, Cluster, Intensity, ShapeMetrics};

    fn make_cluster(id: u32, lat: f64, lon: f64) -> Cluster {
        Cluster {
            id,
            pixel_coords: vec![],
            pixel_centroid: (0.0, 0.0),
            geo_centroid: (lat, lon),
            pixel_count: 100,
            area_km2: 1600.0,
            radius_km: 22.6,
            bt_stats: BtStats { min: 200.0, max: 210.0, mean: 205.0, std: 2.0 },
            shape: ShapeMetrics::default(),
            cloud_top_height_km: 10.0,
            intensity: Intensity::Strong,
            classification: Classification::ConfirmedTcc,
        }
    }

    #[test]
    fn two_frame_tracking_preserves_id_and_increments_length() {
        let mut tracker = TccTracker::new(PipelineConfig::default());
        let frame_a = vec![make_cluster(1, 15.0, 80.0)];
        let out_a = tracker.update(&frame_a, "t0");
        assert_eq!(out_a.len(), 1);
        assert_eq!(out_a[0].track_id, 1);
        assert_eq!(out_a[0].track_length, 1);

        let frame_b = vec![make_cluster(1, 15.1, 80.1)];
        let out_b = tracker.update(&frame_b, "t1");
        assert_eq!(out_b[0].track_id, 1);
        assert_eq!(out_b[0].track_length, 2);
    }

    #[test]
    fn lost_track_is_evicted_after_threshold_empty_frames() {
        let mut tracker = TccTracker::new(PipelineConfig::default());
        tracker.update(&[make_cluster(1, 15.0, 80.0)], "t0");

        tracker.update(&[], "t1");
        assert_eq!(tracker.active_track_count(), 1);
        tracker.update(&[], "t2");
        assert_eq!(tracker.active_track_count(), 1);
        tracker.update(&[], "t3");
        assert_eq!(tracker.active_track_count(), 1);
        tracker.update(&[], "t4");
        assert_eq!(tracker.active_track_count(), 0);
    }

    #[test]
    fn prediction_matches_spec_scenario_6() {
        let mut tracker = TccTracker::new(PipelineConfig::default());
        tracker.update(&[make_cluster(1, 15.0, 80.0)], "t0");
        tracker.update(&[make_cluster(1, 15.1, 80.1)], "t1");

        let predictions = tracker.predict_future(2, 0.5);
        let track_predictions = &predictions[&1];
        assert_eq!(track_predictions.len(), 2);
        assert!((track_predictions[0].hours_ahead - 0.5).abs() < 1e-9);
        assert!((track_predictions[1].hours_ahead - 1.0).abs() < 1e-9);
        assert!((track_predictions[0].confidence - 0.9).abs() < 1e-9);
        assert!((track_predictions[1].confidence - 0.8).abs() < 1e-9);
    }

    #[test]
    fn reset_clears_tracks_and_next_id() {
        let mut tracker = TccTracker::new(PipelineConfig::default());
        tracker.update(&[make_cluster(1, 15.0, 80.0)], "t0");
        tracker.reset();
        assert_eq!(tracker.active_track_count(), 0);

        let out = tracker.update(&[make_cluster(1, 15.0, 80.0)], "t0");
        assert_eq!(out[0].track_id, 1);
    }

    #[test]
    fn two_clusters_never_collapse_to_the_same_track_id() {
        let mut tracker = TccTracker::new(PipelineConfig::default());
        let out = tracker.update(&[make_cluster(1, 15.0, 80.0), make_cluster(2, -5.0, 95.0)], "t0");
        assert_ne!(out[0].track_id, out[1].track_id);
    }
}
