//! Convenience helpers over a track's history for callers that want
//! area/intensity trends (grounded on `feature_extraction.py`'s
//! `compute_cluster_evolution`). Deliberately not part of
//! [`crate::tracker::TccTracker::update`]'s return value, to keep the
//! core contract narrow and documented.

use tcc_common::{ClusterEvolution, TrackedObservation};

/// Evolution between the two most recent observations in `history`, or
/// `None` if there are fewer than two.
pub fn latest_evolution(history: &[TrackedObservation], hours_per_frame: f64) -> Option<ClusterEvolution> {
    let len = history.len();
    if len < 2 {
        return None;
    }
    let prior = &history[len - 2];
    let latest = &history[len - 1];
    let elapsed = (latest.track_length - prior.track_length) as f64 * hours_per_frame;
    Some(latest.evolution_since(prior, elapsed))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tcc_common::{BtStats, Classification, Cluster, Intensity, ShapeMetrics};

    fn observation(track_length: u32, area_km2: f64, min_bt: f32) -> TrackedObservation {
        let cluster = Cluster {
            id: 1,
            pixel_coords: vec![],
            pixel_centroid: (0.0, 0.0),
            geo_centroid: (0.0, 0.0),
            pixel_count: 0,
            area_km2,
            radius_km: 0.0,
            bt_stats: BtStats { min: min_bt, max: min_bt, mean: min_bt, std: 0.0 },
            shape: ShapeMetrics::default(),
            cloud_top_height_km: 0.0,
            intensity: Intensity::from_min_bt(min_bt),
            classification: Classification::from_min_bt(min_bt),
        };
        TrackedObservation::from_cluster(&cluster, 1, "t".to_string(), track_length)
    }

    #[test]
    fn fewer_than_two_observations_yields_none() {
        let history = vec![observation(1, 1000.0, 210.0)];
        assert!(latest_evolution(&history, 0.5).is_none());
    }

    #[test]
    fn computes_area_growth_between_last_two_observations() {
        let history = vec![observation(1, 1000.0, 210.0), observation(2, 1200.0, 205.0)];
        let evolution = latest_evolution(&history, 0.5).unwrap();
        assert!((evolution.area_change_km2 - 200.0).abs() < 1e-9);
        assert!((evolution.bt_change_rate_k_per_h - (-10.0)).abs() < 1e-6);
    }
}
