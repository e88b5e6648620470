//! The offline label-maker branch, grounded on `clustering.py`'s
//! `apply_geophysical_constraints` and `_apply_separation_constraint`.

use tcc_common::{haversine_km, BtField, Cluster, GeoGrid, Mask, PipelineConfig};
use tcc_postprocess::features::build_cluster;
use tracing::info;

use crate::dbscan::dbscan;

fn threshold_cold_pixels(bt: &BtField, bt_threshold_k: f32) -> Vec<(usize, usize)> {
    let mut pixels = Vec::new();
    for row in 0..bt.height {
        for col in 0..bt.width {
            if bt.get(row, col).map(|v| v < bt_threshold_k).unwrap_or(false) {
                pixels.push((row, col));
            }
        }
    }
    pixels
}

/// Keeps the larger cluster when two candidates are closer than
/// `min_separation_km`, scanning candidates largest-area-first.
fn apply_separation_constraint(mut clusters: Vec<Cluster>, min_separation_km: f64) -> Vec<Cluster> {
    clusters.sort_by(|a, b| b.area_km2.partial_cmp(&a.area_km2).unwrap());

    let mut accepted: Vec<Cluster> = Vec::new();
    for candidate in clusters {
        let too_close = accepted.iter().any(|existing| {
            haversine_km(
                candidate.geo_centroid.0,
                candidate.geo_centroid.1,
                existing.geo_centroid.0,
                existing.geo_centroid.1,
            ) < min_separation_km
        });
        if !too_close {
            accepted.push(candidate);
        }
    }
    accepted
}

/// Runs the full label-maker contract: `label(BTField, GeoGrid) -> Mask`,
/// also returning the surviving clusters so callers can persist metadata
/// alongside the mask.
pub fn label(bt: &BtField, geo: &GeoGrid, config: &PipelineConfig) -> (Mask, Vec<Cluster>) {
    let cold_pixels = threshold_cold_pixels(bt, config.bt_threshold_k);

    let points: Vec<(f64, f64)> = cold_pixels.iter().map(|&(r, c)| (r as f64, c as f64)).collect();
    let labels = dbscan(&points, config.dbscan_eps_px, config.dbscan_min_samples);

    let mut by_label: std::collections::BTreeMap<i64, Vec<(usize, usize)>> = std::collections::BTreeMap::new();
    for (pixel, &label_id) in cold_pixels.iter().zip(labels.iter()) {
        if label_id < 0 {
            continue;
        }
        by_label.entry(label_id).or_default().push(*pixel);
    }

    let mut candidates: Vec<Cluster> = by_label
        .into_values()
        .enumerate()
        .map(|(idx, pixels)| build_cluster((idx + 1) as u32, pixels, bt, geo, config.pixel_area_km2))
        .filter(|c| c.area_km2 >= config.min_area_km2 && c.radius_km >= config.min_radius_km)
        .collect();

    let before_separation = candidates.len();
    candidates = apply_separation_constraint(candidates, config.min_centroid_separation_km);
    info!(
        before_separation,
        after_separation = candidates.len(),
        "label-maker applied geophysical constraints"
    );

    let mut mask = Mask::zeros(bt.width, bt.height);
    for (new_id, cluster) in candidates.iter_mut().enumerate() {
        cluster.id = (new_id + 1) as u32;
        for &(r, c) in &cluster.pixel_coords {
            mask.set(r, c, 1);
        }
    }

    (mask, candidates)
}
