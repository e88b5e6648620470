//! The Post-processor component: turns a probability map into a
//! physically plausible binary mask and a list of geophysical clusters.

pub mod components;
pub mod features;
pub mod morphology;
pub mod stats;
pub mod threshold;

use tcc_common::{BtField, Cluster, GeoGrid, Mask, PipelineConfig, ProbMap};
use tracing::debug;

/// Runs the fixed pipeline: threshold, morphological clean-up, label,
/// area-filter, extract features. An empty cluster list is a legitimate
/// result, not a failure.
pub fn derive(prob: &ProbMap, bt: &BtField, geo: &GeoGrid, config: &PipelineConfig) -> (Mask, Vec<Cluster>) {
    let thresholded = threshold::binarise(
        prob,
        config.prob_threshold,
        bt,
        config.bt_threshold_k,
        config.intersect_bt_threshold,
    );
    let cleaned = morphology::clean(&thresholded);
    let components = components::label_components(&cleaned);

    let mut mask = Mask::zeros(cleaned.width, cleaned.height);
    let mut clusters = Vec::new();
    let mut next_id = 1u32;

    for pixels in components {
        let area_km2 = pixels.len() as f64 * config.pixel_area_km2;
        if area_km2 < config.min_area_km2 {
            continue;
        }
        for &(r, c) in &pixels {
            mask.set(r, c, 1);
        }
        let cluster = features::build_cluster(next_id, pixels, bt, geo, config.pixel_area_km2);
        next_id += 1;
        clusters.push(cluster);
    }

    debug!(cluster_count = clusters.len(), "post-processor derived clusters");
    (mask, clusters)
}
