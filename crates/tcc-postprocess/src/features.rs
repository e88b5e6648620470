//! Step 5 of the post-processor pipeline: per-component geophysical
//! feature extraction.

use tcc_common::{BtField, BtStats, Classification, Cluster, GeoGrid, Intensity, ShapeMetrics};

const SURFACE_BT_K: f32 = 300.0;
const SURFACE_HEIGHT_KM: f32 = 0.0;
const TROPOPAUSE_BT_K: f32 = 190.0;
const TROPOPAUSE_HEIGHT_KM: f32 = 16.0;

fn bt_stats(values: &[f32]) -> BtStats {
    let min = values.iter().copied().fold(f32::INFINITY, f32::min);
    let max = values.iter().copied().fold(f32::NEG_INFINITY, f32::max);
    let mean = values.iter().sum::<f32>() / values.len() as f32;
    let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f32>() / values.len() as f32;
    BtStats {
        min,
        max,
        mean,
        std: variance.sqrt(),
    }
}

/// Ellipse fit from the PCA of member pixel coordinates. Defaults to
/// `{1.0, 0.0, 0.0}` below 5 pixels.
fn shape_metrics(pixels: &[(usize, usize)]) -> ShapeMetrics {
    if pixels.len() < 5 {
        return ShapeMetrics::default();
    }

    let n = pixels.len() as f64;
    let mean_row = pixels.iter().map(|&(r, _)| r as f64).sum::<f64>() / n;
    let mean_col = pixels.iter().map(|&(_, c)| c as f64).sum::<f64>() / n;

    let mut var_row = 0.0;
    let mut var_col = 0.0;
    let mut cov = 0.0;
    for &(r, c) in pixels {
        let dr = r as f64 - mean_row;
        let dc = c as f64 - mean_col;
        var_row += dr * dr;
        var_col += dc * dc;
        cov += dr * dc;
    }
    var_row /= n;
    var_col /= n;
    cov /= n;

    let trace = var_row + var_col;
    let diff = var_row - var_col;
    let discriminant = ((diff / 2.0).powi(2) + cov * cov).sqrt();
    let lambda_major = (trace / 2.0 + discriminant).max(1e-12);
    let lambda_minor = (trace / 2.0 - discriminant).max(0.0);

    let aspect_ratio = (lambda_major / lambda_minor.max(1e-12)).sqrt() as f32;
    let eccentricity = (1.0 - (lambda_minor / lambda_major)).max(0.0).sqrt() as f32;

    let orientation_rad = 0.5 * (2.0 * cov).atan2(diff);
    let mut orientation_deg = orientation_rad.to_degrees();
    orientation_deg = orientation_deg.rem_euclid(180.0);

    ShapeMetrics {
        aspect_ratio,
        orientation_deg: orientation_deg as f32,
        eccentricity,
    }
}

fn cloud_top_height_km(min_bt: f32) -> f32 {
    let t = (SURFACE_BT_K - min_bt) / (SURFACE_BT_K - TROPOPAUSE_BT_K);
    let t = t.clamp(0.0, 1.0);
    SURFACE_HEIGHT_KM + t * (TROPOPAUSE_HEIGHT_KM - SURFACE_HEIGHT_KM)
}

/// Builds a [`Cluster`] from a component's member pixels.
pub fn build_cluster(id: u32, pixel_coords: Vec<(usize, usize)>, bt: &BtField, geo: &GeoGrid, pixel_area_km2: f64) -> Cluster {
    let pixel_count = pixel_coords.len();

    let mean_row = pixel_coords.iter().map(|&(r, _)| r as f64).sum::<f64>() / pixel_count as f64;
    let mean_col = pixel_coords.iter().map(|&(_, c)| c as f64).sum::<f64>() / pixel_count as f64;

    let mut sum_lat = 0.0_f64;
    let mut sum_lon = 0.0_f64;
    let mut bt_values = Vec::with_capacity(pixel_count);
    for &(r, c) in &pixel_coords {
        let (lat, lon) = geo.at(r, c).unwrap_or((0.0, 0.0));
        sum_lat += lat as f64;
        sum_lon += lon as f64;
        bt_values.push(bt.get(r, c).unwrap_or(0.0));
    }
    let geo_centroid = (sum_lat / pixel_count as f64, sum_lon / pixel_count as f64);

    let stats = bt_stats(&bt_values);
    let area_km2 = pixel_count as f64 * pixel_area_km2;
    let radius_km = (area_km2 / std::f64::consts::PI).sqrt();
    let shape = shape_metrics(&pixel_coords);
    let cloud_top_height_km = cloud_top_height_km(stats.min);
    let intensity = Intensity::from_min_bt(stats.min);
    let classification = Classification::from_min_bt(stats.min);

    Cluster {
        id,
        pixel_coords,
        pixel_centroid: (mean_row, mean_col),
        geo_centroid,
        pixel_count,
        area_km2,
        radius_km,
        bt_stats: stats,
        shape,
        cloud_top_height_km,
        intensity,
        classification,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tcc_test_utils::generators::create_synthetic_latlon;

    #[test]
    fn single_square_cluster_matches_spec_scenario_2() {
        let width = 512usize;
        let height = 512usize;
        let mut data = vec![290.0_f32; width * height];
        for r in 226..286 {
            for c in 226..286 {
                data[r * width + c] = 200.0;
            }
        }
        let bt = BtField::new(data, width, height);
        let (lat, lon) = create_synthetic_latlon(width, height, (0.0, 30.0), (60.0, 100.0));
        let geo = GeoGrid::new(lat, lon, width, height, true);

        let mut pixels = Vec::new();
        for r in 226..286 {
            for c in 226..286 {
                pixels.push((r, c));
            }
        }

        let cluster = build_cluster(1, pixels, &bt, &geo, 16.0);
        assert_eq!(cluster.pixel_count, 3600);
        assert!((cluster.area_km2 - 57_600.0).abs() < 1e-6);
        assert!((cluster.radius_km - 135.4).abs() < 0.1);
        assert_eq!(cluster.intensity, Intensity::Strong);
        assert_eq!(cluster.classification, Classification::ConfirmedTcc);
    }

    #[test]
    fn small_component_gets_default_shape() {
        let bt = BtField::new(vec![200.0; 9], 3, 3);
        let (lat, lon) = create_synthetic_latlon(3, 3, (0.0, 30.0), (60.0, 100.0));
        let geo = GeoGrid::new(lat, lon, 3, 3, true);
        let cluster = build_cluster(1, vec![(0, 0), (0, 1), (1, 0)], &bt, &geo, 16.0);
        assert_eq!(cluster.shape, ShapeMetrics::default());
    }

    #[test]
    fn bt_invariant_min_le_mean_le_max() {
        let bt = BtField::new(vec![190.0, 200.0, 210.0, 220.0], 2, 2);
        let (lat, lon) = create_synthetic_latlon(2, 2, (0.0, 30.0), (60.0, 100.0));
        let geo = GeoGrid::new(lat, lon, 2, 2, true);
        let cluster = build_cluster(1, vec![(0, 0), (0, 1), (1, 0), (1, 1)], &bt, &geo, 16.0);
        assert!(cluster.bt_stats.min <= cluster.bt_stats.mean);
        assert!(cluster.bt_stats.mean <= cluster.bt_stats.max);
    }
}
