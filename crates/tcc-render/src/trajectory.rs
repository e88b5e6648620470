//! Trajectory serialisation: CSV and NetCDF of tracked observations.

use std::path::Path;

use tcc_common::TrackedObservation;
use tracing::info;

use crate::error::Result;

/// Field order for the CSV header and column priority: ids, timestamp, and
/// geographic position come first.
const FIELD_ORDER: &[&str] = &[
    "track_id",
    "timestamp",
    "lat",
    "lon",
    "pixel_count",
    "area_km2",
    "radius_km",
    "min_bt_k",
    "max_bt_k",
    "mean_bt_k",
    "std_bt_k",
    "aspect_ratio",
    "orientation_deg",
    "eccentricity",
    "cloud_top_height_km",
    "intensity",
    "classification",
    "is_predicted",
    "track_length",
];

fn csv_escape(field: &str) -> String {
    if field.contains(',') || field.contains('"') || field.contains('\n') {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

fn row_fields(obs: &TrackedObservation) -> Vec<String> {
    vec![
        obs.track_id.to_string(),
        obs.timestamp.clone(),
        obs.geo_centroid.0.to_string(),
        obs.geo_centroid.1.to_string(),
        obs.pixel_count.to_string(),
        obs.area_km2.to_string(),
        obs.radius_km.to_string(),
        obs.bt_stats.min.to_string(),
        obs.bt_stats.max.to_string(),
        obs.bt_stats.mean.to_string(),
        obs.bt_stats.std.to_string(),
        obs.shape.aspect_ratio.to_string(),
        obs.shape.orientation_deg.to_string(),
        obs.shape.eccentricity.to_string(),
        obs.cloud_top_height_km.to_string(),
        obs.intensity.as_str().to_string(),
        obs.classification.as_str().to_string(),
        (obs.is_predicted as u8).to_string(),
        obs.track_length.to_string(),
    ]
}

/// Writes `observations` in insertion order as CSV with a header.
pub fn write_trajectory_csv(observations: &[TrackedObservation], path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let mut out = String::new();
    out.push_str(&FIELD_ORDER.join(","));
    out.push('\n');

    for obs in observations {
        let fields: Vec<String> = row_fields(obs).into_iter().map(|f| csv_escape(&f)).collect();
        out.push_str(&fields.join(","));
        out.push('\n');
    }

    std::fs::write(path, out)?;
    info!(count = observations.len(), path = %path.display(), "wrote trajectory CSV");
    Ok(())
}

/// Fixed-width encoding for the `timestamp` string variable (a 32-byte
/// string).
const TIMESTAMP_WIDTH: usize = 32;

fn pad_timestamp(s: &str) -> [u8; TIMESTAMP_WIDTH] {
    let mut buf = [0u8; TIMESTAMP_WIDTH];
    let bytes = s.as_bytes();
    let n = bytes.len().min(TIMESTAMP_WIDTH);
    buf[..n].copy_from_slice(&bytes[..n]);
    buf
}

/// Writes `observations` over a single `obs` dimension, in insertion order.
pub fn write_trajectory_netcdf(observations: &[TrackedObservation], path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    if path.exists() {
        std::fs::remove_file(path)?;
    }

    let mut file = netcdf::create(path)?;
    let n = observations.len().max(1);
    file.add_dimension("obs", n)?;
    file.add_dimension("timestamp_len", TIMESTAMP_WIDTH)?;

    if observations.is_empty() {
        file.add_attribute("Conventions", "CF-1.8")?;
        file.add_attribute("obs_count", 0_i32)?;
        return Ok(());
    }

    let track_ids: Vec<i32> = observations.iter().map(|o| o.track_id as i32).collect();
    let mut track_id_var = file.add_variable::<i32>("track_id", &["obs"])?;
    track_id_var.put_values(&track_ids, ..)?;

    let timestamps: Vec<u8> = observations
        .iter()
        .flat_map(|o| pad_timestamp(&o.timestamp))
        .collect();
    let mut timestamp_var = file.add_variable::<u8>("timestamp", &["obs", "timestamp_len"])?;
    timestamp_var.put_values(&timestamps, ..)?;

    let lat: Vec<f64> = observations.iter().map(|o| o.geo_centroid.0).collect();
    let mut lat_var = file.add_variable::<f64>("lat", &["obs"])?;
    lat_var.put_values(&lat, ..)?;
    lat_var.put_attribute("units", "degrees_north")?;

    let lon: Vec<f64> = observations.iter().map(|o| o.geo_centroid.1).collect();
    let mut lon_var = file.add_variable::<f64>("lon", &["obs"])?;
    lon_var.put_values(&lon, ..)?;
    lon_var.put_attribute("units", "degrees_east")?;

    let area: Vec<f64> = observations.iter().map(|o| o.area_km2).collect();
    let mut area_var = file.add_variable::<f64>("area_km2", &["obs"])?;
    area_var.put_values(&area, ..)?;

    let radius: Vec<f64> = observations.iter().map(|o| o.radius_km).collect();
    let mut radius_var = file.add_variable::<f64>("radius_km", &["obs"])?;
    radius_var.put_values(&radius, ..)?;

    let min_bt: Vec<f32> = observations.iter().map(|o| o.bt_stats.min).collect();
    let mut min_bt_var = file.add_variable::<f32>("min_bt_k", &["obs"])?;
    min_bt_var.put_values(&min_bt, ..)?;

    let mean_bt: Vec<f32> = observations.iter().map(|o| o.bt_stats.mean).collect();
    let mut mean_bt_var = file.add_variable::<f32>("mean_bt_k", &["obs"])?;
    mean_bt_var.put_values(&mean_bt, ..)?;

    let cloud_top: Vec<f32> = observations.iter().map(|o| o.cloud_top_height_km).collect();
    let mut cloud_top_var = file.add_variable::<f32>("cloud_top_height_km", &["obs"])?;
    cloud_top_var.put_values(&cloud_top, ..)?;

    let is_predicted: Vec<u8> = observations.iter().map(|o| o.is_predicted as u8).collect();
    let mut predicted_var = file.add_variable::<u8>("is_predicted", &["obs"])?;
    predicted_var.put_values(&is_predicted, ..)?;

    file.add_attribute("Conventions", "CF-1.8")?;
    file.add_attribute("obs_count", observations.len() as i32)?;

    info!(count = observations.len(), path = %path.display(), "wrote trajectory NetCDF");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tcc_common::{BtStats, Classification, Cluster, Intensity, ShapeMetrics};

    fn sample_observation() -> TrackedObservation {
        let cluster = Cluster {
            id: 1,
            pixel_coords: vec![],
            pixel_centroid: (0.0, 0.0),
            geo_centroid: (15.0, 80.0),
            pixel_count: 100,
            area_km2: 1600.0,
            radius_km: 22.6,
            bt_stats: BtStats { min: 200.0, max: 210.0, mean: 205.0, std: 2.0 },
            shape: ShapeMetrics::default(),
            cloud_top_height_km: 10.0,
            intensity: Intensity::Strong,
            classification: Classification::ConfirmedTcc,
        };
        TrackedObservation::from_cluster(&cluster, 1, "t0".to_string(), 1)
    }

    #[test]
    fn csv_header_puts_ids_and_position_first() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("trajectory.csv");
        write_trajectory_csv(&[sample_observation()], &path).unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        let header = contents.lines().next().unwrap();
        assert!(header.starts_with("track_id,timestamp,lat,lon"));
        assert_eq!(contents.lines().count(), 2);
    }

    #[test]
    fn quotes_fields_containing_commas() {
        let mut obs = sample_observation();
        obs.timestamp = "2023-11-30T00,45".to_string();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("trajectory.csv");
        write_trajectory_csv(&[obs], &path).unwrap();
        let contents = std::fs::read_to_string(&path).unwrap();
        assert!(contents.contains("\"2023-11-30T00,45\""));
    }

    #[test]
    fn netcdf_round_trips_observation_count() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("trajectory.nc");
        write_trajectory_netcdf(&[sample_observation(), sample_observation()], &path).unwrap();

        let file = netcdf::open(&path).unwrap();
        assert_eq!(file.dimension("obs").unwrap().len(), 2);
    }

    #[test]
    fn empty_observations_still_produce_a_valid_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("trajectory.nc");
        write_trajectory_netcdf(&[], &path).unwrap();
        assert!(path.exists());
    }
}
