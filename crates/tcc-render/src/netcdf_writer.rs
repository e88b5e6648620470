//! CF-1.8 NetCDF serialisation of a single frame's outputs.

use std::path::Path;

use chrono::{DateTime, Utc};
use tcc_common::{BtField, Cluster, GeoGrid, Mask, PipelineConfig, ProbMap};
use tracing::info;

use crate::error::Result;

/// Writes the per-frame CF-1.8 NetCDF: `irbt`, `tcc_probability`, `tcc_mask`
/// over `(time, lat, lon)`, plus 2-D
/// `latitude`/`longitude` coordinate variables and detection metadata as
/// global attributes.
#[allow(clippy::too_many_arguments)]
pub fn write_netcdf(
    bt: &BtField,
    prob: &ProbMap,
    mask: &Mask,
    geo: &GeoGrid,
    timestamp: DateTime<Utc>,
    clusters: &[Cluster],
    config: &PipelineConfig,
    path: &Path,
) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    if path.exists() {
        std::fs::remove_file(path)?;
    }

    let mut file = netcdf::create(path)?;

    file.add_dimension("time", 1)?;
    file.add_dimension("lat", bt.height)?;
    file.add_dimension("lon", bt.width)?;

    let mut time_var = file.add_variable::<f64>("time", &["time"])?;
    time_var.put_values(&[timestamp.timestamp() as f64], ..)?;
    time_var.put_attribute("units", "seconds since 1970-01-01 00:00:00")?;
    time_var.put_attribute("standard_name", "time")?;
    time_var.put_attribute("calendar", "standard")?;

    let mut irbt_var = file.add_variable::<f32>("irbt", &["time", "lat", "lon"])?;
    irbt_var.put_values(&bt.data, ..)?;
    irbt_var.put_attribute("units", "K")?;
    irbt_var.put_attribute("long_name", "infrared brightness temperature")?;

    let mut prob_var = file.add_variable::<f32>("tcc_probability", &["time", "lat", "lon"])?;
    prob_var.put_values(&prob.data, ..)?;
    prob_var.put_attribute("long_name", "learned foreground probability")?;
    prob_var.put_attribute("valid_range", vec![0.0_f32, 1.0_f32])?;

    let mut mask_var = file.add_variable::<u8>("tcc_mask", &["time", "lat", "lon"])?;
    mask_var.put_values(&mask.data, ..)?;
    mask_var.put_attribute("long_name", "tropical cloud cluster mask")?;
    mask_var.put_attribute("flag_values", vec![0_u8, 1_u8])?;
    mask_var.put_attribute("flag_meanings", "background TCC")?;

    let mut lat_var = file.add_variable::<f32>("latitude", &["lat", "lon"])?;
    lat_var.put_values(&geo.lat, ..)?;
    lat_var.put_attribute("units", "degrees_north")?;
    lat_var.put_attribute("standard_name", "latitude")?;

    let mut lon_var = file.add_variable::<f32>("longitude", &["lat", "lon"])?;
    lon_var.put_values(&geo.lon, ..)?;
    lon_var.put_attribute("units", "degrees_east")?;
    lon_var.put_attribute("standard_name", "longitude")?;

    let total_area_km2: f64 = clusters.iter().map(|c| c.area_km2).sum();

    file.add_attribute("Conventions", "CF-1.8")?;
    file.add_attribute("title", "Tropical Cloud Cluster detection")?;
    file.add_attribute("source", "geostationary infrared imagery")?;
    file.add_attribute("institution", "tcc-tracker")?;
    file.add_attribute("history", Utc::now().to_rfc3339())?;
    file.add_attribute("tcc_count", clusters.len() as i32)?;
    file.add_attribute("total_tcc_area_km2", total_area_km2)?;
    file.add_attribute("min_area_threshold_km2", config.min_area_km2)?;
    file.add_attribute("bt_threshold_K", config.bt_threshold_k as f64)?;
    if geo.synthetic {
        file.add_attribute("geolocation_available", "false")?;
    }

    info!(
        path = %path.display(),
        tcc_count = clusters.len(),
        "wrote per-frame NetCDF"
    );

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tcc_test_utils::generators::create_synthetic_latlon;

    fn sample_geo(width: usize, height: usize) -> GeoGrid {
        let (lat, lon) = create_synthetic_latlon(width, height, (0.0, 30.0), (60.0, 100.0));
        GeoGrid::new(lat, lon, width, height, true)
    }

    #[test]
    fn writes_a_readable_netcdf_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("output.nc");

        let width = 4;
        let height = 4;
        let bt = BtField::new(vec![290.0; width * height], width, height);
        let prob = ProbMap::new(vec![0.0; width * height], width, height);
        let mask = Mask::zeros(width, height);
        let geo = sample_geo(width, height);
        let config = PipelineConfig::default();

        write_netcdf(&bt, &prob, &mask, &geo, Utc::now(), &[], &config, &path).unwrap();

        let file = netcdf::open(&path).unwrap();
        assert_eq!(file.dimension("lat").unwrap().len(), height);
        assert_eq!(file.dimension("lon").unwrap().len(), width);
        assert!(file.variable("irbt").is_some());
        assert!(file.variable("tcc_mask").is_some());
    }

    #[test]
    fn flags_synthetic_geolocation_as_global_attribute() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("output.nc");
        let width = 2;
        let height = 2;
        let bt = BtField::new(vec![290.0; width * height], width, height);
        let prob = ProbMap::new(vec![0.0; width * height], width, height);
        let mask = Mask::zeros(width, height);
        let geo = sample_geo(width, height);
        let config = PipelineConfig::default();

        write_netcdf(&bt, &prob, &mask, &geo, Utc::now(), &[], &config, &path).unwrap();

        let file = netcdf::open(&path).unwrap();
        let attr = file
            .attribute("geolocation_available")
            .expect("synthetic geolocation must be flagged");
        assert_eq!(String::try_from(attr.value().unwrap()).unwrap(), "false");
    }
}
