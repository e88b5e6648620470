//! HDF5 granule reading: dataset discovery, calibration, and geolocation
//! recovery.

use std::sync::Once;

use tcc_common::GeoGrid;
use tracing::warn;

use crate::error::{IngestError, Result};
use crate::geolocation::synthesize_geolocation;

/// Ordered candidate names for the IR dataset.
const IR_CANDIDATES: &[&str] = &["IMG_TIR1", "TIR1", "IR", "IR1", "IR_BT", "Band4", "IMG_TIR"];

/// Parallel candidate names for the calibration look-up table.
const LUT_CANDIDATES: &[&str] = &[
    "IMG_TIR1_TEMP",
    "TIR1_TEMP",
    "IR_TEMP",
    "IR1_TEMP",
    "IR_BT_LUT",
    "Band4_LUT",
    "IMG_TIR_TEMP",
    "LUT",
    "CAL",
];

const LAT_CANDIDATES: &[&str] = &["Latitude", "latitude", "lat", "Lat", "GeoLat"];
const LON_CANDIDATES: &[&str] = &["Longitude", "longitude", "lon", "Lon", "GeoLon"];

/// Fill/sentinel threshold: raw or calibrated BT below this is a fill value.
const FILL_THRESHOLD_K: f32 = 100.0;
const FILL_FALLBACK_K: f32 = 250.0;

/// Silences HDF5's stderr error spam the same way the NetCDF parser does;
/// safe and idempotent to call multiple times.
pub fn silence_hdf5_errors() {
    static INIT: Once = Once::new();
    INIT.call_once(|| unsafe {
        hdf5_metno_sys::h5e::H5Eset_auto2(hdf5_metno_sys::h5e::H5E_DEFAULT, None, std::ptr::null_mut());
    });
}

/// Raw granule contents before geolocation fallback is applied.
pub struct RawGranule {
    pub bt: Vec<f32>,
    pub width: usize,
    pub height: usize,
    pub calibrated: bool,
}

/// Opens an HDF5 granule at `path`, discovers the IR dataset and optional
/// LUT, calibrates to Kelvin, and replaces sentinel/fill values.
pub fn read_granule(path: &std::path::Path) -> Result<RawGranule> {
    silence_hdf5_errors();

    if !path.exists() {
        return Err(IngestError::MissingFile(path.display().to_string()));
    }

    let file = netcdf::open(path)?;

    let ir_var = IR_CANDIDATES
        .iter()
        .find_map(|name| file.variable(name))
        .or_else(|| {
            warn!("no named IR dataset candidate matched; falling back to first 2D numeric variable");
            file.variables().find(|v| v.dimensions().len() >= 2)
        })
        .ok_or(IngestError::NoIrDataset)?;

    let dims = ir_var.dimensions();
    let (height, width) = match dims.len() {
        2 => (dims[0].len(), dims[1].len()),
        3 => (dims[1].len(), dims[2].len()),
        _ => return Err(IngestError::NoIrDataset),
    };

    let raw_counts: Vec<i32> = ir_var
        .get_values(..)
        .map_err(|e| IngestError::UnreadableContainer(e.to_string()))?;

    let lut_var = LUT_CANDIDATES.iter().find_map(|name| file.variable(name));

    let (bt, calibrated) = if let Some(lut_var) = lut_var {
        let lut: Vec<f32> = lut_var
            .get_values(..)
            .map_err(|e| IngestError::UnreadableContainer(e.to_string()))?;
        let calibrated: Vec<f32> = raw_counts
            .iter()
            .map(|&count| {
                let idx = (count.max(0) as usize).min(lut.len().saturating_sub(1));
                lut.get(idx).copied().unwrap_or(FILL_FALLBACK_K)
            })
            .collect();
        (calibrated, true)
    } else {
        warn!("no calibration LUT found; using raw counts as uncalibrated BT");
        (raw_counts.iter().map(|&c| c as f32).collect(), false)
    };

    let bt = replace_fill_values(bt);

    Ok(RawGranule {
        bt,
        width,
        height,
        calibrated,
    })
}

/// Reads geolocation from the granule if present and shape-matched;
/// otherwise synthesises a rectilinear grid over the configured window.
pub fn read_geolocation(
    path: &std::path::Path,
    width: usize,
    height: usize,
    lat_range: (f64, f64),
    lon_range: (f64, f64),
) -> Result<GeoGrid> {
    let file = netcdf::open(path)?;

    let lat_var = LAT_CANDIDATES.iter().find_map(|name| file.variable(name));
    let lon_var = LON_CANDIDATES.iter().find_map(|name| file.variable(name));

    if let (Some(lat_var), Some(lon_var)) = (lat_var, lon_var) {
        let lat_dims = lat_var.dimensions();
        let lon_dims = lon_var.dimensions();
        let lat_shape = (lat_dims.first().map(|d| d.len()).unwrap_or(0), lat_dims.get(1).map(|d| d.len()).unwrap_or(0));
        let lon_shape = (lon_dims.first().map(|d| d.len()).unwrap_or(0), lon_dims.get(1).map(|d| d.len()).unwrap_or(0));

        if lat_shape == (height, width) && lon_shape == (height, width) {
            let lat: Vec<f32> = lat_var
                .get_values(..)
                .map_err(|e| IngestError::UnreadableContainer(e.to_string()))?;
            let lon: Vec<f32> = lon_var
                .get_values(..)
                .map_err(|e| IngestError::UnreadableContainer(e.to_string()))?;
            return Ok(GeoGrid::new(lat, lon, width, height, false));
        }

        warn!(
            expected = ?(height, width),
            got_lat = ?lat_shape,
            got_lon = ?lon_shape,
            "geolocation shape mismatch; synthesising fallback grid"
        );
    } else {
        warn!("no geolocation dataset found; synthesising fallback grid");
    }

    Ok(synthesize_geolocation(width, height, lat_range, lon_range))
}

/// Replaces sentinel/fill BT values (< 100 K) with the field mean, or 250 K
/// if the entire field is fill.
fn replace_fill_values(mut bt: Vec<f32>) -> Vec<f32> {
    let valid: Vec<f32> = bt.iter().copied().filter(|&v| v >= FILL_THRESHOLD_K).collect();
    let replacement = if valid.is_empty() {
        FILL_FALLBACK_K
    } else {
        valid.iter().sum::<f32>() / valid.len() as f32
    };

    for v in bt.iter_mut() {
        if *v < FILL_THRESHOLD_K {
            *v = replacement;
        }
    }
    bt
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn replace_fill_values_uses_mean_of_valid_pixels() {
        let bt = vec![250.0, 260.0, 50.0, 270.0];
        let result = replace_fill_values(bt);
        // mean of [250, 260, 270] = 260.0
        assert_eq!(result[2], 260.0);
    }

    #[test]
    fn replace_fill_values_falls_back_when_all_fill() {
        let bt = vec![10.0, 20.0, 30.0];
        let result = replace_fill_values(bt);
        assert!(result.iter().all(|&v| v == FILL_FALLBACK_K));
    }
}
