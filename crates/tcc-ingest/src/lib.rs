//! Granule ingestion: HDF5 reading, calibration, geolocation, and timestamp
//! recovery.

pub mod error;
pub mod geolocation;
pub mod hdf5_reader;
pub mod timestamp;

use chrono::{DateTime, Utc};
use tcc_common::{BtField, GeoGrid, PipelineConfig};
use tracing::info;

pub use error::{IngestError, Result};

/// Opens a granule, producing a calibrated BT field, a geolocation grid, and
/// an optionally-recovered observation timestamp.
pub fn open(
    path: &std::path::Path,
    config: &PipelineConfig,
) -> Result<(BtField, GeoGrid, Option<DateTime<Utc>>)> {
    let raw = hdf5_reader::read_granule(path)?;
    let geo = hdf5_reader::read_geolocation(
        path,
        raw.width,
        raw.height,
        config.default_lat_range,
        config.default_lon_range,
    )?;

    let filename = path
        .file_name()
        .and_then(|s| s.to_str())
        .unwrap_or_default();
    let timestamp = timestamp::parse_timestamp(filename);

    info!(
        width = raw.width,
        height = raw.height,
        calibrated = raw.calibrated,
        synthetic_geolocation = geo.synthetic,
        timestamp = ?timestamp,
        "ingested granule"
    );

    Ok((BtField::new(raw.bt, raw.width, raw.height), geo, timestamp))
}
