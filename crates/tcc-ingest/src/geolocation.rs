//! Synthetic geolocation fallback for granules with absent or malformed
//! coordinate variables.

use tcc_common::GeoGrid;

/// Synthesises a rectilinear lat/lon grid covering `lat_range`/`lon_range`,
/// north-to-south for rows and west-to-east for columns.
pub fn synthesize_geolocation(
    width: usize,
    height: usize,
    lat_range: (f64, f64),
    lon_range: (f64, f64),
) -> GeoGrid {
    let mut lat = Vec::with_capacity(width * height);
    let mut lon = Vec::with_capacity(width * height);

    for row in 0..height {
        let frac = if height > 1 {
            row as f64 / (height - 1) as f64
        } else {
            0.0
        };
        let row_lat = (lat_range.1 - (lat_range.1 - lat_range.0) * frac) as f32;

        for col in 0..width {
            let cfrac = if width > 1 {
                col as f64 / (width - 1) as f64
            } else {
                0.0
            };
            let col_lon = (lon_range.0 + (lon_range.1 - lon_range.0) * cfrac) as f32;
            lat.push(row_lat);
            lon.push(col_lon);
        }
    }

    GeoGrid::new(lat, lon, width, height, true)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn synthetic_grid_spans_requested_window() {
        let grid = synthesize_geolocation(10, 10, (0.0, 30.0), (60.0, 100.0));
        assert_eq!(grid.lat[0], 30.0);
        assert_eq!(grid.lat[90], 0.0);
        assert_eq!(grid.lon[0], 60.0);
        assert_eq!(grid.lon[9], 100.0);
        assert!(grid.synthetic);
    }
}
