//! Synthetic BT fields, geolocation grids, and cluster fixtures for tests.

/// Creates a BT field that is uniformly `background_k` except for a single
/// square block of `block_k` at the given top-left offset. Used by the
/// "single square cluster" and "below-floor component" test scenarios.
pub fn create_bt_block(
    width: usize,
    height: usize,
    background_k: f32,
    block_k: f32,
    block_row: usize,
    block_col: usize,
    block_size: usize,
) -> Vec<f32> {
    let mut data = vec![background_k; width * height];
    for r in block_row..(block_row + block_size).min(height) {
        for c in block_col..(block_col + block_size).min(width) {
            data[r * width + c] = block_k;
        }
    }
    data
}

/// Creates a BT field uniformly at `value_k` (the "empty sky" scenario).
pub fn create_uniform_bt(width: usize, height: usize, value_k: f32) -> Vec<f32> {
    vec![value_k; width * height]
}

/// Creates a rectilinear synthetic lat/lon grid covering `lat_range`/`lon_range`,
/// north-to-south for rows and west-to-east for columns, matching Ingest's
/// synthetic-geolocation fallback.
pub fn create_synthetic_latlon(
    width: usize,
    height: usize,
    lat_range: (f64, f64),
    lon_range: (f64, f64),
) -> (Vec<f32>, Vec<f32>) {
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
    (lat, lon)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn block_generator_places_block_correctly() {
        let data = create_bt_block(10, 10, 290.0, 200.0, 2, 2, 3);
        assert_eq!(data[2 * 10 + 2], 200.0);
        assert_eq!(data[0], 290.0);
    }

    #[test]
    fn synthetic_latlon_covers_requested_range() {
        let (lat, lon) = create_synthetic_latlon(5, 5, (0.0, 30.0), (60.0, 100.0));
        assert_eq!(lat[0], 30.0); // row 0 = north edge
        assert_eq!(lat[20], 0.0); // last row = south edge
        assert_eq!(lon[0], 60.0); // col 0 = west edge
        assert_eq!(lon[4], 100.0); // last col = east edge
    }
}
