//! Geographic distance helpers shared by the label-maker and tracker.

/// Mean Earth radius, km, per the DATA MODEL invariants.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Great-circle distance between two (lat, lon) points in degrees, km.
///
/// Symmetric (`haversine_km(a, b) == haversine_km(b, a)`) and zero for
/// identical points, as required by the haversine testable properties.
pub fn haversine_km(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let (lat1, lon1, lat2, lon2) = (
        lat1.to_radians(),
        lon1.to_radians(),
        lat2.to_radians(),
        lon2.to_radians(),
    );

    let dlat = lat2 - lat1;
    let dlon = lon2 - lon1;

    let a = (dlat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (dlon / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().asin();

    EARTH_RADIUS_KM * c
}

/// Equivalent radius of a circle with the given area, km.
pub fn equivalent_radius_km(area_km2: f64) -> f64 {
    (area_km2 / std::f64::consts::PI).sqrt()
}
