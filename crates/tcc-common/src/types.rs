//! The shared data model: Granule-derived fields, per-cluster features, and
//! the tracker/serialiser interchange record.

use serde::{Deserialize, Serialize};

/// A calibrated brightness-temperature field, Kelvin, row-major (row 0 is the
/// top of the frame as delivered by Ingest).
#[derive(Debug, Clone, PartialEq)]
pub struct BtField {
    pub data: Vec<f32>,
    pub width: usize,
    pub height: usize,
}

impl BtField {
    pub fn new(data: Vec<f32>, width: usize, height: usize) -> Self {
        debug_assert_eq!(data.len(), width * height);
        Self { data, width, height }
    }

    pub fn get(&self, row: usize, col: usize) -> Option<f32> {
        if row >= self.height || col >= self.width {
            return None;
        }
        self.data.get(row * self.width + col).copied()
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

/// Latitude/longitude grids matching a field's shape, either read from the
/// granule or synthesised by Ingest when geolocation is absent or malformed.
#[derive(Debug, Clone, PartialEq)]
pub struct GeoGrid {
    pub lat: Vec<f32>,
    pub lon: Vec<f32>,
    pub width: usize,
    pub height: usize,
    /// True when this grid was synthesised rather than read from the granule.
    pub synthetic: bool,
}

impl GeoGrid {
    pub fn new(lat: Vec<f32>, lon: Vec<f32>, width: usize, height: usize, synthetic: bool) -> Self {
        debug_assert_eq!(lat.len(), width * height);
        debug_assert_eq!(lon.len(), width * height);
        Self {
            lat,
            lon,
            width,
            height,
            synthetic,
        }
    }

    pub fn at(&self, row: usize, col: usize) -> Option<(f32, f32)> {
        if row >= self.height || col >= self.width {
            return None;
        }
        let idx = row * self.width + col;
        Some((self.lat[idx], self.lon[idx]))
    }
}

/// A per-pixel foreground probability field at native resolution, ∈ [0, 1].
#[derive(Debug, Clone, PartialEq)]
pub struct ProbMap {
    pub data: Vec<f32>,
    pub width: usize,
    pub height: usize,
}

impl ProbMap {
    pub fn new(data: Vec<f32>, width: usize, height: usize) -> Self {
        debug_assert_eq!(data.len(), width * height);
        Self { data, width, height }
    }
}

/// A binary segmentation mask, one byte per pixel (0 or 1).
#[derive(Debug, Clone, PartialEq)]
pub struct Mask {
    pub data: Vec<u8>,
    pub width: usize,
    pub height: usize,
}

impl Mask {
    pub fn zeros(width: usize, height: usize) -> Self {
        Self {
            data: vec![0u8; width * height],
            width,
            height,
        }
    }

    pub fn get(&self, row: usize, col: usize) -> Option<u8> {
        if row >= self.height || col >= self.width {
            return None;
        }
        self.data.get(row * self.width + col).copied()
    }

    pub fn set(&mut self, row: usize, col: usize, value: u8) {
        let idx = row * self.width + col;
        self.data[idx] = value;
    }

    pub fn count_foreground(&self) -> usize {
        self.data.iter().filter(|&&v| v != 0).count()
    }
}

/// BT statistics over a cluster's member pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BtStats {
    pub min: f32,
    pub max: f32,
    pub mean: f32,
    pub std: f32,
}

/// Shape metrics from the fitted ellipse.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ShapeMetrics {
    pub aspect_ratio: f32,
    pub orientation_deg: f32,
    pub eccentricity: f32,
}

impl Default for ShapeMetrics {
    /// Default used when a component has fewer than 5 member pixels.
    fn default() -> Self {
        Self {
            aspect_ratio: 1.0,
            orientation_deg: 0.0,
            eccentricity: 0.0,
        }
    }
}

/// Coarse intensity label keyed on minimum BT.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Intensity {
    Extreme,
    Strong,
    Moderate,
    Weak,
    None,
}

impl Intensity {
    pub fn from_min_bt(min_bt: f32) -> Self {
        if min_bt < 190.0 {
            Intensity::Extreme
        } else if min_bt < 200.0 {
            Intensity::Strong
        } else if min_bt < 210.0 {
            Intensity::Moderate
        } else if min_bt < 218.0 {
            Intensity::Weak
        } else {
            Intensity::None
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Intensity::Extreme => "extreme",
            Intensity::Strong => "strong",
            Intensity::Moderate => "moderate",
            Intensity::Weak => "weak",
            Intensity::None => "none",
        }
    }
}

/// Classification label keyed on minimum BT.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Classification {
    ConfirmedTcc,
    LikelyTcc,
    CloudCluster,
}

impl Classification {
    pub fn from_min_bt(min_bt: f32) -> Self {
        if min_bt < 220.0 {
            Classification::ConfirmedTcc
        } else if min_bt < 235.0 {
            Classification::LikelyTcc
        } else {
            Classification::CloudCluster
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Classification::ConfirmedTcc => "Confirmed TCC",
            Classification::LikelyTcc => "Likely TCC",
            Classification::CloudCluster => "Cloud Cluster",
        }
    }
}

/// A labelled, area-filtered connected component with its geophysical
/// features (DATA MODEL: Cluster).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cluster {
    pub id: u32,
    /// Member pixel coordinates as (row, col).
    #[serde(skip)]
    pub pixel_coords: Vec<(usize, usize)>,
    pub pixel_centroid: (f64, f64),
    pub geo_centroid: (f64, f64),
    pub pixel_count: usize,
    pub area_km2: f64,
    pub radius_km: f64,
    pub bt_stats: BtStats,
    pub shape: ShapeMetrics,
    pub cloud_top_height_km: f32,
    pub intensity: Intensity,
    pub classification: Classification,
}

/// A tracker output record: a Cluster's features plus tracking context. This
/// is the narrowed, documented schema used at the tracker/serialiser
/// boundary, replacing the habit of attaching arbitrary keys.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrackedObservation {
    pub track_id: u32,
    pub timestamp: String,
    pub is_predicted: bool,
    pub track_length: u32,
    pub pixel_count: usize,
    pub area_km2: f64,
    pub radius_km: f64,
    pub geo_centroid: (f64, f64),
    pub bt_stats: BtStats,
    pub shape: ShapeMetrics,
    pub cloud_top_height_km: f32,
    pub intensity: Intensity,
    pub classification: Classification,
}

impl TrackedObservation {
    pub fn from_cluster(cluster: &Cluster, track_id: u32, timestamp: String, track_length: u32) -> Self {
        Self {
            track_id,
            timestamp,
            is_predicted: false,
            track_length,
            pixel_count: cluster.pixel_count,
            area_km2: cluster.area_km2,
            radius_km: cluster.radius_km,
            geo_centroid: cluster.geo_centroid,
            bt_stats: cluster.bt_stats,
            shape: cluster.shape,
            cloud_top_height_km: cluster.cloud_top_height_km,
            intensity: cluster.intensity,
            classification: cluster.classification,
        }
    }
}

/// Area/intensity change between two observations of the same track
/// (grounded on `compute_cluster_evolution`).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ClusterEvolution {
    pub area_change_km2: f64,
    pub area_change_rate_km2_per_h: f64,
    pub bt_change_rate_k_per_h: f32,
}

impl TrackedObservation {
    /// Computes area/intensity evolution relative to an earlier observation
    /// of the same track. `hours_elapsed` must be > 0.
    pub fn evolution_since(&self, prior: &TrackedObservation, hours_elapsed: f64) -> ClusterEvolution {
        let area_change_km2 = self.area_km2 - prior.area_km2;
        let bt_change_k = self.bt_stats.mean - prior.bt_stats.mean;
        ClusterEvolution {
            area_change_km2,
            area_change_rate_km2_per_h: if hours_elapsed > 0.0 {
                area_change_km2 / hours_elapsed
            } else {
                0.0
            },
            bt_change_rate_k_per_h: if hours_elapsed > 0.0 {
                bt_change_k / hours_elapsed as f32
            } else {
                0.0
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn intensity_matches_spec_boundaries() {
        assert_eq!(Intensity::from_min_bt(189.9), Intensity::Extreme);
        assert_eq!(Intensity::from_min_bt(199.9), Intensity::Strong);
        assert_eq!(Intensity::from_min_bt(209.9), Intensity::Moderate);
        assert_eq!(Intensity::from_min_bt(217.9), Intensity::Weak);
        assert_eq!(Intensity::from_min_bt(218.0), Intensity::None);
    }

    #[test]
    fn classification_matches_spec_boundaries() {
        assert_eq!(Classification::from_min_bt(219.9), Classification::ConfirmedTcc);
        assert_eq!(Classification::from_min_bt(220.0), Classification::LikelyTcc);
        assert_eq!(Classification::from_min_bt(234.9), Classification::LikelyTcc);
        assert_eq!(Classification::from_min_bt(235.0), Classification::CloudCluster);
    }

    #[test]
    fn mask_set_and_count() {
        let mut mask = Mask::zeros(4, 4);
        mask.set(0, 0, 1);
        mask.set(3, 3, 1);
        assert_eq!(mask.count_foreground(), 2);
        assert_eq!(mask.get(0, 0), Some(1));
        assert_eq!(mask.get(10, 10), None);
    }
}
