//! Pipeline-wide configuration: thresholds, paths, and tunables for every
//! pipeline stage.

use serde::{Deserialize, Serialize};

/// Configuration shared by the post-processor, label-maker, and tracker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Probability threshold for the post-processor's binarisation step.
    pub prob_threshold: f32,
    /// Brightness-temperature threshold (K) for the label-maker branch.
    pub bt_threshold_k: f32,
    /// Minimum retained component area, km².
    pub min_area_km2: f64,
    /// Minimum retained component radius, km (label-maker branch only).
    pub min_radius_km: f64,
    /// Minimum geographic separation between accepted label-maker clusters, km.
    pub min_centroid_separation_km: f64,
    /// DBSCAN neighbourhood radius, in pixels.
    pub dbscan_eps_px: f64,
    /// DBSCAN minimum samples per cluster.
    pub dbscan_min_samples: usize,
    /// Physical area of one pixel, km² (4 km × 4 km by default).
    pub pixel_area_km2: f64,
    /// Maximum haversine distance for accepting a tracker assignment, km.
    pub max_track_distance_km: f64,
    /// Consecutive missed frames after which a track is evicted.
    pub track_lost_threshold: u32,
    /// Kalman filter process noise scale (σ_p = value · I₄).
    pub kalman_process_noise: f64,
    /// Kalman filter measurement noise scale (σ_m = value · I₂).
    pub kalman_measurement_noise: f64,
    /// Hours represented by one prediction step.
    pub prediction_interval_h: f64,
    /// Default synthetic-geolocation latitude window (min, max) °N.
    pub default_lat_range: (f64, f64),
    /// Default synthetic-geolocation longitude window (min, max) °E.
    pub default_lon_range: (f64, f64),
    /// Whether to additionally intersect the learned mask with a
    /// BT < `bt_threshold_k` mask before labelling. Defaults to no
    /// intersection; set true to require both the learned mask and the
    /// brightness-temperature threshold to agree on each foreground pixel.
    pub intersect_bt_threshold: bool,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            prob_threshold: 0.5,
            bt_threshold_k: 218.0,
            min_area_km2: 34_800.0,
            min_radius_km: 111.0,
            min_centroid_separation_km: 1_200.0,
            dbscan_eps_px: 1.5,
            dbscan_min_samples: 5,
            pixel_area_km2: 16.0,
            max_track_distance_km: 200.0,
            track_lost_threshold: 3,
            kalman_process_noise: 0.03,
            kalman_measurement_noise: 1.0,
            prediction_interval_h: 0.5,
            default_lat_range: (0.0, 30.0),
            default_lon_range: (60.0, 100.0),
            intersect_bt_threshold: false,
        }
    }
}

impl PipelineConfig {
    /// Load configuration from `TCC_*` environment variables, falling back to
    /// defaults for anything unset or unparseable.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        macro_rules! env_parse {
            ($var:literal, $field:expr) => {
                if let Ok(val) = std::env::var($var) {
                    if let Ok(parsed) = val.parse() {
                        $field = parsed;
                    }
                }
            };
        }

        env_parse!("TCC_PROB_THRESHOLD", config.prob_threshold);
        env_parse!("TCC_BT_THRESHOLD_K", config.bt_threshold_k);
        env_parse!("TCC_MIN_AREA_KM2", config.min_area_km2);
        env_parse!("TCC_MIN_RADIUS_KM", config.min_radius_km);
        env_parse!(
            "TCC_MIN_CENTROID_SEPARATION_KM",
            config.min_centroid_separation_km
        );
        env_parse!("TCC_DBSCAN_EPS_PX", config.dbscan_eps_px);
        env_parse!("TCC_DBSCAN_MIN_SAMPLES", config.dbscan_min_samples);
        env_parse!("TCC_PIXEL_AREA_KM2", config.pixel_area_km2);
        env_parse!("TCC_MAX_TRACK_DISTANCE_KM", config.max_track_distance_km);
        env_parse!("TCC_TRACK_LOST_THRESHOLD", config.track_lost_threshold);
        env_parse!("TCC_KALMAN_PROCESS_NOISE", config.kalman_process_noise);
        env_parse!(
            "TCC_KALMAN_MEASUREMENT_NOISE",
            config.kalman_measurement_noise
        );
        env_parse!("TCC_PREDICTION_INTERVAL_H", config.prediction_interval_h);

        if let Ok(val) = std::env::var("TCC_INTERSECT_BT_THRESHOLD") {
            config.intersect_bt_threshold = val == "1" || val.eq_ignore_ascii_case("true");
        }

        config
    }

    /// Load configuration from a YAML file, overlaying on top of defaults.
    pub fn from_yaml(path: impl AsRef<std::path::Path>) -> Result<Self, String> {
        let contents = std::fs::read_to_string(path.as_ref())
            .map_err(|e| format!("failed to read {}: {}", path.as_ref().display(), e))?;
        serde_yaml::from_str(&contents).map_err(|e| format!("invalid YAML config: {}", e))
    }

    /// Validate the configuration against the accepted ranges.
    pub fn validate(&self) -> Result<(), String> {
        if !(0.0..=1.0).contains(&self.prob_threshold) {
            return Err("prob_threshold must be in [0, 1]".to_string());
        }
        if self.min_area_km2 < 0.0 {
            return Err("min_area_km2 must be >= 0".to_string());
        }
        if self.min_radius_km < 0.0 {
            return Err("min_radius_km must be >= 0".to_string());
        }
        if self.dbscan_min_samples == 0 {
            return Err("dbscan_min_samples must be > 0".to_string());
        }
        if self.pixel_area_km2 <= 0.0 {
            return Err("pixel_area_km2 must be > 0".to_string());
        }
        if self.max_track_distance_km <= 0.0 {
            return Err("max_track_distance_km must be > 0".to_string());
        }
        if self.kalman_process_noise <= 0.0 || self.kalman_measurement_noise <= 0.0 {
            return Err("kalman noise scales must be > 0".to_string());
        }
        if self.prediction_interval_h <= 0.0 {
            return Err("prediction_interval_h must be > 0".to_string());
        }
        if self.default_lat_range.0 >= self.default_lat_range.1 {
            return Err("default_lat_range must be (min, max) with min < max".to_string());
        }
        if self.default_lon_range.0 >= self.default_lon_range.1 {
            return Err("default_lon_range must be (min, max) with min < max".to_string());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_matches_spec_defaults() {
        let config = PipelineConfig::default();
        assert_eq!(config.prob_threshold, 0.5);
        assert_eq!(config.bt_threshold_k, 218.0);
        assert_eq!(config.min_area_km2, 34_800.0);
        assert_eq!(config.track_lost_threshold, 3);
        assert!(!config.intersect_bt_threshold);
    }

    #[test]
    fn default_config_validates() {
        assert!(PipelineConfig::default().validate().is_ok());
    }

    #[test]
    fn rejects_out_of_range_probability() {
        let mut config = PipelineConfig::default();
        config.prob_threshold = 1.5;
        assert!(config.validate().is_err());
    }

    #[test]
    fn yaml_round_trip() {
        let config = PipelineConfig::default();
        let yaml = serde_yaml::to_string(&config).unwrap();
        let parsed: PipelineConfig = serde_yaml::from_str(&yaml).unwrap();
        assert_eq!(config, parsed);
    }
}
