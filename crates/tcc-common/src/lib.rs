//! Shared types, configuration, and error handling for the TCC pipeline.

pub mod config;
pub mod error;
pub mod geometry;
pub mod types;

pub use config::PipelineConfig;
pub use error::{Result, TccError};
pub use geometry::{equivalent_radius_km, haversine_km, EARTH_RADIUS_KM};
pub use types::{
    BtField, BtStats, Classification, Cluster, ClusterEvolution, GeoGrid, Intensity, Mask,
    ProbMap, ShapeMetrics, TrackedObservation,
};
