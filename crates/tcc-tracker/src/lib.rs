//! The Tracker component: Kalman-filtered multi-object tracking with
//! Hungarian assignment across frames.

pub mod evolution;
pub mod hungarian;
pub mod kalman;
pub mod tracker;

pub use tracker::{Prediction, TccTracker};
