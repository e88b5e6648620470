//! The Serialiser component: raw binary masks, greyscale PNGs, CF-1.8
//! NetCDF, and trajectory CSV/NetCDF/JSON exports.

pub mod error;
pub mod image_writer;
pub mod mask_io;
pub mod netcdf_writer;
pub mod png;
pub mod reports;
pub mod trajectory;

pub use error::{Result, SerialiseError};
pub use image_writer::{write_png, write_probability_png};
pub use mask_io::{read_binary_mask, write_binary_mask};
pub use netcdf_writer::write_netcdf;
pub use reports::{write_analysis_json, write_predictions_json, AnalysisReport, PredictionsReport};
pub use trajectory::{write_trajectory_csv, write_trajectory_netcdf};
