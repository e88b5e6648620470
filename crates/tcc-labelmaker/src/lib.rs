//! The Label-Maker offline branch: BT-threshold + density clustering with
//! geophysical filters, used to synthesise training masks. Also hosts the
//! dataset-indexing tooling built on top of it.

pub mod cluster;
pub mod dataset_index;
pub mod dbscan;

pub use cluster::label;
pub use dataset_index::{create_dataset_index, generate_labels_for_directory, DatasetEntry, LabelResult};
