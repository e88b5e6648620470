//! Dataset indexing for offline pseudo-label training sets, grounded on
//! `pseudo_labels.py`'s `create_dataset_index`/`generate_labels_for_directory`.

use std::path::{Path, PathBuf};

use serde::Serialize;
use tcc_common::PipelineConfig;
use tcc_ingest::timestamp::parse_timestamp;
use tracing::{info, warn};
use walkdir::WalkDir;

use crate::cluster::label;

/// One row of the dataset index linking a granule to its pseudo-label mask.
#[derive(Debug, Clone, Serialize)]
pub struct DatasetEntry {
    pub h5_path: PathBuf,
    pub timestamp: String,
    pub mask_path: Option<PathBuf>,
    pub has_mask: bool,
}

fn timestamp_string(path: &Path) -> String {
    let filename = path.file_name().and_then(|s| s.to_str()).unwrap_or_default();
    match parse_timestamp(filename) {
        Some(ts) => ts.format("%Y%m%dT%H%M").to_string(),
        None => path.file_stem().and_then(|s| s.to_str()).unwrap_or("unknown").to_string(),
    }
}

fn index_entry(h5_path: &Path, mask_dir: &Path) -> DatasetEntry {
    let timestamp = timestamp_string(h5_path);
    let mask_path = mask_dir.join(format!("{timestamp}.npy"));
    let has_mask = mask_path.exists();
    DatasetEntry {
        h5_path: h5_path.to_path_buf(),
        timestamp,
        mask_path: if has_mask { Some(mask_path) } else { None },
        has_mask,
    }
}

/// Walks `h5_dir` for granules, links each to its mask in `mask_dir` (if
/// present), writes the sorted index as JSON to `output_path`.
pub fn create_dataset_index(h5_dir: &Path, mask_dir: &Path, output_path: &Path) -> std::io::Result<Vec<DatasetEntry>> {
    let mut entries: Vec<DatasetEntry> = WalkDir::new(h5_dir)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.path().extension().and_then(|s| s.to_str()) == Some("h5"))
        .map(|e| index_entry(e.path(), mask_dir))
        .collect();

    entries.sort_by(|a, b| a.timestamp.cmp(&b.timestamp));

    if let Some(parent) = output_path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let json = serde_json::to_string_pretty(&entries)?;
    std::fs::write(output_path, json)?;

    info!(count = entries.len(), path = %output_path.display(), "created dataset index");
    Ok(entries)
}

/// Outcome of labelling one granule under [`generate_labels_for_directory`].
#[derive(Debug, Clone, Serialize)]
pub struct LabelResult {
    pub h5_path: PathBuf,
    pub timestamp: String,
    pub mask_path: PathBuf,
    pub tcc_count: usize,
}

/// Walks `h5_dir` for granules in filename order, runs the label-maker
/// branch on each, and persists the resulting mask under `mask_dir` as
/// `<timestamp>.npy`. Per-granule ingest failures are logged and skipped
/// rather than aborting the batch, mirroring `generate_labels_for_directory`
/// in `pseudo_labels.py`.
pub fn generate_labels_for_directory(h5_dir: &Path, mask_dir: &Path, config: &PipelineConfig) -> std::io::Result<Vec<LabelResult>> {
    let mut h5_paths: Vec<PathBuf> = WalkDir::new(h5_dir)
        .into_iter()
        .filter_map(|e| e.ok())
        .map(|e| e.path().to_path_buf())
        .filter(|p| p.extension().and_then(|s| s.to_str()) == Some("h5"))
        .collect();
    h5_paths.sort();

    std::fs::create_dir_all(mask_dir)?;

    let mut results = Vec::new();
    for h5_path in h5_paths {
        let (bt, geo, _) = match tcc_ingest::open(&h5_path, config) {
            Ok(opened) => opened,
            Err(err) => {
                warn!(path = %h5_path.display(), error = %err, "skipping granule: ingest failed");
                continue;
            }
        };

        let (mask, clusters) = label(&bt, &geo, config);
        let timestamp = timestamp_string(&h5_path);
        let mask_path = mask_dir.join(format!("{timestamp}.npy"));
        if let Err(err) = tcc_render::write_binary_mask(&mask, &mask_path) {
            warn!(path = %mask_path.display(), error = %err, "skipping granule: mask write failed");
            continue;
        }

        results.push(LabelResult {
            h5_path,
            timestamp,
            mask_path,
            tcc_count: clusters.len(),
        });
    }

    info!(count = results.len(), path = %mask_dir.display(), "generated labels for directory");
    Ok(results)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn index_marks_entries_without_masks() {
        let dir = tempfile::tempdir().unwrap();
        let h5_dir = dir.path().join("h5");
        let mask_dir = dir.path().join("masks");
        std::fs::create_dir_all(&h5_dir).unwrap();
        std::fs::write(h5_dir.join("3RIMG_30NOV2023_0045_L1C_ASIA_MER_V01R00.h5"), b"").unwrap();

        let entries = create_dataset_index(&h5_dir, &mask_dir, &dir.path().join("index.json")).unwrap();
        assert_eq!(entries.len(), 1);
        assert!(!entries[0].has_mask);
        assert!(entries[0].mask_path.is_none());
    }

    #[test]
    fn index_is_sorted_by_timestamp() {
        let dir = tempfile::tempdir().unwrap();
        let h5_dir = dir.path().join("h5");
        std::fs::create_dir_all(&h5_dir).unwrap();
        std::fs::write(h5_dir.join("3RIMG_30NOV2023_1200_L1C.h5"), b"").unwrap();
        std::fs::write(h5_dir.join("3RIMG_29NOV2023_0000_L1C.h5"), b"").unwrap();

        let entries = create_dataset_index(&h5_dir, &dir.path().join("masks"), &dir.path().join("index.json")).unwrap();
        assert_eq!(entries.len(), 2);
        assert!(entries[0].timestamp <= entries[1].timestamp);
    }

    #[test]
    fn unreadable_granules_are_skipped_not_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let h5_dir = dir.path().join("h5");
        let mask_dir = dir.path().join("masks");
        std::fs::create_dir_all(&h5_dir).unwrap();
        // Not a real HDF5 container; ingest will fail and this entry should
        // be skipped rather than aborting the whole batch.
        std::fs::write(h5_dir.join("3RIMG_30NOV2023_0045_L1C.h5"), b"not hdf5").unwrap();

        let config = PipelineConfig::default();
        let results = generate_labels_for_directory(&h5_dir, &mask_dir, &config).unwrap();
        assert!(results.is_empty());
    }
}
