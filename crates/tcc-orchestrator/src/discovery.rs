//! Recursive container discovery for `process_directory`: walks `in_dir`,
//! keeps `.h5` granules, sorts by filename (timestamp-ordered by
//! construction).

use std::path::{Path, PathBuf};

use walkdir::WalkDir;

pub fn discover_containers(in_dir: &Path) -> Vec<PathBuf> {
    let mut paths: Vec<PathBuf> = WalkDir::new(in_dir)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .map(|e| e.path().to_path_buf())
        .filter(|p| p.extension().and_then(|s| s.to_str()) == Some("h5"))
        .collect();
    paths.sort();
    paths
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn discovers_and_sorts_by_filename() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("3RIMG_30NOV2023_1200_L1C.h5"), b"").unwrap();
        std::fs::write(dir.path().join("3RIMG_29NOV2023_0000_L1C.h5"), b"").unwrap();
        std::fs::write(dir.path().join("readme.txt"), b"").unwrap();

        let found = discover_containers(dir.path());
        assert_eq!(found.len(), 2);
        assert!(found[0].to_string_lossy().contains("29NOV2023"));
        assert!(found[1].to_string_lossy().contains("30NOV2023"));
    }

    #[test]
    fn recurses_into_subdirectories() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("sub");
        std::fs::create_dir_all(&nested).unwrap();
        std::fs::write(nested.join("3RIMG_30NOV2023_1200_L1C.h5"), b"").unwrap();

        let found = discover_containers(dir.path());
        assert_eq!(found.len(), 1);
    }
}
