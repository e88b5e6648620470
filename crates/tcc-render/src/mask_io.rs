//! Raw binary mask persistence (`mask.npy`). One byte per pixel,
//! row-major, no header. The `.npy` extension is kept for drop-in
//! compatibility with downstream tooling but the payload is the plain
//! raw-byte encoding, not a NumPy container.

use std::path::Path;

use tcc_common::Mask;

use crate::error::Result;

pub fn write_binary_mask(mask: &Mask, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, &mask.data)?;
    Ok(())
}

/// Reads back a mask written by [`write_binary_mask`], given its shape.
pub fn read_binary_mask(path: &Path, width: usize, height: usize) -> Result<Mask> {
    let data = std::fs::read(path)?;
    Ok(Mask {
        data,
        width,
        height,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_through_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("mask.npy");

        let mut mask = Mask::zeros(4, 4);
        mask.set(0, 0, 1);
        mask.set(3, 3, 1);

        write_binary_mask(&mask, &path).unwrap();
        let loaded = read_binary_mask(&path, 4, 4).unwrap();
        assert_eq!(loaded.data, mask.data);
    }

    #[test]
    fn creates_parent_directories() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested/deep/mask.npy");
        write_binary_mask(&Mask::zeros(2, 2), &path).unwrap();
        assert!(path.exists());
    }
}
