//! File-writing wrappers over [`crate::png`], fulfilling the `write_png`
//! contract.

use std::path::Path;

use tcc_common::{Mask, ProbMap};

use crate::error::Result;
use crate::png::{encode_greyscale, mask_to_greyscale, probability_to_greyscale};

/// Writes a greyscale rendering of `mask` to `path` (`mask.png`).
pub fn write_png(mask: &Mask, path: &Path) -> Result<()> {
    let pixels = mask_to_greyscale(&mask.data);
    let png = encode_greyscale(&pixels, mask.width, mask.height)?;
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, png)?;
    Ok(())
}

/// Writes a greyscale rendering of a probability map, an optional
/// `satellite.png`/`overlay.png`-style inspection artefact.
pub fn write_probability_png(prob: &ProbMap, path: &Path) -> Result<()> {
    let pixels = probability_to_greyscale(&prob.data);
    let png = encode_greyscale(&pixels, prob.width, prob.height)?;
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, png)?;
    Ok(())
}
