//! Hand-rolled greyscale PNG encoding, adapted from the renderer crate's
//! `create_png`/`create_png_indexed` for single-channel mask/probability
//! rendering (color type 0, 8 bits per pixel) rather than RGBA tiles.

use std::io::Write;

use crate::error::{Result, SerialiseError};

/// Encodes `pixels` (one greyscale byte per pixel, row-major) as an 8-bit
/// greyscale PNG (color type 0).
pub fn encode_greyscale(pixels: &[u8], width: usize, height: usize) -> Result<Vec<u8>> {
    if pixels.len() != width * height {
        return Err(SerialiseError::EncoderUnavailable(format!(
            "pixel buffer length {} does not match {}x{}",
            pixels.len(),
            width,
            height
        )));
    }

    let mut png = Vec::new();
    png.extend_from_slice(&[137, 80, 78, 71, 13, 10, 26, 10]);

    let mut ihdr = Vec::with_capacity(13);
    ihdr.extend_from_slice(&(width as u32).to_be_bytes());
    ihdr.extend_from_slice(&(height as u32).to_be_bytes());
    ihdr.push(8); // bit depth
    ihdr.push(0); // color type 0 = greyscale
    ihdr.push(0); // compression method
    ihdr.push(0); // filter method
    ihdr.push(0); // interlace method
    write_chunk(&mut png, b"IHDR", &ihdr);

    let idat = deflate_scanlines(pixels, width, height)?;
    write_chunk(&mut png, b"IDAT", &idat);

    write_chunk(&mut png, b"IEND", &[]);

    Ok(png)
}

/// Renders a binary `{0,1}` mask as black/white: 0 -> 0x00, 1 -> 0xFF.
pub fn mask_to_greyscale(mask_data: &[u8]) -> Vec<u8> {
    mask_data.iter().map(|&v| if v != 0 { 255 } else { 0 }).collect()
}

/// Renders a `[0,1]` probability field as an 8-bit greyscale image.
pub fn probability_to_greyscale(prob_data: &[f32]) -> Vec<u8> {
    prob_data
        .iter()
        .map(|&p| (p.clamp(0.0, 1.0) * 255.0).round() as u8)
        .collect()
}

fn deflate_scanlines(pixels: &[u8], width: usize, height: usize) -> Result<Vec<u8>> {
    let mut uncompressed = Vec::with_capacity(height * (1 + width));
    for y in 0..height {
        uncompressed.push(0); // filter type: none
        let start = y * width;
        uncompressed.extend_from_slice(&pixels[start..start + width]);
    }

    let mut encoder = flate2::write::ZlibEncoder::new(Vec::new(), flate2::Compression::fast());
    encoder
        .write_all(&uncompressed)
        .map_err(|e| SerialiseError::EncoderUnavailable(e.to_string()))?;
    encoder
        .finish()
        .map_err(|e| SerialiseError::EncoderUnavailable(e.to_string()))
}

fn write_chunk(png: &mut Vec<u8>, chunk_type: &[u8; 4], data: &[u8]) {
    png.extend_from_slice(&(data.len() as u32).to_be_bytes());
    png.extend_from_slice(chunk_type);
    png.extend_from_slice(data);
    let crc_data = [chunk_type.as_slice(), data].concat();
    png.extend_from_slice(&crc32fast::hash(&crc_data).to_be_bytes());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_sky_mask_encodes_as_all_black() {
        let pixels = mask_to_greyscale(&vec![0u8; 16]);
        assert!(pixels.iter().all(|&p| p == 0));
        let png = encode_greyscale(&pixels, 4, 4).unwrap();
        assert_eq!(&png[0..8], &[137, 80, 78, 71, 13, 10, 26, 10]);
    }

    #[test]
    fn foreground_pixels_render_white() {
        let pixels = mask_to_greyscale(&[0, 1, 1, 0]);
        assert_eq!(pixels, vec![0, 255, 255, 0]);
    }

    #[test]
    fn mismatched_buffer_length_is_rejected() {
        let result = encode_greyscale(&[0, 1, 2], 2, 2);
        assert!(result.is_err());
    }

    #[test]
    fn png_chunk_order_is_ihdr_idat_iend() {
        let png = encode_greyscale(&[0; 4], 2, 2).unwrap();
        // IHDR type bytes start right after the 8-byte signature + 4-byte length.
        assert_eq!(&png[12..16], b"IHDR");
    }
}
