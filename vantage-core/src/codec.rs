//! Lossy frame codec — BGRA pixels to JPEG and back.
//!
//! Two pure functions, no state. The session engines treat these as an
//! opaque collaborator: the host encodes each captured frame, the
//! viewer decodes and compares the reported dimensions against the
//! frame metadata.

use std::io::Cursor;

use image::codecs::jpeg::JpegEncoder;
use image::{ExtendedColorType, ImageEncoder, ImageFormat, ImageReader};

use crate::error::VantageError;

/// Compress a BGRA pixel buffer to JPEG at the given quality (clamped
/// to 1–100). `pixels` must hold exactly `width * height * 4` bytes.
pub fn encode_frame(
    pixels: &[u8],
    width: u32,
    height: u32,
    quality: u32,
) -> Result<Vec<u8>, VantageError> {
    let expected = width as usize * height as usize * 4;
    if pixels.len() != expected {
        return Err(VantageError::Encoding(format!(
            "pixel buffer is {} bytes, {width}x{height} BGRA needs {expected}",
            pixels.len(),
        )));
    }

    // JPEG has no alpha; drop it and swap to RGB channel order.
    let mut rgb = Vec::with_capacity(width as usize * height as usize * 3);
    for px in pixels.chunks_exact(4) {
        rgb.extend_from_slice(&[px[2], px[1], px[0]]);
    }

    let quality = quality.clamp(1, 100) as u8;
    let mut out = Vec::new();
    JpegEncoder::new_with_quality(&mut out, quality)
        .write_image(&rgb, width, height, ExtendedColorType::Rgb8)
        .map_err(|e| VantageError::Encoding(e.to_string()))?;
    Ok(out)
}

/// Decompress a JPEG payload back into a BGRA buffer, returning the
/// decoded dimensions alongside the pixels.
pub fn decode_frame(data: &[u8]) -> Result<(Vec<u8>, u32, u32), VantageError> {
    let mut reader = ImageReader::new(Cursor::new(data));
    reader.set_format(ImageFormat::Jpeg);
    let img = reader
        .decode()
        .map_err(|e| VantageError::Encoding(e.to_string()))?;

    let rgb = img.into_rgb8();
    let (width, height) = rgb.dimensions();

    let mut bgra = Vec::with_capacity(width as usize * height as usize * 4);
    for px in rgb.pixels() {
        bgra.extend_from_slice(&[px.0[2], px.0[1], px.0[0], 0xFF]);
    }
    Ok((bgra, width, height))
}

// ── Tests ────────────────────────────────────────────────────────
