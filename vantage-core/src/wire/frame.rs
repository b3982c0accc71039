//! Frame metadata — the fixed prefix of every `ScreenFrame` payload.

use crate::error::VantageError;

/// Encoded size of [`FrameMetadata`] on the wire.
pub const FRAME_METADATA_SIZE: usize = 12;

/// Describes the *decoded* image that follows in the payload.
///
/// The JPEG data occupies the remaining `data_size - 12` payload bytes.
/// After decoding, the image dimensions must equal `width`/`height`;
/// a mismatch is a protocol error, not a warning.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameMetadata {
    pub width: u32,
    pub height: u32,
    /// JPEG quality the frame was encoded with (1–100).
    pub quality: u32,
}

impl FrameMetadata {
    pub fn new(width: u32, height: u32, quality: u32) -> Self {
        Self {
            width,
            height,
            quality,
        }
    }

    /// Serialize to bytes (little-endian).
    pub fn encode(&self) -> [u8; FRAME_METADATA_SIZE] {
        let mut buf = [0u8; FRAME_METADATA_SIZE];
        buf[0..4].copy_from_slice(&self.width.to_le_bytes());
        buf[4..8].copy_from_slice(&self.height.to_le_bytes());
        buf[8..12].copy_from_slice(&self.quality.to_le_bytes());
        buf
    }

    /// Deserialize from bytes.
    pub fn decode(data: &[u8]) -> Result<Self, VantageError> {
        if data.len() < FRAME_METADATA_SIZE {
            return Err(VantageError::InvalidHeader("frame metadata truncated"));
        }
        Ok(Self {
            width: u32::from_le_bytes(data[0..4].try_into().unwrap()),
            height: u32::from_le_bytes(data[4..8].try_into().unwrap()),
            quality: u32::from_le_bytes(data[8..12].try_into().unwrap()),
        })
    }
}

// ── Tests ────────────────────────────────────────────────────────
