//! Screen acquisition boundary.
//!
//! Producing a raw pixel buffer for the current display is platform
//! work the session engines stay out of: the host's frame pump calls a
//! [`ScreenSource`] once per tick and treats a failure as a skipped
//! frame. Platform capturers (DXGI, X11, CoreGraphics) implement the
//! trait outside this crate; [`TestPatternSource`] provides frames for
//! tests and for hosts running without a wired-in capturer.

use crate::error::VantageError;

// ── RawFrame ─────────────────────────────────────────────────────

/// One uncompressed captured frame, 8-bit BGRA, row-major, no padding.
#[derive(Debug, Clone)]
pub struct RawFrame {
    pub width: u32,
    pub height: u32,
    /// `width * height * 4` bytes of BGRA pixel data.
    pub pixels: Vec<u8>,
}

// ── ScreenSource ─────────────────────────────────────────────────

/// Produces the current display contents as a pixel buffer.
pub trait ScreenSource: Send {
    /// Acquire one frame. Blocking is acceptable; the frame pump calls
    /// this at most once per pacing interval.
    fn capture(&mut self) -> Result<RawFrame, VantageError>;
}

// ── TestPatternSource ────────────────────────────────────────────

/// Deterministic moving-gradient source.
pub struct TestPatternSource {
    width: u32,
    height: u32,
    tick: u64,
}

impl TestPatternSource {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width: width.max(1),
            height: height.max(1),
            tick: 0,
        }
    }
}

impl ScreenSource for TestPatternSource {
    fn capture(&mut self) -> Result<RawFrame, VantageError> {
        let (w, h) = (self.width, self.height);
        let phase = self.tick as u8;
        let mut pixels = Vec::with_capacity((w * h * 4) as usize);
        for y in 0..h {
            for x in 0..w {
                let b = ((x * 255 / w) as u8).wrapping_add(phase);
                let g = (y * 255 / h) as u8;
                pixels.extend_from_slice(&[b, g, phase, 0xFF]);
            }
        }
        self.tick += 1;
        Ok(RawFrame {
            width: w,
            height: h,
            pixels,
        })
    }
}

// ── Tests ────────────────────────────────────────────────────────
