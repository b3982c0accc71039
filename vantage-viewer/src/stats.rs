//! Frame statistics sink.
//!
//! Stands in for a renderer: tracks a smoothed frames-per-second figure
//! and periodically reports it, so a headless viewer still shows that
//! the stream is alive and how it performs.

use std::time::Instant;

use tracing::info;
use vantage_core::FrameSink;

/// Frames between two stat reports.
const REPORT_EVERY: u64 = 60;

/// Sliding window length for fps smoothing.
const FPS_WINDOW: usize = 60;

/// [`FrameSink`] that reports stream statistics instead of rendering.
pub struct StatsSink {
    total_frames: u64,
    total_bytes: u64,
    last_frame_at: Option<Instant>,
    intervals: Vec<f64>,
}

impl StatsSink {
    pub fn new() -> Self {
        Self {
            total_frames: 0,
            total_bytes: 0,
            last_frame_at: None,
            intervals: Vec::with_capacity(FPS_WINDOW),
        }
    }

    /// Smoothed frames per second over the sliding window.
    pub fn fps(&self) -> f64 {
        if self.intervals.is_empty() {
            return 0.0;
        }
        let avg = self.intervals.iter().sum::<f64>() / self.intervals.len() as f64;
        if avg > 0.0 { 1.0 / avg } else { 0.0 }
    }

    pub fn total_frames(&self) -> u64 {
        self.total_frames
    }
}

impl Default for StatsSink {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameSink for StatsSink {
    fn on_frame(&mut self, pixels: &[u8], width: u32, height: u32) {
        let now = Instant::now();
        if let Some(last) = self.last_frame_at {
            self.intervals.push(now.duration_since(last).as_secs_f64());
            if self.intervals.len() > FPS_WINDOW {
                self.intervals.remove(0);
            }
        }
        self.last_frame_at = Some(now);

        self.total_frames += 1;
        self.total_bytes += pixels.len() as u64;

        if self.total_frames == 1 {
            info!(width, height, "streaming started");
        }
        if self.total_frames % REPORT_EVERY == 0 {
            info!(
                frames = self.total_frames,
                fps = format_args!("{:.1}", self.fps()),
                width,
                height,
                "stream stats"
            );
        }
    }
}

// ── Tests ────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_frames_and_bytes() {
        let mut sink = StatsSink::new();
        let pixels = vec![0u8; 4 * 4 * 4];
        sink.on_frame(&pixels, 4, 4);
        sink.on_frame(&pixels, 4, 4);
        assert_eq!(sink.total_frames(), 2);
        assert_eq!(sink.total_bytes, 128);
    }

    #[test]
    fn fps_needs_two_frames() {
        let mut sink = StatsSink::new();
        assert_eq!(sink.fps(), 0.0);
        sink.on_frame(&[0u8; 4], 1, 1);
        assert_eq!(sink.fps(), 0.0);
        std::thread::sleep(std::time::Duration::from_millis(10));
        sink.on_frame(&[0u8; 4], 1, 1);
        assert!(sink.fps() > 0.0);
    }
}
