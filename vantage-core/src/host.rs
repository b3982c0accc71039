//! Host session — captures, paces and transmits frames while draining
//! inbound input events off the same connection.
//!
//! One session owns one transport and runs both directions as a single
//! cooperative loop: each tick first drains at most one pending input
//! packet (via the transport's bounded readiness probe, so the frame
//! pump is never starved), then advances the frame pump if the pacing
//! interval has elapsed.
//!
//! ## Failure policy
//!
//! - Capture or encode failure: the frame is skipped, logged, never
//!   fatal.
//! - Send failure: counted; more than [`MAX_CONSECUTIVE_SEND_FAILURES`]
//!   in a row closes the session. Any success resets the counter.
//! - Input injection failure: logged, never fatal.
//! - Malformed or unexpected inbound packet, or any read failure while
//!   draining: fatal — the stream framing cannot be trusted afterwards.

use std::sync::Arc;
use std::time::{Duration, Instant};

use tracing::{debug, info, warn};

use crate::capture::ScreenSource;
use crate::codec;
use crate::error::VantageError;
use crate::inject::InputSink;
use crate::transport::Transport;
use crate::wire::{
    DEFAULT_FPS, DEFAULT_QUALITY, FRAME_METADATA_SIZE, FrameMetadata, HEADER_SIZE,
    KEYBOARD_EVENT_SIZE, KeyboardEvent, MOUSE_EVENT_SIZE, MouseEvent, PacketHeader, PacketType,
};

/// Consecutive send failures tolerated before the session closes.
pub const MAX_CONSECUTIVE_SEND_FAILURES: u32 = 5;

/// How long the input drain waits for the readiness probe each tick.
const INPUT_POLL_TIMEOUT: Duration = Duration::from_millis(1);

/// Sleep between pacing re-checks while waiting for the next frame slot.
const PACING_TICK: Duration = Duration::from_millis(1);

// ── StreamConfig ─────────────────────────────────────────────────

/// Tunables for one streaming session.
#[derive(Debug, Clone)]
pub struct StreamConfig {
    /// Target frame rate in Hz (1–240).
    pub target_fps: u32,
    /// JPEG quality for every transmitted frame (1–100).
    pub quality: u32,
}

impl Default for StreamConfig {
    fn default() -> Self {
        Self {
            target_fps: DEFAULT_FPS,
            quality: DEFAULT_QUALITY,
        }
    }
}

impl StreamConfig {
    /// Minimum time between two transmitted frames.
    pub fn pacing_interval(&self) -> Duration {
        Duration::from_millis(1000 / u64::from(self.target_fps.clamp(1, 240)))
    }
}

// ── HostSession ──────────────────────────────────────────────────

/// Lifecycle of a session; transitions are unidirectional.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostState {
    Idle,
    Streaming,
    Closed,
}

/// Host-side engine for exactly one accepted viewer connection.
pub struct HostSession {
    transport: Arc<dyn Transport>,
    config: StreamConfig,
    source: Box<dyn ScreenSource>,
    input: Arc<dyn InputSink>,
    state: HostState,
}

impl HostSession {
    pub fn new(
        transport: Arc<dyn Transport>,
        config: StreamConfig,
        source: Box<dyn ScreenSource>,
        input: Arc<dyn InputSink>,
    ) -> Self {
        Self {
            transport,
            config,
            source,
            input,
            state: HostState::Idle,
        }
    }

    /// Current lifecycle state.
    pub fn state(&self) -> HostState {
        self.state
    }

    /// Cloneable handle for closing the session from another task.
    pub fn close_handle(&self) -> Arc<dyn Transport> {
        Arc::clone(&self.transport)
    }

    /// Run the session to completion.
    ///
    /// Returns `Ok(())` when the session was closed locally via
    /// [`close_handle`](Self::close_handle), otherwise the error that
    /// ended it (peer disconnect surfaces as [`VantageError::Closed`]).
    pub async fn run(&mut self) -> Result<(), VantageError> {
        self.state = HostState::Streaming;
        let interval = self.config.pacing_interval();
        let mut last_frame: Option<Instant> = None;
        let mut consecutive_failures: u32 = 0;
        let mut frames_sent: u64 = 0;

        let result = loop {
            if self.transport.is_closed() {
                break Ok(());
            }

            // Inbound first: pull at most one pending input packet.
            if let Err(e) = self.drain_input().await {
                break Err(e);
            }

            // Pace the pump; the drain probe above already yielded.
            if let Some(at) = last_frame {
                if at.elapsed() < interval {
                    tokio::time::sleep(PACING_TICK).await;
                    continue;
                }
            }

            match self.pump_frame().await {
                Ok(()) => {
                    consecutive_failures = 0;
                    last_frame = Some(Instant::now());
                    frames_sent += 1;
                    if frames_sent % 100 == 0 {
                        debug!(frames_sent, "frame pump progress");
                    }
                }
                Err(e) if e.is_io() => {
                    consecutive_failures += 1;
                    warn!(error = %e, consecutive_failures, "frame send failed");
                    if consecutive_failures > MAX_CONSECUTIVE_SEND_FAILURES {
                        break Err(VantageError::TooManyFailures(consecutive_failures));
                    }
                }
                Err(e) => {
                    // Capture or encode hiccup: this frame is lost, the
                    // next one supersedes it.
                    warn!(error = %e, "frame skipped");
                }
            }
        };

        self.transport.close();
        self.state = HostState::Closed;
        info!(frames_sent, "host session closed");
        result
    }

    /// Capture, encode and transmit one frame.
    async fn pump_frame(&mut self) -> Result<(), VantageError> {
        let raw = self.source.capture()?;
        let jpeg = codec::encode_frame(&raw.pixels, raw.width, raw.height, self.config.quality)?;

        let metadata = FrameMetadata::new(raw.width, raw.height, self.config.quality);
        let header = PacketHeader::new(
            PacketType::ScreenFrame,
            (FRAME_METADATA_SIZE + jpeg.len()) as u32,
        );

        // Header, metadata, image data, in that order. The pump is the
        // only sender on this transport, so the three writes cannot
        // interleave with anything.
        self.transport.send(&header.encode()).await?;
        self.transport.send(&metadata.encode()).await?;
        self.transport.send(&jpeg).await?;
        Ok(())
    }

    /// Read and dispatch one inbound input packet, if any is pending.
    async fn drain_input(&mut self) -> Result<(), VantageError> {
        if !self.transport.has_data(INPUT_POLL_TIMEOUT).await? {
            return Ok(());
        }

        let header_bytes = self.transport.receive_exact(HEADER_SIZE).await?;
        let header = PacketHeader::decode(&header_bytes)?;

        match header.packet_type {
            PacketType::MouseInput => {
                if header.data_size as usize != MOUSE_EVENT_SIZE {
                    return Err(VantageError::InvalidPacketLength {
                        expected: MOUSE_EVENT_SIZE,
                        actual: header.data_size as usize,
                    });
                }
                let payload = self.transport.receive_exact(MOUSE_EVENT_SIZE).await?;
                let event = MouseEvent::decode(&payload)?;
                if let Err(e) = self.input.inject_mouse(&event) {
                    warn!(error = %e, "mouse injection failed");
                }
            }
            PacketType::KeyboardInput => {
                if header.data_size as usize != KEYBOARD_EVENT_SIZE {
                    return Err(VantageError::InvalidPacketLength {
                        expected: KEYBOARD_EVENT_SIZE,
                        actual: header.data_size as usize,
                    });
                }
                let payload = self.transport.receive_exact(KEYBOARD_EVENT_SIZE).await?;
                let event = KeyboardEvent::decode(&payload)?;
                if let Err(e) = self.input.inject_keyboard(&event) {
                    warn!(error = %e, "keyboard injection failed");
                }
            }
            _ => {
                return Err(VantageError::ProtocolViolation(
                    "unexpected packet type from viewer",
                ));
            }
        }
        Ok(())
    }
}

// ── Tests ────────────────────────────────────────────────────────
