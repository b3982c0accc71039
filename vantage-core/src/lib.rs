//! # vantage-core
//!
//! Protocol library for the Vantage remote desktop system.
//!
//! This crate contains:
//! - **Wire codec**: fixed-layout packet header, frame metadata and
//!   input event (en/de)coding
//! - **Transport**: `Transport` trait and `TcpTransport` — exact reads,
//!   atomic writes, bounded readiness probe, concurrent-safe close
//! - **Host session**: frame pump with pacing and retry policy plus the
//!   inbound input drain, interleaved on one connection
//! - **Viewer session**: receive loop with strict validation, frame
//!   sink delivery and the input send path
//! - **Session manager**: sequential accept loop, one live session at a
//!   time
//! - **Collaborator seams**: `ScreenSource`, `InputSink`, `FrameSink`
//!   and the JPEG frame codec
//! - **Error**: `VantageError` — typed, `thiserror`-based hierarchy

pub mod capture;
pub mod codec;
pub mod error;
pub mod host;
pub mod inject;
pub mod manager;
pub mod transport;
pub mod viewer;
pub mod wire;

// ── Re-exports for ergonomic usage ───────────────────────────────

pub use capture::{RawFrame, ScreenSource, TestPatternSource};
pub use error::VantageError;
pub use host::{HostSession, HostState, MAX_CONSECUTIVE_SEND_FAILURES, StreamConfig};
pub use inject::{InputSink, TracingInjector};
pub use manager::{SessionManager, SourceFactory};
pub use transport::{TcpTransport, Transport};
pub use viewer::{FrameSink, InputSender, ViewerSession, ViewerState};
pub use wire::{
    DEFAULT_FPS, DEFAULT_PORT, DEFAULT_QUALITY, FRAME_METADATA_SIZE, FrameMetadata, HEADER_SIZE,
    KEYBOARD_EVENT_SIZE, KeyboardEvent, KeyboardEventKind, MAX_PACKET_SIZE, MOUSE_EVENT_SIZE,
    MouseEvent, MouseEventKind, PacketHeader, PacketType,
};
