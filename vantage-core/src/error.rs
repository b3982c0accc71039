//! Domain-specific error types for the Vantage protocol.
//!
//! All fallible operations return `Result<T, VantageError>`.
//! No panics on invalid input — every error is typed and recoverable.

use thiserror::Error;

/// The canonical error type for the Vantage protocol.
#[derive(Debug, Error)]
pub enum VantageError {
    // ── Protocol Errors ──────────────────────────────────────────
    /// A field in the packet header could not be parsed.
    #[error("invalid header: {0}")]
    InvalidHeader(&'static str),

    /// A numeric value did not map to any known enum variant.
    #[error("unknown {type_name} discriminant: {value:#x}")]
    UnknownVariant { type_name: &'static str, value: u32 },

    /// A packet arrived where the protocol does not allow it.
    #[error("protocol violation: {0}")]
    ProtocolViolation(&'static str),

    /// The declared payload size exceeds the hard maximum.
    #[error("payload too large: {size} bytes (max {max})")]
    PayloadTooLarge { size: usize, max: usize },

    /// The declared payload size does not match the expected wire size.
    #[error("invalid packet length: expected {expected}, got {actual}")]
    InvalidPacketLength { expected: usize, actual: usize },

    /// Decoded frame dimensions disagree with the frame metadata.
    #[error("dimension mismatch: metadata {expected_width}x{expected_height}, decoded {actual_width}x{actual_height}")]
    DimensionMismatch {
        expected_width: u32,
        expected_height: u32,
        actual_width: u32,
        actual_height: u32,
    },

    // ── Connection Errors ────────────────────────────────────────
    /// The TCP/IO layer reported an error.
    #[error("connection error: {0}")]
    Connection(#[from] std::io::Error),

    /// The transport was closed, locally or by the peer.
    #[error("transport closed")]
    Closed,

    /// The host's frame pump exhausted its consecutive-failure budget.
    #[error("too many consecutive send failures ({0})")]
    TooManyFailures(u32),

    // ── Collaborator Errors ──────────────────────────────────────
    /// JPEG encoding or decoding of a frame failed.
    #[error("encoding error: {0}")]
    Encoding(String),

    /// Screen acquisition failed.
    #[error("capture error: {0}")]
    Capture(String),

    /// Input injection into the local OS failed.
    #[error("injection error: {0}")]
    Injection(String),
}

impl VantageError {
    /// Whether this error came from the I/O layer rather than from the
    /// packet contents. I/O errors are the only errors the host's frame
    /// pump retries under its counted policy.
    pub fn is_io(&self) -> bool {
        matches!(self, VantageError::Connection(_) | VantageError::Closed)
    }
}
