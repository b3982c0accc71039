//! Reliable byte-stream transport over a connected TCP socket.
//!
//! [`Transport`] is the seam between the session engines and the
//! network: an exact-length read, an all-or-nothing write, a bounded
//! readiness probe, and an idempotent close that unblocks concurrent
//! I/O. Sessions hold it behind `Arc<dyn Transport>` so tests can
//! substitute fault-injecting implementations.
//!
//! The two stream directions are independent: one activity may block in
//! `receive_exact` while another calls `send`. Each `send` call is
//! atomic with respect to other sends on the same transport (the writer
//! half is guarded by a mutex), and reads are packet-at-a-time by
//! session contract, so no further locking is needed.

use std::io::ErrorKind;
use std::net::SocketAddr;
use std::time::Duration;

use async_trait::async_trait;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};
use tokio::sync::Mutex;
use tokio_util::sync::CancellationToken;

use crate::error::VantageError;

// ── Transport trait ──────────────────────────────────────────────

/// Contract over a connected, ordered, reliable byte stream.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Write all of `bytes` before returning success. Partial writes
    /// are retried internally until complete or the stream fails.
    async fn send(&self, bytes: &[u8]) -> Result<(), VantageError>;

    /// Block until exactly `len` bytes have been read. A stream that
    /// ends early — EOF or a connection reset — yields
    /// [`VantageError::Closed`], never a short read.
    async fn receive_exact(&self, len: usize) -> Result<Vec<u8>, VantageError>;

    /// Readiness probe bounded by `timeout`. Returns `true` when at
    /// least one byte can be read without blocking (including a pending
    /// EOF, which the next read surfaces as an error).
    async fn has_data(&self, timeout: Duration) -> Result<bool, VantageError>;

    /// Close the transport. Idempotent, and safe to call from a
    /// different task than one blocked in `send`/`receive_exact`: any
    /// in-flight operation returns [`VantageError::Closed`] promptly.
    fn close(&self);

    /// Whether `close` has been called.
    fn is_closed(&self) -> bool;
}

// ── TcpTransport ─────────────────────────────────────────────────

/// [`Transport`] implementation over a `tokio::net::TcpStream`.
///
/// The stream is split into owned halves so that the read and write
/// paths never contend with each other; a [`CancellationToken`] carries
/// the close signal to both.
pub struct TcpTransport {
    reader: Mutex<OwnedReadHalf>,
    writer: Mutex<OwnedWriteHalf>,
    shutdown: CancellationToken,
    peer_addr: Option<SocketAddr>,
}

impl TcpTransport {
    /// Wrap an already-connected stream.
    pub fn new(stream: TcpStream) -> Self {
        let peer_addr = stream.peer_addr().ok();
        let (reader, writer) = stream.into_split();
        Self {
            reader: Mutex::new(reader),
            writer: Mutex::new(writer),
            shutdown: CancellationToken::new(),
            peer_addr,
        }
    }

    /// The remote address, when the socket could report one.
    pub fn peer_addr(&self) -> Option<SocketAddr> {
        self.peer_addr
    }
}

#[async_trait]
impl Transport for TcpTransport {
    async fn send(&self, bytes: &[u8]) -> Result<(), VantageError> {
        let write = async {
            let mut writer = self.writer.lock().await;
            writer.write_all(bytes).await?;
            writer.flush().await?;
            Ok::<_, std::io::Error>(())
        };

        tokio::select! {
            biased;
            _ = self.shutdown.cancelled() => Err(VantageError::Closed),
            res = write => res.map_err(VantageError::from),
        }
    }

    async fn receive_exact(&self, len: usize) -> Result<Vec<u8>, VantageError> {
        let read = async {
            let mut reader = self.reader.lock().await;
            let mut buf = vec![0u8; len];
            reader.read_exact(&mut buf).await?;
            Ok::<_, std::io::Error>(buf)
        };

        tokio::select! {
            biased;
            _ = self.shutdown.cancelled() => Err(VantageError::Closed),
            res = read => res.map_err(|e| match e.kind() {
                // A peer that vanished mid-stream (clean FIN or an RST,
                // as when it dropped the socket with unread data) is the
                // same outcome for the session: the stream is over.
                ErrorKind::UnexpectedEof
                | ErrorKind::ConnectionReset
                | ErrorKind::ConnectionAborted => VantageError::Closed,
                _ => VantageError::from(e),
            }),
        }
    }

    async fn has_data(&self, timeout: Duration) -> Result<bool, VantageError> {
        let probe = async {
            let reader = self.reader.lock().await;
            reader.readable().await
        };

        tokio::select! {
            biased;
            _ = self.shutdown.cancelled() => Err(VantageError::Closed),
            res = tokio::time::timeout(timeout, probe) => match res {
                Ok(Ok(())) => Ok(true),
                Ok(Err(e)) => Err(e.into()),
                Err(_elapsed) => Ok(false),
            },
        }
    }

    fn close(&self) {
        self.shutdown.cancel();
    }

    fn is_closed(&self) -> bool {
        self.shutdown.is_cancelled()
    }
}

// ── Tests ────────────────────────────────────────────────────────
