//! Viewer session — receives, validates and decodes framed packets,
//! and sends input events back toward the host.
//!
//! The receive loop owns the transport's read direction and hands every
//! decoded frame to the registered [`FrameSink`] synchronously: the
//! loop does not read the next header until the sink returns, so a
//! slow consumer backpressures the host through TCP itself. Input
//! events travel the write direction through a cloneable
//! [`InputSender`] and may be sent concurrently with the receive loop.
//!
//! Every protocol violation is fatal: once a header lies about its
//! payload, the stream framing cannot be resynchronized mid-stream.

use std::sync::Arc;

use tokio::net::{TcpStream, ToSocketAddrs};
use tracing::{debug, info};

use crate::codec;
use crate::error::VantageError;
use crate::transport::{TcpTransport, Transport};
use crate::wire::{
    FRAME_METADATA_SIZE, FrameMetadata, HEADER_SIZE, KEYBOARD_EVENT_SIZE, KeyboardEvent,
    MOUSE_EVENT_SIZE, MouseEvent, PacketHeader, PacketType,
};

// ── FrameSink ────────────────────────────────────────────────────

/// Consumer of decoded frames.
pub trait FrameSink: Send {
    /// Called once per received frame with a BGRA buffer of exactly
    /// `width * height * 4` bytes. Runs on the receive loop; taking
    /// long here deliberately backpressures the host.
    fn on_frame(&mut self, pixels: &[u8], width: u32, height: u32);
}

// ── ViewerSession ────────────────────────────────────────────────

/// Lifecycle of a viewer session; transitions are unidirectional.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewerState {
    Idle,
    Connected,
    Closed,
}

/// Viewer-side engine for exactly one outbound connection.
pub struct ViewerSession {
    transport: Arc<dyn Transport>,
    sink: Box<dyn FrameSink>,
    state: ViewerState,
}

impl ViewerSession {
    /// Connect to a host and wrap the stream in a session.
    pub async fn connect(
        addr: impl ToSocketAddrs,
        sink: Box<dyn FrameSink>,
    ) -> Result<Self, VantageError> {
        let stream = TcpStream::connect(addr).await?;
        Ok(Self::new(Arc::new(TcpTransport::new(stream)), sink))
    }

    /// Wrap an existing transport (tests inject fakes through here).
    pub fn new(transport: Arc<dyn Transport>, sink: Box<dyn FrameSink>) -> Self {
        Self {
            transport,
            sink,
            state: ViewerState::Idle,
        }
    }

    /// Current lifecycle state.
    pub fn state(&self) -> ViewerState {
        self.state
    }

    /// Cloneable handle for sending input events from another task.
    pub fn input_sender(&self) -> InputSender {
        InputSender {
            transport: Arc::clone(&self.transport),
        }
    }

    /// Cloneable handle for closing the session from another task.
    pub fn close_handle(&self) -> Arc<dyn Transport> {
        Arc::clone(&self.transport)
    }

    /// Run the receive loop until the transport closes or a protocol
    /// error occurs.
    ///
    /// The transport closing under the header read is the normal way a
    /// viewer session ends and yields `Ok(())`; everything else is an
    /// error. Either way the transport is closed on exit and the
    /// decision to reconnect is the caller's.
    pub async fn run(&mut self) -> Result<(), VantageError> {
        self.state = ViewerState::Connected;
        let mut frames_received: u64 = 0;

        let result = loop {
            let header_bytes = match self.transport.receive_exact(HEADER_SIZE).await {
                Ok(bytes) => bytes,
                Err(VantageError::Closed) => break Ok(()),
                Err(e) => break Err(e),
            };

            match self.receive_frame(&header_bytes).await {
                Ok(()) => {
                    frames_received += 1;
                    if frames_received == 1 {
                        debug!("first frame received");
                    }
                    if frames_received % 100 == 0 {
                        debug!(frames_received, "receive progress");
                    }
                }
                Err(e) => break Err(e),
            }
        };

        self.transport.close();
        self.state = ViewerState::Closed;
        info!(frames_received, "viewer session closed");
        result
    }

    /// Validate, read and decode one frame, then deliver it.
    async fn receive_frame(&mut self, header_bytes: &[u8]) -> Result<(), VantageError> {
        let header = PacketHeader::decode(header_bytes)?;
        if header.packet_type != PacketType::ScreenFrame {
            return Err(VantageError::ProtocolViolation(
                "expected a screen frame packet",
            ));
        }
        // Size bounds are checked before any payload byte is read.
        header.validate_frame_size()?;

        let metadata_bytes = self.transport.receive_exact(FRAME_METADATA_SIZE).await?;
        let metadata = FrameMetadata::decode(&metadata_bytes)?;

        let image_len = header.data_size as usize - FRAME_METADATA_SIZE;
        let jpeg = self.transport.receive_exact(image_len).await?;

        let (pixels, width, height) = codec::decode_frame(&jpeg)?;
        if width != metadata.width || height != metadata.height {
            return Err(VantageError::DimensionMismatch {
                expected_width: metadata.width,
                expected_height: metadata.height,
                actual_width: width,
                actual_height: height,
            });
        }

        self.sink.on_frame(&pixels, width, height);
        Ok(())
    }
}

// ── InputSender ──────────────────────────────────────────────────

/// Sends mouse and keyboard events toward the host.
///
/// Each event is written as one contiguous header+payload buffer, so
/// concurrent senders on the same transport can never interleave bytes
/// within a packet.
#[derive(Clone)]
pub struct InputSender {
    transport: Arc<dyn Transport>,
}

impl InputSender {
    pub async fn send_mouse(&self, event: &MouseEvent) -> Result<(), VantageError> {
        let header = PacketHeader::new(PacketType::MouseInput, MOUSE_EVENT_SIZE as u32);
        let mut buf = Vec::with_capacity(HEADER_SIZE + MOUSE_EVENT_SIZE);
        buf.extend_from_slice(&header.encode());
        buf.extend_from_slice(&event.encode());
        self.transport.send(&buf).await
    }

    pub async fn send_keyboard(&self, event: &KeyboardEvent) -> Result<(), VantageError> {
        let header = PacketHeader::new(PacketType::KeyboardInput, KEYBOARD_EVENT_SIZE as u32);
        let mut buf = Vec::with_capacity(HEADER_SIZE + KEYBOARD_EVENT_SIZE);
        buf.extend_from_slice(&header.encode());
        buf.extend_from_slice(&event.encode());
        self.transport.send(&buf).await
    }
}

// ── Tests ────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wire::MAX_PACKET_SIZE;
    use std::sync::Mutex;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    /// Sink recording the dimensions of every delivered frame.
    #[derive(Clone, Default)]
    struct CollectingSink {
        frames: Arc<Mutex<Vec<(u32, u32)>>>,
    }

    impl FrameSink for CollectingSink {
        fn on_frame(&mut self, pixels: &[u8], width: u32, height: u32) {
            assert_eq!(pixels.len(), (width * height * 4) as usize);
            self.frames.lock().unwrap().push((width, height));
        }
    }

    /// Viewer session connected to a raw peer stream we drive by hand.
    async fn viewer_with_peer(sink: Box<dyn FrameSink>) -> (ViewerSession, TcpStream) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let peer = tokio::spawn(async move { listener.accept().await.unwrap().0 });

        let stream = TcpStream::connect(addr).await.unwrap();
        let session = ViewerSession::new(Arc::new(TcpTransport::new(stream)), sink);
        (session, peer.await.unwrap())
    }

    /// A complete, valid SCREEN_FRAME packet for a solid-color frame.
    fn frame_packet(width: u32, height: u32) -> Vec<u8> {
        let pixels = vec![0x80u8; (width * height * 4) as usize];
        let jpeg = codec::encode_frame(&pixels, width, height, 75).unwrap();

        let mut buf = Vec::new();
        let header = PacketHeader::new(
            PacketType::ScreenFrame,
            (FRAME_METADATA_SIZE + jpeg.len()) as u32,
        );
        buf.extend_from_slice(&header.encode());
        buf.extend_from_slice(&FrameMetadata::new(width, height, 75).encode());
        buf.extend_from_slice(&jpeg);
        buf
    }

    #[tokio::test]
    async fn frames_delivered_in_order() {
        let sink = CollectingSink::default();
        let frames = sink.frames.clone();
        let (mut session, mut peer) = viewer_with_peer(Box::new(sink)).await;

        let run = tokio::spawn(async move { session.run().await });

        // Distinct widths so delivery order is observable.
        for width in [16u32, 17, 18] {
            peer.write_all(&frame_packet(width, 16)).await.unwrap();
        }
        peer.shutdown().await.unwrap();
        drop(peer);

        let result = tokio::time::timeout(std::time::Duration::from_secs(5), run)
            .await
            .unwrap()
            .unwrap();
        assert!(result.is_ok(), "clean peer close is a normal end: {result:?}");
        assert_eq!(frames.lock().unwrap().as_slice(), &[(16, 16), (17, 16), (18, 16)]);
    }

    #[tokio::test]
    async fn non_frame_packet_is_fatal() {
        let sink = CollectingSink::default();
        let frames = sink.frames.clone();
        let (mut session, mut peer) = viewer_with_peer(Box::new(sink)).await;
        let run = tokio::spawn(async move { session.run().await });

        peer.write_all(&PacketHeader::new(PacketType::MouseInput, 13).encode())
            .await
            .unwrap();

        let result = tokio::time::timeout(std::time::Duration::from_secs(5), run)
            .await
            .unwrap()
            .unwrap();
        assert!(matches!(result, Err(VantageError::ProtocolViolation(_))));
        assert!(frames.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn undersized_frame_rejected_before_payload() {
        let (mut session, mut peer) = viewer_with_peer(Box::new(CollectingSink::default())).await;
        let run = tokio::spawn(async move { session.run().await });

        // data_size smaller than the metadata record; no payload follows
        // and none must be requested.
        peer.write_all(&PacketHeader::new(PacketType::ScreenFrame, 4).encode())
            .await
            .unwrap();

        let result = tokio::time::timeout(std::time::Duration::from_secs(5), run)
            .await
            .unwrap()
            .unwrap();
        assert!(matches!(
            result,
            Err(VantageError::InvalidPacketLength { .. })
        ));
    }

    #[tokio::test]
    async fn oversized_frame_rejected() {
        let (mut session, mut peer) = viewer_with_peer(Box::new(CollectingSink::default())).await;
        let run = tokio::spawn(async move { session.run().await });

        let header = PacketHeader::new(PacketType::ScreenFrame, MAX_PACKET_SIZE as u32 + 1);
        peer.write_all(&header.encode()).await.unwrap();

        let result = tokio::time::timeout(std::time::Duration::from_secs(5), run)
            .await
            .unwrap()
            .unwrap();
        assert!(matches!(result, Err(VantageError::PayloadTooLarge { .. })));
    }

    #[tokio::test]
    async fn dimension_mismatch_is_fatal_and_undelivered() {
        let sink = CollectingSink::default();
        let frames = sink.frames.clone();
        let (mut session, mut peer) = viewer_with_peer(Box::new(sink)).await;
        let run = tokio::spawn(async move { session.run().await });

        // Metadata claims 10x10 but the JPEG decodes to 16x16.
        let pixels = vec![0x40u8; 16 * 16 * 4];
        let jpeg = codec::encode_frame(&pixels, 16, 16, 75).unwrap();
        let mut buf = Vec::new();
        buf.extend_from_slice(
            &PacketHeader::new(
                PacketType::ScreenFrame,
                (FRAME_METADATA_SIZE + jpeg.len()) as u32,
            )
            .encode(),
        );
        buf.extend_from_slice(&FrameMetadata::new(10, 10, 75).encode());
        buf.extend_from_slice(&jpeg);
        peer.write_all(&buf).await.unwrap();

        let result = tokio::time::timeout(std::time::Duration::from_secs(5), run)
            .await
            .unwrap()
            .unwrap();
        assert!(matches!(result, Err(VantageError::DimensionMismatch { .. })));
        assert!(frames.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn undecodable_image_is_fatal() {
        let (mut session, mut peer) = viewer_with_peer(Box::new(CollectingSink::default())).await;
        let run = tokio::spawn(async move { session.run().await });

        let garbage = vec![0xEEu8; 64];
        let mut buf = Vec::new();
        buf.extend_from_slice(
            &PacketHeader::new(
                PacketType::ScreenFrame,
                (FRAME_METADATA_SIZE + garbage.len()) as u32,
            )
            .encode(),
        );
        buf.extend_from_slice(&FrameMetadata::new(8, 8, 75).encode());
        buf.extend_from_slice(&garbage);
        peer.write_all(&buf).await.unwrap();

        let result = tokio::time::timeout(std::time::Duration::from_secs(5), run)
            .await
            .unwrap()
            .unwrap();
        assert!(matches!(result, Err(VantageError::Encoding(_))));
    }

    #[tokio::test]
    async fn input_sender_writes_contiguous_packets() {
        let (session, mut peer) = viewer_with_peer(Box::new(CollectingSink::default())).await;
        let sender = session.input_sender();

        let mouse = MouseEvent::move_to(300, 400);
        let key = KeyboardEvent::up(0x1B, 0x01);
        sender.send_mouse(&mouse).await.unwrap();
        sender.send_keyboard(&key).await.unwrap();

        let mut buf = vec![0u8; HEADER_SIZE + MOUSE_EVENT_SIZE];
        peer.read_exact(&mut buf).await.unwrap();
        let header = PacketHeader::decode(&buf[..HEADER_SIZE]).unwrap();
        assert_eq!(header.packet_type, PacketType::MouseInput);
        assert_eq!(header.data_size as usize, MOUSE_EVENT_SIZE);
        assert_eq!(MouseEvent::decode(&buf[HEADER_SIZE..]).unwrap(), mouse);

        let mut buf = vec![0u8; HEADER_SIZE + KEYBOARD_EVENT_SIZE];
        peer.read_exact(&mut buf).await.unwrap();
        let header = PacketHeader::decode(&buf[..HEADER_SIZE]).unwrap();
        assert_eq!(header.packet_type, PacketType::KeyboardInput);
        assert_eq!(KeyboardEvent::decode(&buf[HEADER_SIZE..]).unwrap(), key);
    }
}
