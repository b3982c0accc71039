//! Integration tests — full host↔viewer streaming lifecycle over real
//! TCP connections on localhost.

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use vantage_core::{
    FrameSink, InputSink, KeyboardEvent, MouseEvent, ScreenSource, SessionManager, StreamConfig,
    TestPatternSource, VantageError, ViewerSession,
};

// ── Helpers ──────────────────────────────────────────────────────

#[derive(Default)]
struct RecordingInjector {
    mouse: Mutex<Vec<MouseEvent>>,
    keyboard: Mutex<Vec<KeyboardEvent>>,
}

impl InputSink for RecordingInjector {
    fn inject_mouse(&self, event: &MouseEvent) -> Result<(), VantageError> {
        self.mouse.lock().unwrap().push(*event);
        Ok(())
    }

    fn inject_keyboard(&self, event: &KeyboardEvent) -> Result<(), VantageError> {
        self.keyboard.lock().unwrap().push(*event);
        Ok(())
    }
}

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

/// Bind a manager on an OS-assigned port, spawn its accept loop and
/// return the address viewers should dial.
async fn start_manager(injector: Arc<RecordingInjector>) -> SocketAddr {
    let mut manager = SessionManager::bind(
        "127.0.0.1:0",
        StreamConfig {
            target_fps: 60,
            quality: 60,
        },
        Box::new(|| Ok(Box::new(TestPatternSource::new(32, 24)) as Box<dyn ScreenSource>)),
        injector,
    )
    .await
    .unwrap();

    let addr = manager.local_addr().unwrap();
    tokio::spawn(async move {
        let _ = manager.run().await;
    });
    addr
}

/// Poll until the sink holds at least `n` frames or the deadline hits.
async fn wait_for_frames(frames: &Arc<Mutex<Vec<(u32, u32)>>>, n: usize) {
    let deadline = tokio::time::Instant::now() + Duration::from_secs(5);
    while frames.lock().unwrap().len() < n {
        assert!(
            tokio::time::Instant::now() < deadline,
            "timed out waiting for {n} frames"
        );
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
}

// ── Full streaming lifecycle ─────────────────────────────────────

#[tokio::test]
async fn frames_stream_and_input_flows_back() {
    let injector = Arc::new(RecordingInjector::default());
    let addr = start_manager(injector.clone()).await;

    let sink = CollectingSink::default();
    let frames = sink.frames.clone();
    let mut session = ViewerSession::connect(addr, Box::new(sink)).await.unwrap();
    let sender = session.input_sender();
    let close = session.close_handle();
    let run = tokio::spawn(async move { session.run().await });

    wait_for_frames(&frames, 3).await;

    // Input events travel the opposite direction on the same stream.
    let mouse = MouseEvent::move_to(10, 20);
    let key = KeyboardEvent::down(0x20, 0x39);
    sender.send_mouse(&mouse).await.unwrap();
    sender.send_keyboard(&key).await.unwrap();

    // Give the host's input drain time to pick both up.
    let deadline = tokio::time::Instant::now() + Duration::from_secs(5);
    while injector.keyboard.lock().unwrap().is_empty() {
        assert!(
            tokio::time::Instant::now() < deadline,
            "host never received the input events"
        );
        tokio::time::sleep(Duration::from_millis(10)).await;
    }

    close.close();
    let result = tokio::time::timeout(Duration::from_secs(5), run)
        .await
        .unwrap()
        .unwrap();
    assert!(result.is_ok(), "local close is a clean end: {result:?}");

    // Every frame carries the source's dimensions, in order, no gaps.
    let received = frames.lock().unwrap();
    assert!(received.len() >= 3);
    assert!(received.iter().all(|&dims| dims == (32, 24)));

    assert_eq!(injector.mouse.lock().unwrap().as_slice(), &[mouse]);
    assert_eq!(injector.keyboard.lock().unwrap().as_slice(), &[key]);
}

// ── Sequential sessions ──────────────────────────────────────────

#[tokio::test]
async fn manager_accepts_next_viewer_after_session_ends() {
    let injector = Arc::new(RecordingInjector::default());
    let addr = start_manager(injector).await;

    // First viewer: stream a few frames, then disconnect.
    let sink = CollectingSink::default();
    let frames = sink.frames.clone();
    let mut session = ViewerSession::connect(addr, Box::new(sink)).await.unwrap();
    let close = session.close_handle();
    let run = tokio::spawn(async move { session.run().await });
    wait_for_frames(&frames, 2).await;
    close.close();
    run.await.unwrap().unwrap();

    // The host notices the disconnect and returns to accepting.
    tokio::time::sleep(Duration::from_millis(100)).await;

    // Second viewer gets its own session.
    let sink = CollectingSink::default();
    let frames = sink.frames.clone();
    let mut session = ViewerSession::connect(addr, Box::new(sink)).await.unwrap();
    let close = session.close_handle();
    let run = tokio::spawn(async move { session.run().await });
    wait_for_frames(&frames, 1).await;
    close.close();
    run.await.unwrap().unwrap();
}

// ── Startup failures ─────────────────────────────────────────────

#[tokio::test]
async fn connect_to_dead_host_fails() {
    // Grab a port that is certainly not listening.
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    tokio::time::sleep(Duration::from_millis(20)).await;

    let result = ViewerSession::connect(addr, Box::new(CollectingSink::default())).await;
    assert!(matches!(result, Err(VantageError::Connection(_))));
}
