//! Session manager — accepts viewer connections sequentially and runs
//! one host session per connection.
//!
//! At most one session is live at a time: the accept loop does not
//! return to `accept` until the current session has ended. A session
//! ending — cleanly or not — always returns the server to accepting
//! the next viewer.

use std::net::SocketAddr;
use std::sync::Arc;

use tokio::net::{TcpListener, ToSocketAddrs};
use tracing::{info, warn};

use crate::capture::ScreenSource;
use crate::error::VantageError;
use crate::host::{HostSession, StreamConfig};
use crate::inject::InputSink;
use crate::transport::TcpTransport;

/// Builds a fresh screen source for each accepted session.
pub type SourceFactory = Box<dyn FnMut() -> Result<Box<dyn ScreenSource>, VantageError> + Send>;

/// Accept loop owning the listening socket.
pub struct SessionManager {
    listener: TcpListener,
    config: StreamConfig,
    sources: SourceFactory,
    input: Arc<dyn InputSink>,
}

impl SessionManager {
    /// Bind the listening socket. A bind failure is a startup error the
    /// operator has to resolve; callers surface it and exit non-zero.
    pub async fn bind(
        addr: impl ToSocketAddrs,
        config: StreamConfig,
        sources: SourceFactory,
        input: Arc<dyn InputSink>,
    ) -> Result<Self, VantageError> {
        let listener = TcpListener::bind(addr).await?;
        Ok(Self {
            listener,
            config,
            sources,
            input,
        })
    }

    /// The bound address (useful with an OS-assigned port).
    pub fn local_addr(&self) -> Result<SocketAddr, VantageError> {
        Ok(self.listener.local_addr()?)
    }

    /// Accept and serve viewers forever, one session at a time.
    pub async fn run(&mut self) -> Result<(), VantageError> {
        info!(addr = %self.local_addr()?, "waiting for viewer connections");

        loop {
            let (stream, peer) = match self.listener.accept().await {
                Ok(accepted) => accepted,
                Err(e) => {
                    warn!(error = %e, "accept failed");
                    continue;
                }
            };
            info!(%peer, "viewer connected");

            let source = (self.sources)()?;
            let transport = Arc::new(TcpTransport::new(stream));
            let mut session = HostSession::new(
                transport,
                self.config.clone(),
                source,
                Arc::clone(&self.input),
            );

            match session.run().await {
                Ok(()) => info!(%peer, "session ended"),
                Err(VantageError::Closed) => info!(%peer, "viewer disconnected"),
                Err(e) => warn!(%peer, error = %e, "session ended with error"),
            }
        }
    }
}
