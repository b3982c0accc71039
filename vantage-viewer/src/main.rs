//! Vantage viewer — entry point.
//!
//! ```text
//! vantage-viewer                         Connect to 127.0.0.1:5900
//! vantage-viewer --host 192.168.1.10     Connect to another machine
//! vantage-viewer --port 6000             Override the port
//! ```
//!
//! This binary runs headless: instead of rendering, it feeds the
//! stream into a [`StatsSink`] and reports throughput. A GUI front-end
//! would supply its own `FrameSink` and drive the `InputSender` from
//! window events.

mod stats;

use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use vantage_core::{DEFAULT_PORT, ViewerSession};

use crate::stats::StatsSink;

// ── CLI ──────────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(name = "vantage-viewer", about = "Vantage remote desktop viewer")]
struct Cli {
    /// Host to connect to.
    #[arg(long, default_value = "127.0.0.1")]
    host: String,

    /// Host's listening port.
    #[arg(short, long, default_value_t = DEFAULT_PORT)]
    port: u16,
}

// ── Main ─────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    info!("vantage-viewer v{}", env!("CARGO_PKG_VERSION"));

    let addr = (cli.host.as_str(), cli.port);
    let mut session = match ViewerSession::connect(addr, Box::new(StatsSink::new())).await {
        Ok(session) => session,
        Err(e) => {
            error!("failed to connect to {}:{}: {e}", cli.host, cli.port);
            return Err(e.into());
        }
    };
    info!("connected to {}:{}", cli.host, cli.port);

    // Ctrl-C closes the transport, which unblocks the receive loop.
    let close = session.close_handle();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("shutting down");
            close.close();
        }
    });

    session.run().await?;
    Ok(())
}
