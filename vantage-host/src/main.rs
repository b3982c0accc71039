//! Vantage host — entry point.
//!
//! ```text
//! vantage-host                    Listen with defaults (port 5900)
//! vantage-host --port 6000       Override the listening port
//! vantage-host --config <path>   Use custom config TOML
//! vantage-host --gen-config      Dump default config and exit
//! ```

mod config;

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use vantage_core::{ScreenSource, SessionManager, TestPatternSource, TracingInjector};

use crate::config::{ConfigSource, HostConfig};

// ── CLI ──────────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(name = "vantage-host", about = "Vantage remote desktop host")]
struct Cli {
    /// Path to configuration TOML file.
    #[arg(short, long, default_value = "vantage-host.toml")]
    config: PathBuf,

    /// Listening port (overrides config).
    #[arg(short, long)]
    port: Option<u16>,

    /// Target frame rate (overrides config).
    #[arg(long)]
    fps: Option<u32>,

    /// JPEG quality 1-100 (overrides config).
    #[arg(long)]
    quality: Option<u32>,

    /// Print the default configuration to stdout and exit.
    #[arg(long)]
    gen_config: bool,
}

// ── Main ─────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    if cli.gen_config {
        let text = toml::to_string_pretty(&HostConfig::default())?;
        println!("{text}");
        return Ok(());
    }

    let (mut config, config_source) = HostConfig::load(&cli.config);
    if let Some(port) = cli.port {
        config.network.port = port;
    }
    if let Some(fps) = cli.fps {
        config.stream.target_fps = fps;
    }
    if let Some(quality) = cli.quality {
        config.stream.quality = quality;
    }

    // Init tracing.
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.logging.level));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    info!("vantage-host v{}", env!("CARGO_PKG_VERSION"));

    // Loading ran before the subscriber; report its outcome now.
    match &config_source {
        ConfigSource::File => info!("config loaded from {}", cli.config.display()),
        ConfigSource::Missing => {
            info!("no config at {}; using defaults", cli.config.display());
        }
        ConfigSource::Invalid(e) => {
            warn!("invalid config {}: {e}; using defaults", cli.config.display());
        }
    }

    // Platform capturers and injectors plug in as `ScreenSource` /
    // `InputSink` implementations; the built-ins stream a synthetic
    // pattern and trace received input.
    let (width, height) = (config.stream.pattern_width, config.stream.pattern_height);
    let sources = Box::new(move || {
        Ok(Box::new(TestPatternSource::new(width, height)) as Box<dyn ScreenSource>)
    });

    let bind_addr = (config.network.bind_address.as_str(), config.network.port);
    let mut manager = match SessionManager::bind(
        bind_addr,
        config.to_stream_config(),
        sources,
        Arc::new(TracingInjector),
    )
    .await
    {
        Ok(manager) => manager,
        Err(e) => {
            error!(
                "failed to bind {}:{}: {e}",
                config.network.bind_address, config.network.port
            );
            return Err(e.into());
        }
    };

    manager.run().await?;
    Ok(())
}
