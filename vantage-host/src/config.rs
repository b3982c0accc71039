//! Configuration for the host process.

use std::path::Path;

use serde::{Deserialize, Serialize};
use vantage_core::{DEFAULT_FPS, DEFAULT_PORT, DEFAULT_QUALITY, StreamConfig};

/// Top-level configuration loaded from a TOML file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct HostConfig {
    /// Network settings.
    pub network: NetworkConfig,
    /// Streaming settings.
    pub stream: StreamSettings,
    /// Logging settings.
    pub logging: LoggingConfig,
}

/// Network configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NetworkConfig {
    /// TCP port to listen on for viewer connections.
    pub port: u16,
    /// Address to bind.
    pub bind_address: String,
}

/// Streaming configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StreamSettings {
    /// Target frames per second (1–240).
    pub target_fps: u32,
    /// JPEG quality (1–100).
    pub quality: u32,
    /// Width of the built-in test pattern source.
    pub pattern_width: u32,
    /// Height of the built-in test pattern source.
    pub pattern_height: u32,
}

/// Logging settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level: "trace", "debug", "info", "warn", "error".
    pub level: String,
}

// ── Defaults ─────────────────────────────────────────────────────

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            bind_address: "0.0.0.0".into(),
        }
    }
}

impl Default for StreamSettings {
    fn default() -> Self {
        Self {
            target_fps: DEFAULT_FPS,
            quality: DEFAULT_QUALITY,
            pattern_width: 1280,
            pattern_height: 720,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".into(),
        }
    }
}

// ── Loading ──────────────────────────────────────────────────────

/// Where the effective configuration came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    /// Parsed from the given file.
    File,
    /// No file at the path; defaults in effect.
    Missing,
    /// The file exists but did not parse; defaults in effect.
    Invalid(String),
}

impl HostConfig {
    /// Load configuration from a TOML file, falling back to defaults.
    ///
    /// Emits no diagnostics itself: loading happens before the tracing
    /// subscriber is up, so the caller reports the returned
    /// [`ConfigSource`] once logging is initialized.
    pub fn load(path: &Path) -> (Self, ConfigSource) {
        match std::fs::read_to_string(path) {
            Ok(contents) => match toml::from_str(&contents) {
                Ok(config) => (config, ConfigSource::File),
                Err(e) => (Self::default(), ConfigSource::Invalid(e.to_string())),
            },
            Err(_) => (Self::default(), ConfigSource::Missing),
        }
    }

    /// Convert streaming settings into a core `StreamConfig`.
    pub fn to_stream_config(&self) -> StreamConfig {
        StreamConfig {
            target_fps: self.stream.target_fps.clamp(1, 240),
            quality: self.stream.quality.clamp(1, 100),
        }
    }
}

// ── Tests ────────────────────────────────────────────────────────
