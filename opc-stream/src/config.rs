//! Configuration for the pixel streamer.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use opc_core::{Channel, ConnectionMode, OpcError};

/// Top-level configuration loaded from a TOML file.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StreamConfig {
    /// Server connection settings.
    pub network: NetworkConfig,
    /// Frame settings.
    pub stream: FrameConfig,
    /// Layout source.
    pub layout: LayoutConfig,
    /// Logging settings.
    pub logging: LoggingConfig,
}

/// Network configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NetworkConfig {
    /// OPC server as `host:port`.
    pub server: String,
    /// Keep one connection open (`true`) or connect per frame (`false`).
    pub persistent: bool,
}

/// Frame configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FrameConfig {
    /// Target frames per second.
    pub fps: f64,
    /// OPC channel, 0 for all strands.
    pub channel: i64,
    /// LED count when no layout file is given.
    pub pixels: usize,
}

/// Layout configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    /// JSON layout file. If empty, a straight strand of `stream.pixels`.
    pub path: String,
}

/// Logging settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level: "trace", "debug", "info", "warn", "error".
    pub level: String,
}

/// Validated settings derived from a [`StreamConfig`].
#[derive(Debug, Clone, PartialEq)]
pub struct StreamSettings {
    pub server: String,
    pub mode: ConnectionMode,
    pub channel: Channel,
    pub fps: f64,
    pub layout_path: Option<PathBuf>,
    pub pixels: usize,
}

// ── Defaults ─────────────────────────────────────────────────────

impl Default for StreamConfig {
    fn default() -> Self {
        Self {
            network: NetworkConfig::default(),
            stream: FrameConfig::default(),
            layout: LayoutConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            server: "127.0.0.1:7890".into(),
            persistent: true,
        }
    }
}

impl Default for FrameConfig {
    fn default() -> Self {
        Self {
            fps: 20.0,
            channel: 0,
            pixels: 100,
        }
    }
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            path: String::new(),
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

impl StreamConfig {
    /// Load configuration from a TOML file, falling back to defaults.
    pub fn load(path: &Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(contents) => toml::from_str(&contents).unwrap_or_else(|e| {
                tracing::warn!("invalid config {}: {e}; using defaults", path.display());
                Self::default()
            }),
            Err(_) => {
                tracing::info!("no config at {}; using defaults", path.display());
                Self::default()
            }
        }
    }

    /// Write the default configuration to a file.
    pub fn write_default(path: &Path) -> std::io::Result<()> {
        let cfg = Self::default();
        let text = toml::to_string_pretty(&cfg).map_err(std::io::Error::other)?;
        std::fs::write(path, text)
    }

    /// Validate and convert into the types the streamer takes.
    pub fn to_stream_settings(&self) -> Result<StreamSettings, OpcError> {
        let fps = self.stream.fps;
        if !fps.is_finite() || fps <= 0.0 {
            return Err(OpcError::InvalidFrameRate(fps));
        }
        // Parse now so a bad endpoint fails at startup.
        self.network.server.parse::<opc_core::Endpoint>()?;

        let layout_path = match self.layout.path.trim() {
            "" => None,
            p => Some(PathBuf::from(p)),
        };

        Ok(StreamSettings {
            server: self.network.server.clone(),
            mode: ConnectionMode::from_persistent(self.network.persistent),
            channel: Channel::try_from(self.stream.channel)?,
            fps,
            layout_path,
            pixels: self.stream.pixels,
        })
    }
}

// ── Tests ────────────────────────────────────────────────────────
