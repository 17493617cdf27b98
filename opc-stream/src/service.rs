//! Streamer service core logic.
//!
//! Loads the layout, probes the server, and runs the render-and-send
//! loop until stopped.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use tracing::{info, warn};

use opc_core::{Layout, PixelClient, Ramp, StreamSummary, Streamer};

use crate::config::{StreamConfig, StreamSettings};

// ── StreamService ────────────────────────────────────────────────

/// The top-level streaming service.
pub struct StreamService {
    config: StreamConfig,
    running: Arc<AtomicBool>,
}

impl StreamService {
    pub fn new(config: StreamConfig) -> Self {
        Self {
            config,
            running: Arc::new(AtomicBool::new(true)),
        }
    }

    /// Obtain a handle that can be used to stop the service from
    /// another task (e.g. the Ctrl-C handler).
    pub fn stop_handle(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.running)
    }

    pub fn stop(&self) {
        self.running.store(false, Ordering::SeqCst);
    }

    /// Run until stopped.
    ///
    /// 1. Validates the configuration and loads the layout.
    /// 2. Probes the server; an unreachable server is only a warning,
    ///    since it may come up later.
    /// 3. Streams frames, dropping them while the server is away.
    pub async fn run(&self) -> Result<StreamSummary, Box<dyn std::error::Error>> {
        let settings = self.config.to_stream_settings()?;
        let layout = load_layout(&settings)?;
        info!("using {} pixels", layout.len());

        let mut client = PixelClient::new(&settings.server, settings.mode)?;
        if client.can_connect().await {
            info!("connected to {}", settings.server);
        } else {
            warn!(
                "could not connect to {}; will keep trying",
                settings.server
            );
        }

        let mut streamer = Streamer::new(client, layout, Ramp, settings.channel, settings.fps)?
            .with_stop_handle(self.stop_handle());

        info!("sending pixels forever (ctrl-c to exit)");
        let summary = streamer.run().await?;

        streamer.client_mut().disconnect();
        Ok(summary)
    }
}

/// The configured layout file, or a straight strand when none is set.
pub fn load_layout(settings: &StreamSettings) -> Result<Layout, opc_core::OpcError> {
    match &settings.layout_path {
        Some(path) => {
            info!("parsing layout file {}", path.display());
            Layout::load(path)
        }
        None => Ok(Layout::line(settings.pixels)),
    }
}
