//! The pixel stream client.
//!
//! Holds at most one TCP connection to an OPC server and writes framed
//! pixel messages to it. Transport failures never surface as errors:
//! the connection is dropped, the call reports `false`, and the next
//! call makes a fresh attempt. Only malformed input (an oversized
//! frame) returns `Err`.

use std::time::Duration;

use futures::SinkExt;
use tokio::net::TcpStream;
use tokio_util::codec::Framed;
use tracing::{debug, info};

use crate::codec::OpcCodec;
use crate::error::OpcError;
use crate::message::Message;
use crate::network::Endpoint;
use crate::pixel::{Channel, Pixel};
use crate::state::ConnectionPhase;
use crate::throughput::ThroughputMeter;

/// How long the client keeps its connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConnectionMode {
    /// Keep one long-lived connection and reuse it for every frame.
    /// A lost connection is re-established on the next call.
    #[default]
    Persistent,
    /// Connect, send and close on every call, leaving the server free
    /// for other clients in between.
    PerCall,
}

impl ConnectionMode {
    pub fn from_persistent(persistent: bool) -> Self {
        if persistent {
            Self::Persistent
        } else {
            Self::PerCall
        }
    }
}

/// Counters kept by a [`PixelClient`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ClientStats {
    /// TCP connections attempted.
    pub connect_attempts: u64,
    /// TCP connections established.
    pub connects: u64,
    /// Frames fully written to the socket.
    pub frames_sent: u64,
    /// Writes that failed and dropped the connection.
    pub send_failures: u64,
}

// ── PixelClient ──────────────────────────────────────────────────

/// A client streaming pixel frames to one OPC server.
///
/// All operations take `&mut self` and run on the caller's task; the
/// client spawns nothing. Each `can_connect` or `put_pixels` call makes
/// at most one connection attempt and applies no timeout of its own.
///
/// ```no_run
/// # use opc_core::{ConnectionMode, PixelClient, Channel};
/// # async fn example() -> Result<(), opc_core::OpcError> {
/// let mut client = PixelClient::new("127.0.0.1:7890", ConnectionMode::Persistent)?;
/// if !client.can_connect().await {
///     eprintln!("server not up yet, frames will be dropped until it is");
/// }
/// let pixels = [(255u8, 0u8, 0u8), (0, 255, 0), (0, 0, 255)];
/// client.put_pixels(&pixels, Channel::BROADCAST).await?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct PixelClient {
    endpoint: Endpoint,
    mode: ConnectionMode,
    /// `Some` exactly when `phase` is `Connected`.
    framed: Option<Framed<TcpStream, OpcCodec>>,
    phase: ConnectionPhase,
    meter: ThroughputMeter,
    stats: ClientStats,
}

impl PixelClient {
    /// Create a client for a `host:port` endpoint. No I/O happens here.
    pub fn new(endpoint: &str, mode: ConnectionMode) -> Result<Self, OpcError> {
        Ok(Self::with_endpoint(endpoint.parse()?, mode))
    }

    pub fn with_endpoint(endpoint: Endpoint, mode: ConnectionMode) -> Self {
        Self {
            endpoint,
            mode,
            framed: None,
            phase: ConnectionPhase::Disconnected,
            meter: ThroughputMeter::new(),
            stats: ClientStats::default(),
        }
    }

    /// Change how often throughput lines are logged.
    pub fn with_throughput_window(mut self, window: Duration) -> Self {
        self.meter = ThroughputMeter::with_window(window);
        self
    }

    pub fn endpoint(&self) -> &Endpoint {
        &self.endpoint
    }

    pub fn mode(&self) -> ConnectionMode {
        self.mode
    }

    pub fn phase(&self) -> ConnectionPhase {
        self.phase
    }

    pub fn is_connected(&self) -> bool {
        self.phase.is_connected()
    }

    pub fn stats(&self) -> ClientStats {
        self.stats
    }

    /// Try to reach the server.
    ///
    /// In persistent mode a successful connection is kept for the next
    /// send. In per-call mode it is closed straight away. Refused
    /// connections, unresolvable hosts and other I/O failures all
    /// return `false`.
    pub async fn can_connect(&mut self) -> bool {
        let connected = self.ensure_connected().await;
        if self.mode == ConnectionMode::PerCall {
            self.disconnect();
        }
        connected
    }

    /// Drop the connection, if there is one. Safe to call repeatedly.
    pub fn disconnect(&mut self) {
        if self.framed.take().is_some() {
            debug!("disconnected from {}", self.endpoint);
        }
        self.phase.disconnected();
    }

    /// Send one frame of pixels to `channel`.
    ///
    /// Pixels are clamped to `[0, 255]` and truncated. Returns
    /// `Ok(true)` once the whole frame was handed to the socket and
    /// `Ok(false)` when the server could not be reached or the write
    /// failed; in that case the frame is dropped. The only error is
    /// [`OpcError::FrameTooLarge`], raised before any I/O.
    pub async fn put_pixels<P>(
        &mut self,
        pixels: &[P],
        channel: impl Into<Channel>,
    ) -> Result<bool, OpcError>
    where
        P: Copy + Into<Pixel>,
    {
        let message = Message::set_pixels(channel.into(), pixels)?;

        if let Some(report) = self.meter.record() {
            info!("{report}");
        }

        Ok(self.send(&message).await)
    }

    /// Send a prebuilt message, with the same connection handling as
    /// [`put_pixels`](Self::put_pixels).
    pub async fn send(&mut self, message: &Message) -> bool {
        if !self.ensure_connected().await {
            debug!("not connected to {}; dropping frame", self.endpoint);
            return false;
        }
        let Some(framed) = self.framed.as_mut() else {
            return false;
        };

        // `send` flushes, so a short write surfaces here as an error.
        let result = framed.send(message).await;
        if let Err(e) = result {
            debug!("connection to {} lost: {e}", self.endpoint);
            self.stats.send_failures += 1;
            self.disconnect();
            return false;
        }
        self.stats.frames_sent += 1;

        if self.mode == ConnectionMode::PerCall {
            self.disconnect();
        }
        true
    }

    // ── Internal ─────────────────────────────────────────────────

    /// Connect unless already connected. At most one attempt.
    async fn ensure_connected(&mut self) -> bool {
        if self.framed.is_some() {
            return true;
        }

        self.stats.connect_attempts += 1;
        debug!("connecting to {}", self.endpoint);
        let stream =
            match TcpStream::connect((self.endpoint.host(), self.endpoint.port())).await {
                Ok(stream) => stream,
                Err(e) => {
                    debug!("connect to {} failed: {e}", self.endpoint);
                    return false;
                }
            };
        if let Err(e) = stream.set_nodelay(true) {
            debug!("set_nodelay failed: {e}");
        }

        self.framed = Some(Framed::new(stream, OpcCodec::new()));
        if let Err(e) = self.phase.connected() {
            debug!("{e}");
        }
        self.stats.connects += 1;
        debug!("connected to {}", self.endpoint);
        true
    }
}

// ── Tests ────────────────────────────────────────────────────────
