//! Frame-paced streaming loop.
//!
//! [`Streamer`] is the caller loop the pixel client is built for: every
//! tick it evaluates a color function over a layout, sends the frame,
//! and sleeps out the rest of the frame interval. A dropped frame (server
//! away, connection reset) is logged and the loop carries on; the client
//! reconnects on a later tick.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

use tracing::{debug, info};

use crate::color::{self, ColorFunction};
use crate::error::OpcError;
use crate::layout::Layout;
use crate::message::MAX_PIXELS_PER_FRAME;
use crate::network::PixelClient;
use crate::pixel::{Channel, Pixel};

/// Frame counts from a streaming run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StreamSummary {
    /// Frames handed to the transport.
    pub sent: u64,
    /// Frames dropped because the server was unreachable.
    pub dropped: u64,
}

// ── Streamer ─────────────────────────────────────────────────────

pub struct Streamer<C> {
    client: PixelClient,
    layout: Layout,
    color: C,
    channel: Channel,
    frame_interval: Duration,
    running: Arc<AtomicBool>,
    /// Reused between frames.
    pixels: Vec<Pixel>,
    summary: StreamSummary,
}

impl<C: ColorFunction> Streamer<C> {
    /// Create a streamer sending `layout.len()` pixels per frame at `fps`.
    ///
    /// Fails if `fps` is not a positive finite number or the layout has
    /// more LEDs than one frame can carry.
    pub fn new(
        client: PixelClient,
        layout: Layout,
        color: C,
        channel: Channel,
        fps: f64,
    ) -> Result<Self, OpcError> {
        if !fps.is_finite() || fps <= 0.0 {
            return Err(OpcError::InvalidFrameRate(fps));
        }
        if layout.len() > MAX_PIXELS_PER_FRAME {
            return Err(OpcError::FrameTooLarge {
                pixels: layout.len(),
                max: MAX_PIXELS_PER_FRAME,
            });
        }

        let pixels = Vec::with_capacity(layout.len());
        Ok(Self {
            client,
            layout,
            color,
            channel,
            frame_interval: Duration::from_secs_f64(1.0 / fps),
            running: Arc::new(AtomicBool::new(true)),
            pixels,
            summary: StreamSummary::default(),
        })
    }

    /// Share an existing stop flag instead of the streamer's own.
    pub fn with_stop_handle(mut self, running: Arc<AtomicBool>) -> Self {
        self.running = running;
        self
    }

    /// A cloneable handle; storing `false` stops [`run`](Self::run)
    /// after the current frame.
    pub fn stop_handle(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.running)
    }

    pub fn stop(&self) {
        self.running.store(false, Ordering::SeqCst);
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    pub fn frame_interval(&self) -> Duration {
        self.frame_interval
    }

    pub fn summary(&self) -> StreamSummary {
        self.summary
    }

    pub fn client(&self) -> &PixelClient {
        &self.client
    }

    pub fn client_mut(&mut self) -> &mut PixelClient {
        &mut self.client
    }

    pub fn into_client(self) -> PixelClient {
        self.client
    }

    /// Render and send one frame for time `t` (seconds).
    ///
    /// Returns whether the frame reached the transport.
    pub async fn step(&mut self, t: f64) -> Result<bool, OpcError> {
        color::render(&self.color, t, &self.layout, &mut self.pixels);
        let sent = self.client.put_pixels(&self.pixels, self.channel).await?;
        if sent {
            self.summary.sent += 1;
        } else {
            self.summary.dropped += 1;
            debug!("frame dropped");
        }
        Ok(sent)
    }

    /// Stream until the stop handle is cleared.
    pub async fn run(&mut self) -> Result<StreamSummary, OpcError> {
        self.run_inner(None).await
    }

    /// Stream exactly `frames` frames, or fewer if stopped first.
    pub async fn run_frames(&mut self, frames: u64) -> Result<StreamSummary, OpcError> {
        self.run_inner(Some(frames)).await
    }

    async fn run_inner(&mut self, limit: Option<u64>) -> Result<StreamSummary, OpcError> {
        info!(
            "streaming {} pixels to {} on channel {} every {:?}",
            self.layout.len(),
            self.client.endpoint(),
            self.channel,
            self.frame_interval,
        );

        let start = Instant::now();
        let mut frames: u64 = 0;

        while self.is_running() && limit.is_none_or(|n| frames < n) {
            let loop_start = Instant::now();
            self.step(start.elapsed().as_secs_f64()).await?;
            frames += 1;
            Self::pace(loop_start, self.frame_interval).await;
        }

        info!(
            "stream finished: {} sent, {} dropped",
            self.summary.sent, self.summary.dropped
        );
        Ok(self.summary)
    }

    /// Sleep for the remainder of the frame interval.
    async fn pace(loop_start: Instant, interval: Duration) {
        let elapsed = loop_start.elapsed();
        if elapsed < interval {
            tokio::time::sleep(interval - elapsed).await;
        }
    }
}

// ── Tests ────────────────────────────────────────────────────────
