//! # opc-core
//!
//! Client library for streaming LED frames over Open Pixel Control.
//!
//! This crate contains:
//! - **Pixel model**: `Pixel`, `Channel`, clamping from real-valued colors
//! - **Protocol types**: `OpcHeader`, `Message`, `Command`
//! - **Codec**: `OpcCodec` for framed TCP I/O via `tokio_util`
//! - **Network**: `PixelClient`, a reconnecting pixel stream client
//! - **State**: `ConnectionPhase`, the client's connection state machine
//! - **Throughput**: `ThroughputMeter`, the per-second frame-rate report
//! - **Layout / color**: `Layout` of 3D points and the `ColorFunction` seam
//! - **Stream**: `Streamer`, the fixed-rate render-and-send loop
//! - **Error**: `OpcError`, a `thiserror`-based error hierarchy

pub mod codec;
pub mod color;
pub mod error;
pub mod header;
pub mod layout;
pub mod message;
pub mod network;
pub mod pixel;
pub mod state;
pub mod stream;
pub mod throughput;

// ── Re-exports for ergonomic usage ───────────────────────────────

pub use codec::OpcCodec;
pub use color::{ColorFunction, Ramp};
pub use error::OpcError;
pub use header::{HEADER_LENGTH, MAX_DATA_LENGTH, OpcHeader};
pub use layout::{Bounds, Layout, Point3};
pub use message::{BYTES_PER_PIXEL, Command, MAX_PIXELS_PER_FRAME, Message, encode_frame};
pub use network::{ClientStats, ConnectionMode, Endpoint, PixelClient};
pub use pixel::{Channel, Pixel, Rgb};
pub use state::ConnectionPhase;
pub use stream::{StreamSummary, Streamer};
pub use throughput::{ThroughputMeter, ThroughputReport};
