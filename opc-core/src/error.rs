//! Domain-specific error types for the OPC client.
//!
//! Two families live in [`OpcError`]:
//!
//! - **Config errors** (bad endpoint, channel out of range, oversized
//!   frame, malformed header). These are caller mistakes and are always
//!   returned as `Err` from the call that triggered them.
//! - **Connection errors** (`OpcError::Connection`). The pixel client
//!   never returns these from `can_connect` / `put_pixels`: transport
//!   failures are absorbed and reported as a `false` result so an
//!   animation loop keeps running while the server is away.

use thiserror::Error;

/// The canonical error type for the OPC client.
#[derive(Debug, Error)]
pub enum OpcError {
    // ── Config Errors ────────────────────────────────────────────
    /// The server endpoint is not of the form `host:port`.
    #[error("invalid endpoint {0:?}: expected host:port")]
    InvalidEndpoint(String),

    /// A channel number does not fit in one byte.
    #[error("invalid channel {0}: must be in 0..=255")]
    InvalidChannel(i64),

    /// The frame's pixel data does not fit the 16-bit length field.
    #[error("frame too large: {pixels} pixels (max {max})")]
    FrameTooLarge { pixels: usize, max: usize },

    /// A frame rate that is zero, negative or not finite.
    #[error("invalid frame rate: {0}")]
    InvalidFrameRate(f64),

    /// A field in the message header could not be parsed.
    #[error("invalid header: {0}")]
    InvalidHeader(&'static str),

    // ── Protocol Errors ──────────────────────────────────────────
    /// A command byte that does not map to a known command.
    #[error("unknown command: {0:#04x}")]
    UnknownCommand(u8),

    /// A state transition that the connection state machine forbids.
    #[error("protocol violation: {0}")]
    ProtocolViolation(&'static str),

    // ── Layout Errors ────────────────────────────────────────────
    /// The layout file parsed but its contents are unusable.
    #[error("invalid layout: {0}")]
    Layout(String),

    /// The layout file is not valid JSON.
    #[error("layout json: {0}")]
    Json(#[from] serde_json::Error),

    // ── Connection Errors ────────────────────────────────────────
    /// The TCP/IO layer reported an error.
    #[error("connection error: {0}")]
    Connection(#[from] std::io::Error),
}

impl OpcError {
    /// Returns `true` for errors caused by invalid caller input.
    pub fn is_config(&self) -> bool {
        matches!(
            self,
            Self::InvalidEndpoint(_)
                | Self::InvalidChannel(_)
                | Self::FrameTooLarge { .. }
                | Self::InvalidFrameRate(_)
                | Self::InvalidHeader(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display_messages() {
        let e = OpcError::InvalidEndpoint("localhost".into());
        assert!(e.to_string().contains("host:port"));

        let e = OpcError::FrameTooLarge {
            pixels: 30000,
            max: 21845,
        };
        assert!(e.to_string().contains("30000"));
        assert!(e.to_string().contains("21845"));
    }

    #[test]
    fn from_io() {
        let io_err = std::io::Error::new(std::io::ErrorKind::BrokenPipe, "pipe broke");
        let e: OpcError = io_err.into();
        assert!(matches!(e, OpcError::Connection(_)));
        assert!(!e.is_config());
    }

    #[test]
    fn config_classification() {
        assert!(OpcError::InvalidChannel(300).is_config());
        assert!(OpcError::InvalidFrameRate(0.0).is_config());
        assert!(!OpcError::Layout("empty".into()).is_config());
    }
}
