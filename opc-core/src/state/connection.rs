//! Connection state machine for the pixel client.
//!
//! ```text
//!  Disconnected ──(TCP connect ok)──► Connected
//!       ▲                                  │
//!       └── send failure | disconnect | ───┘
//!           per-call close
//! ```
//!
//! There are no intermediate states: every connection attempt starts
//! from `Disconnected` and either lands in `Connected` or stays put.

use std::time::{Duration, Instant};

use crate::error::OpcError;

/// The current phase of the client's server connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConnectionPhase {
    /// No socket. Initial state.
    #[default]
    Disconnected,

    /// A TCP session is open.
    Connected {
        /// When the connection was established.
        since: Instant,
    },
}

impl std::fmt::Display for ConnectionPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Disconnected => write!(f, "Disconnected"),
            Self::Connected { .. } => write!(f, "Connected"),
        }
    }
}

impl ConnectionPhase {
    pub fn is_connected(&self) -> bool {
        matches!(self, Self::Connected { .. })
    }

    pub fn is_disconnected(&self) -> bool {
        matches!(self, Self::Disconnected)
    }

    /// How long the connection has been up, or `None` when disconnected.
    pub fn connected_duration(&self) -> Option<Duration> {
        match self {
            Self::Connected { since } => Some(since.elapsed()),
            Self::Disconnected => None,
        }
    }

    // ── Transitions ──────────────────────────────────────────────

    /// Transition to `Connected`.
    ///
    /// Valid from: `Disconnected`.
    pub fn connected(&mut self) -> Result<(), OpcError> {
        match self {
            Self::Disconnected => {
                *self = Self::Connected {
                    since: Instant::now(),
                };
                Ok(())
            }
            Self::Connected { .. } => Err(OpcError::ProtocolViolation(
                "cannot connect: already Connected",
            )),
        }
    }

    /// Transition to `Disconnected` from any state.
    ///
    /// Returns `true` if a connection was actually dropped.
    pub fn disconnected(&mut self) -> bool {
        let was_connected = self.is_connected();
        *self = Self::Disconnected;
        was_connected
    }
}

// ── Tests ────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_phase_is_disconnected() {
        let phase = ConnectionPhase::default();
        assert!(phase.is_disconnected());
        assert!(phase.connected_duration().is_none());
    }

    #[test]
    fn connect_then_disconnect() {
        let mut phase = ConnectionPhase::Disconnected;
        phase.connected().unwrap();
        assert!(phase.is_connected());
        assert!(phase.connected_duration().is_some());

        assert!(phase.disconnected());
        assert!(phase.is_disconnected());
    }

    #[test]
    fn connect_twice_is_rejected() {
        let mut phase = ConnectionPhase::Disconnected;
        phase.connected().unwrap();
        assert!(phase.connected().is_err());
    }

    #[test]
    fn disconnect_is_idempotent() {
        let mut phase = ConnectionPhase::Disconnected;
        assert!(!phase.disconnected());
        assert!(!phase.disconnected());
        assert!(phase.is_disconnected());
    }

    #[test]
    fn display_format() {
        assert_eq!(ConnectionPhase::Disconnected.to_string(), "Disconnected");
        assert_eq!(
            ConnectionPhase::Connected {
                since: Instant::now()
            }
            .to_string(),
            "Connected"
        );
    }
}
