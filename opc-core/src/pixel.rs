//! Pixel and channel types.
//!
//! Color functions produce real-valued [`Rgb`] triples in any range.
//! Converting to a [`Pixel`] clamps each component to `[0, 255]` and
//! truncates toward zero, so anything a color function returns can be
//! put on the wire.

use crate::error::OpcError;

/// Real-valued color as produced by a color function.
pub type Rgb = [f64; 3];

// ── Pixel ────────────────────────────────────────────────────────

/// One LED color, 8 bits per component.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Pixel {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Pixel {
    pub const BLACK: Self = Self::new(0, 0, 0);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Build a pixel from real components, clamping and truncating each.
    pub fn from_f64(r: f64, g: f64, b: f64) -> Self {
        Self {
            r: clamp_component(r),
            g: clamp_component(g),
            b: clamp_component(b),
        }
    }

    /// Wire order: `r, g, b`.
    pub const fn to_bytes(self) -> [u8; 3] {
        [self.r, self.g, self.b]
    }
}

/// Clamp to `[0, 255]` and truncate toward zero. NaN maps to 0.
fn clamp_component(v: f64) -> u8 {
    if v.is_nan() {
        return 0;
    }
    v.clamp(0.0, 255.0) as u8
}

impl From<(u8, u8, u8)> for Pixel {
    fn from((r, g, b): (u8, u8, u8)) -> Self {
        Self::new(r, g, b)
    }
}

impl From<[u8; 3]> for Pixel {
    fn from([r, g, b]: [u8; 3]) -> Self {
        Self::new(r, g, b)
    }
}

impl From<(f64, f64, f64)> for Pixel {
    fn from((r, g, b): (f64, f64, f64)) -> Self {
        Self::from_f64(r, g, b)
    }
}

impl From<Rgb> for Pixel {
    fn from([r, g, b]: Rgb) -> Self {
        Self::from_f64(r, g, b)
    }
}

impl From<(i32, i32, i32)> for Pixel {
    fn from((r, g, b): (i32, i32, i32)) -> Self {
        Self::from_f64(r as f64, g as f64, b as f64)
    }
}

// ── Channel ──────────────────────────────────────────────────────

/// Target strand for a frame. Channel 0 addresses every strand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Channel(u8);

impl Channel {
    pub const BROADCAST: Self = Self(0);

    pub const fn new(id: u8) -> Self {
        Self(id)
    }

    pub const fn id(self) -> u8 {
        self.0
    }

    pub const fn is_broadcast(self) -> bool {
        self.0 == 0
    }
}

impl From<u8> for Channel {
    fn from(id: u8) -> Self {
        Self(id)
    }
}

impl TryFrom<i64> for Channel {
    type Error = OpcError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        u8::try_from(value)
            .map(Self)
            .map_err(|_| OpcError::InvalidChannel(value))
    }
}

impl TryFrom<i32> for Channel {
    type Error = OpcError;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        Self::try_from(value as i64)
    }
}

impl std::fmt::Display for Channel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_broadcast() {
            write!(f, "0 (broadcast)")
        } else {
            write!(f, "{}", self.0)
        }
    }
}

// ── Tests ────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clamps_and_truncates() {
        assert_eq!(Pixel::from((-5.0, 260.0, 127.9)), Pixel::new(0, 255, 127));
        assert_eq!(Pixel::from([0.99, 254.999, 255.0]), Pixel::new(0, 254, 255));
    }

    #[test]
    fn nan_and_infinities() {
        let px = Pixel::from_f64(f64::NAN, f64::INFINITY, f64::NEG_INFINITY);
        assert_eq!(px, Pixel::new(0, 255, 0));
    }

    #[test]
    fn integer_inputs_clamp() {
        assert_eq!(Pixel::from((-1i32, 300, 42)), Pixel::new(0, 255, 42));
    }

    #[test]
    fn channel_range() {
        assert_eq!(Channel::try_from(255i64).unwrap().id(), 255);
        assert!(Channel::try_from(0i32).unwrap().is_broadcast());
        assert!(matches!(
            Channel::try_from(256i64),
            Err(OpcError::InvalidChannel(256))
        ));
        assert!(matches!(
            Channel::try_from(-1i32),
            Err(OpcError::InvalidChannel(-1))
        ));
    }

    #[test]
    fn channel_display() {
        assert_eq!(Channel::BROADCAST.to_string(), "0 (broadcast)");
        assert_eq!(Channel::new(7).to_string(), "7");
    }
}
