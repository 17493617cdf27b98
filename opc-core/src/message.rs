//! OPC messages and command definitions.
//!
//! A [`Message`] is one header plus its data. The client only ever
//! builds `SetPixelColors` messages; the codec decodes any command so a
//! receiving end can skip what it does not understand.

use std::fmt;

use bytes::{BufMut, Bytes, BytesMut};

use crate::error::OpcError;
use crate::header::{HEADER_LENGTH, MAX_DATA_LENGTH, OpcHeader};
use crate::pixel::{Channel, Pixel};

/// Bytes per pixel on the wire.
pub const BYTES_PER_PIXEL: usize = 3;

/// Most pixels one message can carry (`3 * n` must fit in 16 bits).
pub const MAX_PIXELS_PER_FRAME: usize = MAX_DATA_LENGTH / BYTES_PER_PIXEL;

// ── Command ──────────────────────────────────────────────────────

#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Command {
    /// Data is a run of `r, g, b` triples, applied from the first LED.
    SetPixelColors = 0x00,
    /// Vendor-specific payload.
    SystemExclusive = 0xFF,
}

impl TryFrom<u8> for Command {
    type Error = OpcError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0x00 => Ok(Command::SetPixelColors),
            0xFF => Ok(Command::SystemExclusive),
            other => Err(OpcError::UnknownCommand(other)),
        }
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Command::SetPixelColors => write!(f, "SetPixelColors"),
            Command::SystemExclusive => write!(f, "SystemExclusive"),
        }
    }
}

// ── Message ──────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    channel: Channel,
    command: u8,
    data: Bytes,
}

impl Message {
    /// Build a `SetPixelColors` message, clamping every pixel.
    ///
    /// Fails with [`OpcError::FrameTooLarge`] when the pixel data would
    /// not fit the 16-bit length field.
    pub fn set_pixels<P>(channel: Channel, pixels: &[P]) -> Result<Self, OpcError>
    where
        P: Copy + Into<Pixel>,
    {
        check_pixel_count(pixels.len())?;
        let mut data = BytesMut::with_capacity(pixels.len() * BYTES_PER_PIXEL);
        for &px in pixels {
            data.put_slice(&px.into().to_bytes());
        }
        Ok(Self {
            channel,
            command: Command::SetPixelColors as u8,
            data: data.freeze(),
        })
    }

    /// Build a message from raw parts.
    pub fn from_parts(channel: Channel, command: u8, data: Bytes) -> Result<Self, OpcError> {
        if data.len() > MAX_DATA_LENGTH {
            return Err(OpcError::InvalidHeader("data length exceeds 16 bits"));
        }
        Ok(Self {
            channel,
            command,
            data,
        })
    }

    pub fn channel(&self) -> Channel {
        self.channel
    }

    pub fn command_byte(&self) -> u8 {
        self.command
    }

    pub fn command(&self) -> Result<Command, OpcError> {
        Command::try_from(self.command)
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn header(&self) -> OpcHeader {
        // Length was checked at construction.
        let [hi, lo] = (self.data.len() as u16).to_be_bytes();
        OpcHeader::from_bytes([self.channel.id(), self.command, hi, lo])
    }

    /// Number of complete pixels carried by a `SetPixelColors` message.
    pub fn pixel_count(&self) -> usize {
        self.data.len() / BYTES_PER_PIXEL
    }

    /// Decode the data as pixels. A trailing partial triple is ignored.
    pub fn pixels(&self) -> Vec<Pixel> {
        self.data
            .chunks_exact(BYTES_PER_PIXEL)
            .map(|c| Pixel::new(c[0], c[1], c[2]))
            .collect()
    }

    /// Bytes this message occupies on the wire.
    pub fn encoded_len(&self) -> usize {
        HEADER_LENGTH + self.data.len()
    }

    /// Append the wire representation to `dst`.
    pub fn write_to(&self, dst: &mut BytesMut) {
        dst.reserve(self.encoded_len());
        dst.put_slice(&self.header().to_bytes());
        dst.put_slice(&self.data);
    }

    pub fn to_bytes(&self) -> Bytes {
        let mut buf = BytesMut::with_capacity(self.encoded_len());
        self.write_to(&mut buf);
        buf.freeze()
    }
}

/// Encode a `SetPixelColors` frame: 4-byte header then `r, g, b` per pixel.
pub fn encode_frame<P>(channel: Channel, pixels: &[P]) -> Result<Bytes, OpcError>
where
    P: Copy + Into<Pixel>,
{
    Message::set_pixels(channel, pixels).map(|m| m.to_bytes())
}

fn check_pixel_count(count: usize) -> Result<(), OpcError> {
    if count > MAX_PIXELS_PER_FRAME {
        return Err(OpcError::FrameTooLarge {
            pixels: count,
            max: MAX_PIXELS_PER_FRAME,
        });
    }
    Ok(())
}

// ── Tests ────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reference_frame_bytes() {
        let pixels = [(255u8, 0u8, 0u8), (0, 255, 0), (0, 0, 255)];
        let bytes = encode_frame(Channel::BROADCAST, &pixels).unwrap();
        assert_eq!(
            bytes.as_ref(),
            &[0, 0, 0, 9, 255, 0, 0, 0, 255, 0, 0, 0, 255]
        );
    }

    #[test]
    fn clamps_real_pixels() {
        let bytes = encode_frame(Channel::new(2), &[(-5.0, 260.0, 127.9)]).unwrap();
        assert_eq!(bytes.as_ref(), &[2, 0, 0, 3, 0, 255, 127]);
    }

    #[test]
    fn length_bytes_for_various_counts() {
        for k in [0usize, 1, 85, 86, 1000, MAX_PIXELS_PER_FRAME] {
            let pixels = vec![Pixel::BLACK; k];
            let bytes = encode_frame(Channel::BROADCAST, &pixels).unwrap();
            let len = 3 * k;
            assert_eq!(bytes[2], (len >> 8) as u8, "k = {k}");
            assert_eq!(bytes[3], (len & 0xFF) as u8, "k = {k}");
            assert_eq!(bytes.len(), 4 + len);
        }
    }

    #[test]
    fn rejects_oversized_frame() {
        let pixels = vec![Pixel::BLACK; MAX_PIXELS_PER_FRAME + 1];
        let err = encode_frame(Channel::BROADCAST, &pixels).unwrap_err();
        assert!(matches!(
            err,
            OpcError::FrameTooLarge {
                pixels: 21846,
                max: 21845
            }
        ));
        assert!(err.is_config());
    }

    #[test]
    fn empty_frame_is_header_only() {
        let bytes = encode_frame::<Pixel>(Channel::new(9), &[]).unwrap();
        assert_eq!(bytes.as_ref(), &[9, 0, 0, 0]);
    }

    #[test]
    fn pixels_ignore_partial_triple() {
        let msg =
            Message::from_parts(Channel::BROADCAST, 0, Bytes::from_static(&[1, 2, 3, 4, 5]))
                .unwrap();
        assert_eq!(msg.pixels(), vec![Pixel::new(1, 2, 3)]);
        assert_eq!(msg.pixel_count(), 1);
    }

    #[test]
    fn command_lookup() {
        assert_eq!(Command::try_from(0).unwrap(), Command::SetPixelColors);
        assert_eq!(Command::try_from(255).unwrap(), Command::SystemExclusive);
        assert!(matches!(
            Command::try_from(7),
            Err(OpcError::UnknownCommand(7))
        ));
    }
}
