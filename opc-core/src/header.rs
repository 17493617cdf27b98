use crate::error::OpcError;

/// Size of the message header on the wire.
pub const HEADER_LENGTH: usize = 4;

/// Largest payload the 16-bit length field can declare.
pub const MAX_DATA_LENGTH: usize = u16::MAX as usize;

pub type OpcHeaderBytes = [u8; HEADER_LENGTH];

/// The 4-byte OPC message header.
///
/// ```text
/// byte 0   channel
/// byte 1   command
/// byte 2   length (high byte)
/// byte 3   length (low byte)
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OpcHeader {
    channel: u8,
    command: u8,
    data_length: u16,
}

impl OpcHeader {
    pub fn new(channel: u8, command: u8, data_length: usize) -> Result<Self, OpcError> {
        let data_length = u16::try_from(data_length)
            .map_err(|_| OpcError::InvalidHeader("data length exceeds 16 bits"))?;
        Ok(Self {
            channel,
            command,
            data_length,
        })
    }

    pub fn to_bytes(&self) -> OpcHeaderBytes {
        let [hi, lo] = self.data_length.to_be_bytes();
        [self.channel, self.command, hi, lo]
    }

    pub fn from_bytes(bytes: OpcHeaderBytes) -> Self {
        Self {
            channel: bytes[0],
            command: bytes[1],
            data_length: u16::from_be_bytes([bytes[2], bytes[3]]),
        }
    }

    pub fn get_channel(&self) -> u8 {
        self.channel
    }

    pub fn get_command(&self) -> u8 {
        self.command
    }

    pub fn get_data_length(&self) -> usize {
        self.data_length as usize
    }

    /// Total bytes this message occupies on the wire.
    pub fn frame_length(&self) -> usize {
        HEADER_LENGTH + self.get_data_length()
    }
}
