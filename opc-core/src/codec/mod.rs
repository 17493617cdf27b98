use bytes::{Buf, BytesMut};

use crate::error::OpcError;
use crate::header::{HEADER_LENGTH, OpcHeader};
use crate::message::Message;
use crate::pixel::Channel;

/// Length-delimited OPC framing for `tokio_util::codec::Framed`.
///
/// There is no delimiter on the wire: a reader takes the 4-byte header
/// and then exactly the number of data bytes it declares.
#[derive(Debug, Default, Clone, Copy)]
pub struct OpcCodec {}

impl OpcCodec {
    pub fn new() -> Self {
        Self {}
    }
}

impl tokio_util::codec::Decoder for OpcCodec {
    type Item = Message;
    type Error = OpcError;

    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<Self::Item>, Self::Error> {
        if src.len() < HEADER_LENGTH {
            return Ok(None);
        }

        let mut header_bytes = [0u8; HEADER_LENGTH];
        header_bytes.copy_from_slice(&src[..HEADER_LENGTH]);
        let header = OpcHeader::from_bytes(header_bytes);

        let frame_length = header.frame_length();
        if src.len() < frame_length {
            src.reserve(frame_length - src.len());
            return Ok(None);
        }

        src.advance(HEADER_LENGTH);
        let data = src.split_to(header.get_data_length()).freeze();
        let message = Message::from_parts(
            Channel::new(header.get_channel()),
            header.get_command(),
            data,
        )?;
        Ok(Some(message))
    }
}

impl tokio_util::codec::Encoder<Message> for OpcCodec {
    type Error = OpcError;

    fn encode(&mut self, item: Message, dst: &mut BytesMut) -> Result<(), Self::Error> {
        item.write_to(dst);
        Ok(())
    }
}

impl tokio_util::codec::Encoder<&Message> for OpcCodec {
    type Error = OpcError;

    fn encode(&mut self, item: &Message, dst: &mut BytesMut) -> Result<(), Self::Error> {
        item.write_to(dst);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pixel::Pixel;
    use tokio_util::codec::{Decoder, Encoder};

    #[test]
    fn waits_for_full_header() {
        let mut codec = OpcCodec::new();
        let mut buf = BytesMut::from(&[0u8, 0, 0][..]);
        assert!(codec.decode(&mut buf).unwrap().is_none());
        assert_eq!(buf.len(), 3);
    }

    #[test]
    fn waits_for_declared_data() {
        let mut codec = OpcCodec::new();
        let mut buf = BytesMut::from(&[1u8, 0, 0, 6, 10, 20, 30][..]);
        assert!(codec.decode(&mut buf).unwrap().is_none());

        buf.extend_from_slice(&[40, 50, 60]);
        let msg = codec.decode(&mut buf).unwrap().unwrap();
        assert_eq!(msg.channel().id(), 1);
        assert_eq!(
            msg.pixels(),
            vec![Pixel::new(10, 20, 30), Pixel::new(40, 50, 60)]
        );
        assert!(buf.is_empty());
    }

    #[test]
    fn back_to_back_messages() {
        let mut codec = OpcCodec::new();
        let mut buf = BytesMut::new();
        let a = Message::set_pixels(Channel::new(1), &[(1u8, 2u8, 3u8)]).unwrap();
        let b = Message::set_pixels::<Pixel>(Channel::new(2), &[]).unwrap();
        codec.encode(&a, &mut buf).unwrap();
        codec.encode(b.clone(), &mut buf).unwrap();

        assert_eq!(codec.decode(&mut buf).unwrap(), Some(a));
        assert_eq!(codec.decode(&mut buf).unwrap(), Some(b));
        assert!(codec.decode(&mut buf).unwrap().is_none());
    }

    #[tokio::test]
    async fn framed_write_emits_exact_bytes() {
        use futures::SinkExt;

        let mock = tokio_test::io::Builder::new()
            .write(&[0, 0, 0, 9, 255, 0, 0, 0, 255, 0, 0, 0, 255])
            .build();
        let mut sink = tokio_util::codec::FramedWrite::new(mock, OpcCodec::new());
        let pixels = [(255u8, 0u8, 0u8), (0, 255, 0), (0, 0, 255)];
        let msg = Message::set_pixels(Channel::BROADCAST, &pixels).unwrap();
        sink.send(msg).await.unwrap();
    }

    #[test]
    fn decodes_unknown_commands() {
        let mut codec = OpcCodec::new();
        let mut buf = BytesMut::from(&[0u8, 0x42, 0, 1, 7][..]);
        let msg = codec.decode(&mut buf).unwrap().unwrap();
        assert_eq!(msg.command_byte(), 0x42);
        assert!(msg.command().is_err());
        assert_eq!(msg.data(), &[7]);
    }
}
