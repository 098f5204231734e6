//! `tokio_util::codec` adapter for pkt-line streams.
//!
//! Wrap an `AsyncRead` in `FramedRead` or an `AsyncWrite` in `FramedWrite`
//! with [`PktLineCodec`] to get a `Stream`/`Sink` of [`Packet`]s. A clean end
//! of stream ends the `Stream`; leftover bytes at EOF surface as
//! [`PktLineError::TruncatedStream`].

use bytes::BytesMut;
use tokio_util::codec::{Decoder, Encoder};

use crate::codec::{decode_packet, encode_flush, encode_packet, truncated, Packet};
use crate::error::PktLineError;

/// Stateless pkt-line codec for `FramedRead`/`FramedWrite`.
#[derive(Debug, Clone, Copy, Default)]
pub struct PktLineCodec;

impl PktLineCodec {
    pub fn new() -> Self {
        Self
    }
}

impl Decoder for PktLineCodec {
    type Item = Packet;
    type Error = PktLineError;

    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<Packet>, PktLineError> {
        decode_packet(src)
    }

    fn decode_eof(&mut self, src: &mut BytesMut) -> Result<Option<Packet>, PktLineError> {
        match decode_packet(src)? {
            Some(packet) => Ok(Some(packet)),
            None if src.is_empty() => Ok(None),
            None => Err(truncated(src)),
        }
    }
}

impl Encoder<Packet> for PktLineCodec {
    type Error = PktLineError;

    fn encode(&mut self, packet: Packet, dst: &mut BytesMut) -> Result<(), PktLineError> {
        match packet {
            Packet::Flush => {
                encode_flush(dst);
                Ok(())
            }
            Packet::Data(payload) => encode_packet(&payload, dst),
        }
    }
}

#[cfg(test)]
mod tests {
    use futures_util::{SinkExt, StreamExt};
    use tokio_util::codec::{FramedRead, FramedWrite};

    use super::*;
    use crate::codec::MAX_PAYLOAD_SIZE;

    #[tokio::test]
    async fn framed_roundtrip_over_duplex() {
        let (client, server) = tokio::io::duplex(64);
        let mut sink = FramedWrite::new(client, PktLineCodec::new());
        let mut stream = FramedRead::new(server, PktLineCodec::new());

        let sender = tokio::spawn(async move {
            sink.send(Packet::data(&b"hello\n"[..])).await.unwrap();
            sink.send(Packet::data(vec![7u8; 1000])).await.unwrap();
            sink.send(Packet::Flush).await.unwrap();
        });

        let first = stream.next().await.unwrap().unwrap();
        assert_eq!(first, Packet::data(&b"hello\n"[..]));

        let second = stream.next().await.unwrap().unwrap();
        assert_eq!(second.payload().unwrap().len(), 1000);

        assert!(stream.next().await.unwrap().unwrap().is_flush());

        sender.await.unwrap();
        // Sink dropped with the task: clean EOF ends the stream.
        assert!(stream.next().await.is_none());
    }

    #[tokio::test]
    async fn framed_read_truncated_payload() {
        let wire: &[u8] = b"0010hello";
        let mut stream = FramedRead::new(wire, PktLineCodec);

        let err = stream.next().await.unwrap().unwrap_err();
        assert!(matches!(
            err,
            PktLineError::TruncatedStream {
                expected: 12,
                received: 5
            }
        ));
    }

    #[tokio::test]
    async fn framed_read_malformed_header() {
        let wire: &[u8] = b"zzzz";
        let mut stream = FramedRead::new(wire, PktLineCodec);

        let err = stream.next().await.unwrap().unwrap_err();
        assert!(matches!(err, PktLineError::MalformedHeader { .. }));
    }

    #[test]
    fn decode_eof_on_partial_header() {
        let mut buf = BytesMut::from(&b"00"[..]);
        let err = PktLineCodec.decode_eof(&mut buf).unwrap_err();
        assert!(matches!(
            err,
            PktLineError::TruncatedStream {
                expected: 4,
                received: 2
            }
        ));

        let mut empty = BytesMut::new();
        assert!(PktLineCodec.decode_eof(&mut empty).unwrap().is_none());
    }

    #[test]
    fn encoder_rejects_oversized_payload() {
        let mut dst = BytesMut::new();
        let err = PktLineCodec
            .encode(Packet::data(vec![0u8; MAX_PAYLOAD_SIZE + 1]), &mut dst)
            .unwrap_err();
        assert!(matches!(err, PktLineError::PacketTooLarge { .. }));
        assert!(dst.is_empty());
    }
}
