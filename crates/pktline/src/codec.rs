use bytes::{Buf, BufMut, Bytes, BytesMut};

use crate::error::{PktLineError, Result};

/// Packet header: 4 ASCII hex digits holding the total packet length.
pub const HEADER_SIZE: usize = 4;

/// Maximum total (header + payload) length encodable in one packet.
pub const MAX_PACKET_LENGTH: usize = 65516;

/// Maximum payload accepted by the encoder.
pub const MAX_PAYLOAD_SIZE: usize = MAX_PACKET_LENGTH - HEADER_SIZE;

/// Wire form of the flush packet.
pub const FLUSH_PACKET: [u8; 4] = *b"0000";

const HEX_DIGITS: &[u8; 16] = b"0123456789abcdef";

/// A decoded pkt-line unit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Packet {
    /// The `0000` sentinel. Carries no payload.
    Flush,
    /// A data packet. The decoder only yields non-empty payloads; an empty
    /// one still encodes, as `0004`, which no conforming reader accepts.
    Data(Bytes),
}

impl Packet {
    /// Create a data packet.
    pub fn data(payload: impl Into<Bytes>) -> Self {
        Packet::Data(payload.into())
    }

    pub fn is_flush(&self) -> bool {
        matches!(self, Packet::Flush)
    }

    /// Borrow the payload, or `None` for a flush.
    pub fn payload(&self) -> Option<&Bytes> {
        match self {
            Packet::Flush => None,
            Packet::Data(payload) => Some(payload),
        }
    }

    /// Take the payload, or `None` for a flush.
    pub fn into_payload(self) -> Option<Bytes> {
        match self {
            Packet::Flush => None,
            Packet::Data(payload) => Some(payload),
        }
    }

    /// The total wire size of this packet (header + payload).
    pub fn wire_size(&self) -> usize {
        HEADER_SIZE + self.payload().map_or(0, Bytes::len)
    }
}

/// Render a total packet length as a lowercase 4-digit hex header.
pub fn encode_header(total_len: u16) -> [u8; 4] {
    let mut header = [0u8; 4];
    for (i, slot) in header.iter_mut().enumerate() {
        let shift = 12 - 4 * i;
        *slot = HEX_DIGITS[((total_len >> shift) & 0xf) as usize];
    }
    header
}

/// Parse a 4-byte header into the total packet length it declares.
///
/// Digits are accepted in either case. Anything else is a
/// [`PktLineError::MalformedHeader`].
pub fn parse_header(header: &[u8; 4]) -> Result<u16> {
    header.iter().try_fold(0u16, |acc, &byte| {
        let digit = match byte {
            b'0'..=b'9' => byte - b'0',
            b'a'..=b'f' => byte - b'a' + 10,
            b'A'..=b'F' => byte - b'A' + 10,
            _ => return Err(PktLineError::MalformedHeader { header: *header }),
        };
        Ok((acc << 4) | u16::from(digit))
    })
}

/// Encode a data packet into the wire format.
///
/// Wire format:
/// ```text
/// ┌────────────────────┬──────────────────────────┐
/// │ Length (4B hex)    │ Payload                  │
/// │ "0005".."ffec"     │ (Length - 4 bytes)       │
/// └────────────────────┴──────────────────────────┘
/// ```
///
/// Fails with [`PktLineError::PacketTooLarge`] before touching `dst` when the
/// payload exceeds [`MAX_PAYLOAD_SIZE`]. An empty payload is not rejected and
/// encodes as `0004`, which [`decode_packet`] refuses.
pub fn encode_packet(payload: &[u8], dst: &mut BytesMut) -> Result<()> {
    put_header(payload.len(), dst)?;
    dst.put_slice(payload);
    Ok(())
}

/// Encode `text` plus a trailing newline as one data packet.
pub fn encode_text_packet(text: &str, dst: &mut BytesMut) -> Result<()> {
    put_header(text.len() + 1, dst)?;
    dst.put_slice(text.as_bytes());
    dst.put_u8(b'\n');
    Ok(())
}

/// Encode the flush packet.
pub fn encode_flush(dst: &mut BytesMut) {
    dst.put_slice(&FLUSH_PACKET);
}

fn put_header(payload_len: usize, dst: &mut BytesMut) -> Result<()> {
    if payload_len > MAX_PAYLOAD_SIZE {
        return Err(PktLineError::PacketTooLarge {
            size: payload_len,
            max: MAX_PAYLOAD_SIZE,
        });
    }
    let total = HEADER_SIZE + payload_len;
    dst.reserve(total);
    // MAX_PACKET_LENGTH < u16::MAX, so the cast is lossless.
    dst.put_slice(&encode_header(total as u16));
    Ok(())
}

/// Decode a packet from a buffer.
///
/// Returns `Ok(None)` if the buffer doesn't contain a complete packet yet.
/// On success, consumes the packet bytes from the buffer. Header errors are
/// reported as soon as four bytes are available and leave the buffer intact.
pub fn decode_packet(src: &mut BytesMut) -> Result<Option<Packet>> {
    let Some(header) = peek_header(src) else {
        return Ok(None);
    };

    let total = usize::from(parse_header(&header)?);
    if total == 0 {
        src.advance(HEADER_SIZE);
        return Ok(Some(Packet::Flush));
    }
    if total <= HEADER_SIZE {
        return Err(PktLineError::InvalidPacketLength(total as u16));
    }

    if src.len() < total {
        return Ok(None);
    }

    src.advance(HEADER_SIZE);
    let payload = src.split_to(total - HEADER_SIZE).freeze();
    Ok(Some(Packet::Data(payload)))
}

/// Classify leftover bytes at end of stream, after [`decode_packet`] has
/// returned `Ok(None)` for them.
pub(crate) fn truncated(src: &[u8]) -> PktLineError {
    match peek_header(src).map(|header| parse_header(&header)) {
        Some(Ok(total)) => PktLineError::TruncatedStream {
            expected: usize::from(total) - HEADER_SIZE,
            received: src.len() - HEADER_SIZE,
        },
        Some(Err(err)) => err,
        None => PktLineError::TruncatedStream {
            expected: HEADER_SIZE,
            received: src.len(),
        },
    }
}

fn peek_header(src: &[u8]) -> Option<[u8; 4]> {
    src.get(..HEADER_SIZE)?.try_into().ok()
}
