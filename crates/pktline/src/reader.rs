use std::io::{ErrorKind, Read};

use bytes::{Bytes, BytesMut};
use tracing::{debug, trace};

use crate::codec::{decode_packet, truncated, Packet, MAX_PACKET_LENGTH};
use crate::error::{PktLineError, Result};

const READ_CHUNK_SIZE: usize = 8 * 1024;

/// Reads complete pkt-line packets from any `Read` stream.
///
/// Handles partial reads internally. Bytes read past the end of the current
/// packet stay buffered for the next call.
pub struct PacketReader<R> {
    inner: R,
    buf: BytesMut,
}

impl<R: Read> PacketReader<R> {
    /// Create a new packet reader.
    pub fn new(inner: R) -> Self {
        Self {
            inner,
            buf: BytesMut::with_capacity(MAX_PACKET_LENGTH),
        }
    }

    /// Read the next packet (blocking).
    ///
    /// Returns `Err(PktLineError::EndOfStream)` if the stream ends before the
    /// first byte of a packet, and `Err(PktLineError::TruncatedStream { .. })`
    /// if it ends anywhere after that.
    pub fn read(&mut self) -> Result<Packet> {
        loop {
            if let Some(packet) = decode_packet(&mut self.buf)? {
                trace!(
                    flush = packet.is_flush(),
                    len = packet.payload().map_or(0, Bytes::len),
                    "pkt-line read"
                );
                return Ok(packet);
            }

            let mut chunk = [0u8; READ_CHUNK_SIZE];
            let read = match self.inner.read(&mut chunk) {
                Ok(n) => n,
                Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                Err(err) => return Err(PktLineError::Io(err)),
            };

            if read == 0 {
                if self.buf.is_empty() {
                    return Err(PktLineError::EndOfStream);
                }
                return Err(truncated(&self.buf));
            }

            self.buf.extend_from_slice(&chunk[..read]);
        }
    }

    /// Read one packet and return its payload, or `None` for a flush.
    pub fn read_packet(&mut self) -> Result<Option<Bytes>> {
        self.read().map(Packet::into_payload)
    }

    /// Read one text packet, stripping a single trailing newline if present.
    ///
    /// Returns `None` for a flush.
    pub fn read_packet_text(&mut self) -> Result<Option<String>> {
        let Some(payload) = self.read_packet()? else {
            return Ok(None);
        };

        let mut text = String::from_utf8(payload.to_vec())?;
        if text.ends_with('\n') {
            text.pop();
        }
        Ok(Some(text))
    }

    /// Read text packets until a flush or an empty line.
    ///
    /// The terminator is consumed; packets after an empty line stay unread.
    /// Any error discards the lines read so far.
    pub fn read_packet_list(&mut self) -> Result<Vec<String>> {
        let mut list = Vec::new();
        while let Some(line) = self.read_packet_text()? {
            if line.is_empty() {
                break;
            }
            list.push(line);
        }
        debug!(count = list.len(), "pkt-line list read");
        Ok(list)
    }

    /// Bytes already pulled from the stream but not yet decoded.
    pub fn buffered(&self) -> &[u8] {
        &self.buf
    }

    /// Borrow the underlying stream.
    pub fn get_ref(&self) -> &R {
        &self.inner
    }

    /// Mutably borrow the underlying stream.
    pub fn get_mut(&mut self) -> &mut R {
        &mut self.inner
    }

    /// Consume the reader and return the inner stream.
    ///
    /// Any [`buffered`](Self::buffered) bytes are dropped.
    pub fn into_inner(self) -> R {
        self.inner
    }
}
