use std::io::{ErrorKind, Write};

use bytes::BytesMut;
use tracing::{debug, trace};

use crate::codec::{encode_flush, encode_packet, encode_text_packet, Packet, MAX_PACKET_LENGTH};
use crate::error::{PktLineError, Result};

/// Writes pkt-line packets to any `Write` stream.
///
/// Every packet is flushed to the sink before the call returns.
pub struct PacketWriter<W> {
    inner: W,
    buf: BytesMut,
}

impl<W: Write> PacketWriter<W> {
    /// Create a new packet writer.
    pub fn new(inner: W) -> Self {
        Self {
            inner,
            buf: BytesMut::with_capacity(MAX_PACKET_LENGTH),
        }
    }

    /// Write a [`Packet`], data or flush.
    pub fn write(&mut self, packet: &Packet) -> Result<()> {
        match packet {
            Packet::Flush => self.write_flush(),
            Packet::Data(payload) => self.write_packet(payload),
        }
    }

    /// Encode and send one data packet.
    ///
    /// Payloads over [`MAX_PAYLOAD_SIZE`](crate::MAX_PAYLOAD_SIZE) fail with
    /// [`PktLineError::PacketTooLarge`] and nothing is written.
    pub fn write_packet(&mut self, payload: &[u8]) -> Result<()> {
        self.buf.clear();
        encode_packet(payload, &mut self.buf)?;
        trace!(len = payload.len(), "pkt-line write");
        self.send_buffered()
    }

    /// Send the `0000` flush packet.
    pub fn write_flush(&mut self) -> Result<()> {
        self.buf.clear();
        encode_flush(&mut self.buf);
        trace!("pkt-line write flush");
        self.send_buffered()
    }

    /// Send `text` followed by a newline as one data packet.
    pub fn write_packet_text(&mut self, text: &str) -> Result<()> {
        self.buf.clear();
        encode_text_packet(text, &mut self.buf)?;
        trace!(len = text.len() + 1, "pkt-line write text");
        self.send_buffered()
    }

    /// Send each line as a text packet, then a flush.
    ///
    /// Stops at the first error; the remaining lines and the flush are not sent.
    pub fn write_packet_list<I, S>(&mut self, lines: I) -> Result<()>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut count = 0usize;
        for line in lines {
            self.write_packet_text(line.as_ref())?;
            count += 1;
        }
        self.write_flush()?;
        debug!(count, "pkt-line list written");
        Ok(())
    }

    /// Flush the underlying stream.
    pub fn flush(&mut self) -> Result<()> {
        loop {
            match self.inner.flush() {
                Ok(()) => return Ok(()),
                Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                Err(err) => return Err(PktLineError::Io(err)),
            }
        }
    }

    fn send_buffered(&mut self) -> Result<()> {
        let mut offset = 0usize;
        while offset < self.buf.len() {
            match self.inner.write(&self.buf[offset..]) {
                Ok(0) => return Err(PktLineError::Io(ErrorKind::WriteZero.into())),
                Ok(n) => offset += n,
                Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                Err(err) => return Err(PktLineError::Io(err)),
            }
        }

        self.flush()
    }

    /// Borrow the underlying stream.
    pub fn get_ref(&self) -> &W {
        &self.inner
    }

    /// Mutably borrow the underlying stream.
    pub fn get_mut(&mut self) -> &mut W {
        &mut self.inner
    }

    /// Consume the writer and return the inner stream.
    pub fn into_inner(self) -> W {
        self.inner
    }
}
