use std::io::{Read, Write};

use bytes::Bytes;

use crate::codec::Packet;
use crate::error::Result;
use crate::reader::PacketReader;
use crate::writer::PacketWriter;

/// A pkt-line codec bound to both directions of a connection.
///
/// The two halves share no state, so [`split`](Self::split) hands them to
/// separate threads when each direction has its own driver.
pub struct PktLine<R, W> {
    reader: PacketReader<R>,
    writer: PacketWriter<W>,
}

impl<R: Read, W: Write> PktLine<R, W> {
    /// Bind a codec to an input and an output stream.
    pub fn new(input: R, output: W) -> Self {
        Self::from_parts(PacketReader::new(input), PacketWriter::new(output))
    }

    /// Reassemble a codec from halves, keeping any bytes the reader buffered.
    pub fn from_parts(reader: PacketReader<R>, writer: PacketWriter<W>) -> Self {
        Self { reader, writer }
    }

    pub fn read(&mut self) -> Result<Packet> {
        self.reader.read()
    }

    pub fn read_packet(&mut self) -> Result<Option<Bytes>> {
        self.reader.read_packet()
    }

    pub fn read_packet_text(&mut self) -> Result<Option<String>> {
        self.reader.read_packet_text()
    }

    pub fn read_packet_list(&mut self) -> Result<Vec<String>> {
        self.reader.read_packet_list()
    }

    pub fn write(&mut self, packet: &Packet) -> Result<()> {
        self.writer.write(packet)
    }

    pub fn write_packet(&mut self, payload: &[u8]) -> Result<()> {
        self.writer.write_packet(payload)
    }

    pub fn write_flush(&mut self) -> Result<()> {
        self.writer.write_flush()
    }

    pub fn write_packet_text(&mut self, text: &str) -> Result<()> {
        self.writer.write_packet_text(text)
    }

    pub fn write_packet_list<I, S>(&mut self, lines: I) -> Result<()>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.writer.write_packet_list(lines)
    }

    pub fn reader_mut(&mut self) -> &mut PacketReader<R> {
        &mut self.reader
    }

    pub fn writer_mut(&mut self) -> &mut PacketWriter<W> {
        &mut self.writer
    }

    /// Separate the read and write halves.
    pub fn split(self) -> (PacketReader<R>, PacketWriter<W>) {
        (self.reader, self.writer)
    }

    /// Consume the codec and return the underlying streams.
    pub fn into_inner(self) -> (R, W) {
        (self.reader.into_inner(), self.writer.into_inner())
    }
}
