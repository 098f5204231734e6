//! Git-style pkt-line framing over any byte stream.
//!
//! Every packet is framed with:
//! - A 4-byte ASCII hex header holding the total length (header + payload)
//! - The raw payload, at most 65512 bytes
//!
//! The header `0000` is the flush packet, a payload-less sentinel that higher
//! level protocols use to terminate sequences. Headers `0001`..`0004` are
//! invalid. There is no delimiter, checksum or trailer.
//!
//! [`PacketReader`] and [`PacketWriter`] work over blocking `std::io`
//! streams; [`PktLine`] binds both directions of one connection. With the
//! `async` feature, `PktLineCodec` plugs the same wire rules into
//! `tokio_util::codec`.

pub mod codec;
pub mod duplex;
pub mod error;
#[cfg(feature = "async")]
pub mod framed;
pub mod reader;
pub mod writer;

pub use codec::{
    decode_packet, encode_flush, encode_header, encode_packet, encode_text_packet, parse_header,
    Packet, FLUSH_PACKET, HEADER_SIZE, MAX_PACKET_LENGTH, MAX_PAYLOAD_SIZE,
};
pub use duplex::PktLine;
pub use error::{PktLineError, Result};
#[cfg(feature = "async")]
pub use framed::PktLineCodec;
pub use reader::PacketReader;
pub use writer::PacketWriter;
