/// Errors that can occur while reading or writing pkt-line packets.
#[derive(Debug, thiserror::Error)]
pub enum PktLineError {
    /// The stream ended before the first byte of a new packet.
    ///
    /// Callers looping over packets treat this as normal termination.
    #[error("end of stream")]
    EndOfStream,

    /// The stream ended in the middle of a header or payload.
    #[error("stream truncated mid-packet ({received} of {expected} bytes)")]
    TruncatedStream { expected: usize, received: usize },

    /// The header bytes are not four ASCII hexadecimal digits.
    #[error("malformed packet header {}", render_header(.header))]
    MalformedHeader { header: [u8; 4] },

    /// The header declares a total length in `1..=4`, too short to hold itself.
    #[error("invalid packet length {0:#06x}")]
    InvalidPacketLength(u16),

    /// The payload exceeds the maximum encodable size.
    #[error("packet too large ({size} bytes, max {max})")]
    PacketTooLarge { size: usize, max: usize },

    /// A text packet did not carry valid UTF-8.
    #[error("text packet is not valid UTF-8: {0}")]
    InvalidText(#[from] std::string::FromUtf8Error),

    /// An I/O error occurred on the underlying stream.
    #[error("pkt-line I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl PktLineError {
    /// Returns true for a clean end of stream between packets.
    pub fn is_end_of_stream(&self) -> bool {
        matches!(self, PktLineError::EndOfStream)
    }
}

fn render_header(header: &[u8; 4]) -> String {
    format!("{:?}", String::from_utf8_lossy(header))
}

pub type Result<T> = std::result::Result<T, PktLineError>;
