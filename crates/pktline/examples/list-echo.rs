//! Minimal pkt-line server: accepts one TCP peer and echoes packet lists back.
//!
//! Run with:
//!   cargo run --example list-echo -p pktline
//!
//! Each list the peer sends (text packets followed by `0000`) is answered
//! with the same lines in the same order, terminated by a flush.

use std::net::TcpListener;

use pktline::PktLine;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_max_level(tracing::Level::DEBUG)
        .init();

    let listener = TcpListener::bind("127.0.0.1:0")?;
    eprintln!("Listening on {}", listener.local_addr()?);

    let (stream, addr) = listener.accept()?;
    eprintln!("Peer connected: {addr}");
    let mut conn = PktLine::new(stream.try_clone()?, stream);

    loop {
        match conn.read_packet_list() {
            Ok(lines) => {
                eprintln!("Received {} lines", lines.len());
                conn.write_packet_list(&lines)?;
            }
            Err(e) if e.is_end_of_stream() => {
                eprintln!("Peer disconnected");
                break;
            }
            Err(e) => return Err(e.into()),
        }
    }

    Ok(())
}
