//! Wire format of the coordination channel.
//!
//! There is no framing: a client connects, writes the raw UTF-8 bytes of one
//! word and closes. The receiver performs a single bounded read, so anything
//! past [`MAX_WORD_BYTES`] is lost.

use std::net::{IpAddr, Ipv4Addr, SocketAddr};

pub const DEFAULT_PORT: u16 = 5050;
pub const DEFAULT_ADDR: SocketAddr = SocketAddr::new(IpAddr::V4(Ipv4Addr::LOCALHOST), DEFAULT_PORT);

/// Size of the single read the server performs per connection.
pub const MAX_WORD_BYTES: usize = 1024;

/// Token in a URL template that is replaced by the encoded word.
pub const PLACEHOLDER: &str = "{word}";

/// Bytes a client puts on the wire for `word`.
///
/// Cut on a char boundary so the receiver never sees half a code point.
pub fn payload(word: &str) -> &[u8] {
    if word.len() <= MAX_WORD_BYTES {
        return word.as_bytes();
    }
    let mut end = MAX_WORD_BYTES;
    while !word.is_char_boundary(end) {
        end -= 1;
    }
    &word.as_bytes()[..end]
}

/// Decode one received chunk into a word.
///
/// Returns `None` for empty / whitespace-only chunks and for bytes that are not
/// UTF-8. A chunk whose only problem is a character cut off at the end keeps
/// its valid prefix.
pub fn decode_chunk(buf: &[u8]) -> Option<String> {
    let text = match std::str::from_utf8(buf) {
        Ok(s) => s,
        Err(e) if e.error_len().is_none() => {
            // Incomplete sequence at the very end: truncated, not malformed.
            std::str::from_utf8(&buf[..e.valid_up_to()]).ok()?
        }
        Err(_) => return None,
    };
    let word = text.trim();
    if word.is_empty() {
        None
    } else {
        Some(word.to_string())
    }
}
