//! The trailer wire format: a final line `# checksum:<40 lowercase hex>\n`.

use crate::checksum::sha1_hex;
use std::io::{self, Write};

/// Literal prefix of every trailer line.
pub const MARKER: &[u8; 11] = b"# checksum:";

/// Number of hex digits carried by a trailer.
pub const HEX_LEN: usize = 40;

/// Length of a trailer line without its newline.
pub const TRAILER_LEN: usize = MARKER.len() + HEX_LEN;

/// Bytes a reader inspects after a `#`: the rest of the marker, the hex
/// digits and the line terminator.
pub const LOOKAHEAD_LEN: usize = TRAILER_LEN;

/// Builds the canonical trailer text for a hex digest (no newline).
pub fn format_trailer(hex: &str) -> String {
    format!("# checksum:{hex}")
}

/// Writes the canonical trailer line, newline included.
pub fn write_trailer<W: Write>(writer: &mut W, hex: &str) -> io::Result<()> {
    writer.write_all(format_trailer(hex).as_bytes())?;
    writer.write_all(b"\n")
}

/// The trailer a writer would append after `content`.
pub fn trailer_for(content: &[u8]) -> String {
    format_trailer(&sha1_hex(content))
}

/// Inspects the bytes that followed a `#` and returns the claimed hex if they
/// complete a trailer line.
///
/// The tail must be a full `LOOKAHEAD_LEN` bytes; its last byte is the line
/// terminator and is not inspected. A shorter tail is never a trailer.
pub(crate) fn parse_lookahead(tail: &[u8]) -> Option<String> {
    let rest = &MARKER[1..];
    if tail.len() < LOOKAHEAD_LEN || !tail.starts_with(rest) {
        return None;
    }
    let hex = &tail[rest.len()..rest.len() + HEX_LEN];
    Some(String::from_utf8_lossy(hex).into_owned())
}
