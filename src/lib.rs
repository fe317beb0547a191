//! # checkstream (v0.1.0)
//!
//! Self-verifying byte streams: content and its SHA-1 travel together in one
//! file, with the checksum carried by a final trailer line.
//!
//! ## Overview
//!
//! A [`ChecksumWriter`] passes content through to its sink while hashing it,
//! and on [`close`](ChecksumWriter::close) appends
//!
//! ```text
//! # checksum:<40 lowercase hex characters>
//! ```
//!
//! A [`ChecksumReader`] returns the content of such a stream with the trailer
//! removed, and on [`close`](ChecksumReader::close) checks the trailer against
//! the bytes it handed out. Both filters work incrementally with a fixed
//! 51-byte buffer, so stream size never affects memory use.
//!
//! ## Quick Start
//!
//! ```rust
//! use checkstream::*;
//! use std::io::{Read, Write};
//!
//! fn main() -> Result<()> {
//!     let mut stored = Vec::new();
//!     {
//!         let mut writer = ChecksumWriter::new(&mut stored);
//!         writer.write_all(b"Mary had a little lamb.")?;
//!         writer.close()?;
//!     }
//!
//!     let mut reader = ChecksumReader::new(&stored[..]);
//!     let mut content = String::new();
//!     reader.read_to_string(&mut content)?;
//!     reader.close()?;
//!
//!     assert_eq!(content, "Mary had a little lamb.");
//!     Ok(())
//! }
//! ```
//!
//! ## Errors
//!
//! Verification happens only at `close`:
//!
//! * **`MissingChecksum`**: the reader reached the end without a trailer.
//! * **`InvalidChecksum`**: a trailer does not match the content, or the
//!   writer saw a trailer that was cut short.
//!
//! I/O errors from the wrapped source or sink surface as `Error::Io`.

pub mod cat;
pub mod checksum;
pub mod error;
pub mod reader;
pub mod trailer;
pub mod writer;

// Re-export the main public API for user convenience.
pub use cat::{concatenate, concatenate_readers, CatSummary, Input};
pub use checksum::{sha1_hex, ContentDigest};
pub use error::{Error, Result};
pub use reader::ChecksumReader;
pub use trailer::{format_trailer, trailer_for};
pub use writer::ChecksumWriter;
