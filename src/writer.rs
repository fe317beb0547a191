//! The write-side filter: passes content through and appends a checksum trailer.

use crate::checksum::ContentDigest;
use crate::error::{stream_closed, Error, Result};
use crate::trailer::{self, MARKER, TRAILER_LEN};
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

/// Where the writer is in recognizing a trailer supplied by the producer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum WriteState {
    /// Ordinary content, forwarded as it arrives.
    Passthrough,
    /// The candidate buffer holds a proper prefix of the marker.
    Candidate,
    /// The whole marker is buffered; hex digits are captured unchecked.
    Capturing,
    /// A complete trailer was captured; anything further is discarded.
    Finished,
    Closed,
}

/// A filter that certifies everything written through it.
///
/// Content is digested and forwarded to the wrapped sink. Bytes that could be
/// the start of a `# checksum:` line are withheld in a 51-byte candidate
/// buffer until they either turn out to be ordinary content (and are flushed
/// through) or complete a trailer (and are kept back for validation).
///
/// The trailer is written only by [`close`](Self::close). Dropping the writer
/// without closing it leaves the output uncertified.
pub struct ChecksumWriter<W: Write> {
    writer: Option<W>,
    digest: ContentDigest,
    state: WriteState,
    candidate: [u8; TRAILER_LEN],
    candidate_len: usize,
    found: Option<String>,
}

impl ChecksumWriter<BufWriter<File>> {
    /// Creates (or truncates) the file at `path` and wraps it in a buffered checksum writer.
    pub fn create(path: impl AsRef<Path>) -> Result<Self> {
        let file = File::create(path)?;
        Ok(Self::new(BufWriter::new(file)))
    }
}

impl<W: Write> ChecksumWriter<W> {
    /// Creates a new `ChecksumWriter` over `writer`.
    pub fn new(writer: W) -> Self {
        Self {
            writer: Some(writer),
            digest: ContentDigest::new(),
            state: WriteState::Passthrough,
            candidate: [0; TRAILER_LEN],
            candidate_len: 0,
            found: None,
        }
    }

    /// Hex value of a trailer the producer wrote itself, once fully captured.
    pub fn found_checksum(&self) -> Option<&str> {
        self.found.as_deref()
    }

    /// True once `close` has run.
    pub fn is_closed(&self) -> bool {
        self.state == WriteState::Closed
    }

    /// Finishes the stream: resolves any pending candidate, writes the
    /// trailer and releases the sink.
    ///
    /// Fails with `InvalidChecksum` if the producer supplied a trailer that
    /// does not match the content, or started one and never completed it. In
    /// that case no trailer is written, but the sink is still flushed and
    /// released. Calling `close` again is a no-op.
    pub fn close(&mut self) -> Result<()> {
        if self.state == WriteState::Closed {
            return Ok(());
        }

        let outcome = self.finish();
        let released = match self.writer.take() {
            Some(mut writer) => writer.flush(),
            None => Ok(()),
        };
        self.state = WriteState::Closed;

        outcome?;
        released?;
        Ok(())
    }

    fn finish(&mut self) -> Result<()> {
        if self.state == WriteState::Candidate {
            self.flush_candidate()?;
        }

        let calculated = std::mem::take(&mut self.digest).finalize_hex();
        log::debug!("calculated checksum: {calculated}");

        if self.state == WriteState::Capturing {
            let partial = &self.candidate[MARKER.len()..self.candidate_len];
            log::debug!("stream ended inside a checksum trailer");
            return Err(Error::invalid_checksum(
                String::from_utf8_lossy(partial),
                calculated,
            ));
        }

        if let Some(found) = &self.found {
            log::debug!("found checksum: {found}");
            if *found != calculated {
                return Err(Error::invalid_checksum(found.as_str(), calculated));
            }
        }

        trailer::write_trailer(self.sink()?, &calculated)?;
        Ok(())
    }

    fn sink(&mut self) -> io::Result<&mut W> {
        self.writer.as_mut().ok_or_else(stream_closed)
    }

    /// Digests `bytes` as content and forwards them.
    fn emit(&mut self, bytes: &[u8]) -> io::Result<()> {
        self.digest.update(bytes);
        match self.writer.as_mut() {
            Some(writer) => writer.write_all(bytes),
            None => Err(stream_closed()),
        }
    }

    fn begin_candidate(&mut self) {
        self.candidate[0] = b'#';
        self.candidate_len = 1;
        self.state = WriteState::Candidate;
    }

    /// Releases a candidate that turned out to be content.
    fn flush_candidate(&mut self) -> io::Result<()> {
        let len = self.candidate_len;
        self.candidate_len = 0;
        self.state = WriteState::Passthrough;
        log::trace!("candidate of {len} bytes is content");
        let candidate = self.candidate;
        self.emit(&candidate[..len])
    }

    fn push_candidate(&mut self, byte: u8) -> io::Result<()> {
        let i = self.candidate_len;
        if self.state == WriteState::Capturing || byte == MARKER[i] {
            self.candidate[i] = byte;
            self.candidate_len += 1;

            if self.candidate_len == MARKER.len() {
                log::trace!("checksum marker confirmed");
                self.state = WriteState::Capturing;
            } else if self.candidate_len == TRAILER_LEN {
                let hex = String::from_utf8_lossy(&self.candidate[MARKER.len()..]).into_owned();
                log::debug!("captured checksum trailer: {hex}");
                self.found = Some(hex);
                self.state = WriteState::Finished;
            }
            return Ok(());
        }

        self.flush_candidate()?;
        if byte == b'#' {
            self.begin_candidate();
            Ok(())
        } else {
            self.emit(&[byte])
        }
    }
}

impl<W: Write> Write for ChecksumWriter<W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let mut rest = buf;
        while let Some(&byte) = rest.first() {
            match self.state {
                WriteState::Closed => return Err(stream_closed()),
                WriteState::Finished => {
                    log::trace!("discarding {} bytes after trailer", rest.len());
                    break;
                }
                WriteState::Passthrough => {
                    let run = rest.iter().position(|&b| b == b'#').unwrap_or(rest.len());
                    if run == 0 {
                        self.begin_candidate();
                        rest = &rest[1..];
                    } else {
                        self.emit(&rest[..run])?;
                        rest = &rest[run..];
                    }
                }
                WriteState::Candidate | WriteState::Capturing => {
                    self.push_candidate(byte)?;
                    rest = &rest[1..];
                }
            }
        }
        Ok(buf.len())
    }

    /// Flushes content already forwarded. Candidate bytes stay withheld.
    fn flush(&mut self) -> io::Result<()> {
        match self.writer.as_mut() {
            Some(writer) => writer.flush(),
            None => Err(stream_closed()),
        }
    }
}
