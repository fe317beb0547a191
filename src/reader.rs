//! The read-side filter: hides the checksum trailer and verifies it on close.

use crate::checksum::ContentDigest;
use crate::error::{stream_closed, Error, Result};
use crate::trailer::{self, LOOKAHEAD_LEN};
use std::fs::File;
use std::io::{self, BufRead, BufReader, Read};
use std::path::Path;

/// A filter that returns the content of a certified stream and checks it.
///
/// Content is copied straight out of the source's buffer up to the next `#`.
/// At a `#` the reader pulls the following `LOOKAHEAD_LEN` bytes into its own
/// pushback array; if they complete a trailer line the stream ends there,
/// otherwise the `#` is returned as content and the looked-ahead bytes are
/// served again on later reads.
///
/// ```rust
/// # use checkstream::ChecksumReader;
/// # use std::io::Read;
/// let data = b"a# checksum:86f7e437faa5a7fce15d1ddcb9eaeaea377667b8\n";
/// let mut reader = ChecksumReader::new(&data[..]);
/// let mut content = String::new();
/// reader.read_to_string(&mut content)?;
/// reader.close()?;
/// assert_eq!(content, "a");
/// # Ok::<(), checkstream::Error>(())
/// ```
pub struct ChecksumReader<R: BufRead> {
    reader: Option<R>,
    digest: ContentDigest,
    // Bytes pulled from the source but not yet returned: lookahead[pos..len].
    lookahead: [u8; LOOKAHEAD_LEN],
    pos: usize,
    len: usize,
    found: Option<String>,
}

impl ChecksumReader<BufReader<File>> {
    /// Opens the file at `path` behind a buffered checksum reader.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let file = File::open(path)?;
        Ok(Self::new(BufReader::new(file)))
    }
}

impl<R: BufRead> ChecksumReader<R> {
    /// Creates a new `ChecksumReader` over `reader`.
    pub fn new(reader: R) -> Self {
        Self {
            reader: Some(reader),
            digest: ContentDigest::new(),
            lookahead: [0; LOOKAHEAD_LEN],
            pos: 0,
            len: 0,
            found: None,
        }
    }

    /// Hex value carried by the trailer, once it has been reached.
    pub fn found_checksum(&self) -> Option<&str> {
        self.found.as_deref()
    }

    /// True once `close` has run.
    pub fn is_closed(&self) -> bool {
        self.reader.is_none()
    }

    /// Releases the source and verifies the content returned so far.
    ///
    /// Fails with `MissingChecksum` if no trailer was reached, and with
    /// `InvalidChecksum` if the trailer does not match the digest of exactly
    /// the bytes handed to the caller. Calling `close` again is a no-op.
    pub fn close(&mut self) -> Result<()> {
        if self.reader.take().is_none() {
            return Ok(());
        }

        let digest = std::mem::take(&mut self.digest);
        match &self.found {
            Some(found) => {
                log::debug!("verifying found checksum: {found}");
                digest.verify(found)
            }
            None => {
                log::debug!("no checksum trailer after {} content bytes", digest.len());
                Err(Error::MissingChecksum)
            }
        }
    }

    /// Pulls up to `LOOKAHEAD_LEN` bytes after a `#` into the pushback array
    /// and checks whether they finish a trailer.
    fn probe_trailer(&mut self) -> io::Result<bool> {
        self.lookahead.copy_within(self.pos..self.len, 0);
        self.len -= self.pos;
        self.pos = 0;

        let reader = self.reader.as_mut().ok_or_else(stream_closed)?;
        while self.len < LOOKAHEAD_LEN {
            let available = match reader.fill_buf() {
                Ok(available) => available,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e),
            };
            if available.is_empty() {
                break;
            }
            let take = available.len().min(LOOKAHEAD_LEN - self.len);
            self.lookahead[self.len..self.len + take].copy_from_slice(&available[..take]);
            reader.consume(take);
            self.len += take;
        }

        match trailer::parse_lookahead(&self.lookahead[..self.len]) {
            Some(hex) => {
                log::debug!("found checksum trailer: {hex}");
                self.found = Some(hex);
                self.pos = 0;
                self.len = 0;
                Ok(true)
            }
            None => {
                log::trace!("pushing back {} looked-ahead bytes", self.len);
                Ok(false)
            }
        }
    }
}

/// Copies bytes from `src` into `dst` up to the first `#`.
/// Returns the number copied and whether a `#` stopped the copy.
fn copy_until_marker(src: &[u8], dst: &mut [u8]) -> (usize, bool) {
    let limit = src.len().min(dst.len());
    match src[..limit].iter().position(|&b| b == b'#') {
        Some(i) => {
            dst[..i].copy_from_slice(&src[..i]);
            (i, true)
        }
        None => {
            dst[..limit].copy_from_slice(&src[..limit]);
            (limit, false)
        }
    }
}

impl<R: BufRead> Read for ChecksumReader<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let reader = self.reader.as_mut().ok_or_else(stream_closed)?;
        if buf.is_empty() || self.found.is_some() {
            return Ok(0);
        }

        let (copied, at_marker) = if self.pos < self.len {
            let (copied, at_marker) = copy_until_marker(&self.lookahead[self.pos..self.len], buf);
            self.pos += copied + usize::from(at_marker && copied == 0);
            (copied, at_marker)
        } else {
            let available = reader.fill_buf()?;
            if available.is_empty() {
                log::trace!("end of source without trailer");
                return Ok(0);
            }
            let (copied, at_marker) = copy_until_marker(available, buf);
            reader.consume(copied + usize::from(at_marker && copied == 0));
            (copied, at_marker)
        };

        if copied > 0 {
            self.digest.update(&buf[..copied]);
            return Ok(copied);
        }

        // The next byte was a `#`, already consumed above.
        debug_assert!(at_marker);
        if self.probe_trailer()? {
            return Ok(0);
        }
        buf[0] = b'#';
        self.digest.update(b"#");
        Ok(1)
    }
}
