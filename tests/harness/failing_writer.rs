use std::io::{self, Write};

/// Accepts `fail_after` bytes, then fails every write with `BrokenPipe`.
pub struct FailingWriter {
    pub written: Vec<u8>,
    pub fail_after: usize,
    pub flushes: usize,
}

impl FailingWriter {
    pub fn new(fail_after: usize) -> Self {
        Self {
            written: Vec::new(),
            fail_after,
            flushes: 0,
        }
    }
}

impl Write for FailingWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        if self.written.len() >= self.fail_after {
            return Err(io::Error::new(
                io::ErrorKind::BrokenPipe,
                "Simulated I/O error",
            ));
        }
        let remaining = self.fail_after - self.written.len();
        let n = remaining.min(buf.len());
        self.written.extend_from_slice(&buf[..n]);
        Ok(n)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.flushes += 1;
        Ok(())
    }
}
