use checkstream::*;
use std::io::{BufReader, Read, Write};

mod harness {
    pub mod failing_writer;
    pub mod faulty_reader;
}
use harness::failing_writer::FailingWriter;
use harness::faulty_reader::{FaultMode, FaultyReader};

fn certify(content: &[u8]) -> Vec<u8> {
    let mut out = Vec::new();
    {
        let mut writer = ChecksumWriter::new(&mut out);
        writer.write_all(content).unwrap();
        writer.close().unwrap();
    }
    out
}

#[test]
fn short_reads_are_handled() {
    // Purpose: A source that yields one byte per read forces the lookahead to be
    // assembled across many buffer refills.
    let content = b"# header\n## #\nhello";
    let inner = std::io::Cursor::new(certify(content));
    let faulty = FaultyReader::new(inner, FaultMode::OneByteChunks);
    let mut reader = ChecksumReader::new(BufReader::with_capacity(1, faulty));

    let mut read = Vec::new();
    reader.read_to_end(&mut read).unwrap();
    reader.close().unwrap();
    assert_eq!(read, content);
}

#[test]
fn interrupted_reads_are_retried() {
    // Purpose: Interrupted reads surface from `read` like any other I/O error, and
    // `read_to_end` retries them; interruptions during the lookahead are retried internally.
    let content = b"# comment\nworld";
    let inner = std::io::Cursor::new(certify(content));
    let faulty = FaultyReader::new(inner, FaultMode::InterruptedEvery(2));
    let mut reader = ChecksumReader::new(BufReader::with_capacity(4, faulty));

    let mut read = Vec::new();
    reader.read_to_end(&mut read).unwrap();
    reader.close().unwrap();
    assert_eq!(read, content);
}

#[test]
fn premature_eof_yields_missing_checksum() {
    let inner = std::io::Cursor::new(certify(b"abcdef"));
    let faulty = FaultyReader::new(inner, FaultMode::PrematureEofAt(2));
    let mut reader = ChecksumReader::new(BufReader::with_capacity(4, faulty));

    let mut read = Vec::new();
    reader.read_to_end(&mut read).unwrap();
    assert_eq!(read, b"abcd");
    assert!(matches!(reader.close(), Err(Error::MissingChecksum)));
}

#[test]
fn write_error_propagates() {
    // Purpose: A write error from the sink must surface unchanged as an io::Error.
    let mut writer = ChecksumWriter::new(FailingWriter::new(4));
    let err = writer
        .write_all(b"this will not fit")
        .expect_err("expected I/O error");
    assert_eq!(err.kind(), std::io::ErrorKind::BrokenPipe);
}

#[test]
fn trailer_write_error_surfaces_from_close() {
    let mut writer = ChecksumWriter::new(FailingWriter::new(8));
    writer.write_all(b"content").unwrap();
    match writer.close() {
        Err(Error::Io(e)) => assert_eq!(e.kind(), std::io::ErrorKind::BrokenPipe),
        other => panic!("unexpected result: {other:?}"),
    }
    assert!(writer.is_closed());
    assert!(writer.close().is_ok());
}
