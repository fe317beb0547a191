#![no_main]
use checkstream::{ChecksumReader, ChecksumWriter};
use libfuzzer_sys::fuzz_target;
use std::io::{Read, Write};

fuzz_target!(|data: &[u8]| {
    let mut reader = ChecksumReader::new(data);
    let mut content = Vec::new();
    let _ = reader.read_to_end(&mut content);
    let read_ok = reader.close().is_ok();

    let mut out = Vec::new();
    let mut writer = ChecksumWriter::new(&mut out);
    let _ = writer.write_all(data);
    let write_ok = writer.close().is_ok();

    // Whatever the writer certifies, the reader must accept.
    if write_ok {
        let mut reader = ChecksumReader::new(&out[..]);
        let mut again = Vec::new();
        reader.read_to_end(&mut again).unwrap();
        reader.close().unwrap();
        if read_ok {
            assert_eq!(again, content);
        }
    }
});
