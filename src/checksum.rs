//! The running content digest shared by both filters.

use crate::error::{Error, Result};
use sha1::{Digest, Sha1};

/// A running SHA-1 over content bytes.
///
/// Each filter owns exactly one. Finalizing consumes the digest, so a value
/// can never be fed more bytes after its hex form has been produced.
#[derive(Default, Clone)]
pub struct ContentDigest {
    hasher: Sha1,
    len: u64,
}

impl ContentDigest {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feeds content bytes to the digest.
    pub fn update(&mut self, bytes: &[u8]) {
        self.hasher.update(bytes);
        self.len += bytes.len() as u64;
    }

    /// Number of content bytes digested so far.
    pub fn len(&self) -> u64 {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Finishes the digest and returns it as 40 lowercase hex characters.
    pub fn finalize_hex(self) -> String {
        hex::encode(self.hasher.finalize())
    }

    /// Finishes the digest and compares it to a claimed hex value.
    pub fn verify(self, found: &str) -> Result<()> {
        let calculated = self.finalize_hex();
        if calculated == found {
            Ok(())
        } else {
            Err(Error::invalid_checksum(found, calculated))
        }
    }
}

/// One-shot SHA-1 of a byte slice, as lowercase hex.
pub fn sha1_hex(bytes: &[u8]) -> String {
    let mut digest = ContentDigest::new();
    digest.update(bytes);
    digest.finalize_hex()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_vectors() {
        assert_eq!(sha1_hex(b"a"), "86f7e437faa5a7fce15d1ddcb9eaeaea377667b8");
        assert_eq!(
            sha1_hex(b"Mary had a little lamb."),
            "4e07b8c7aaf2a4ed4ce39e76f65d2a04bdef5700"
        );
    }

    #[test]
    fn test_incremental_matches_one_shot() {
        let mut digest = ContentDigest::new();
        digest.update(b"Mary had ");
        digest.update(b"a little lamb.");
        assert_eq!(digest.len(), 23);
        assert_eq!(digest.finalize_hex(), sha1_hex(b"Mary had a little lamb."));
    }

    #[test]
    fn test_verify() {
        let mut digest = ContentDigest::new();
        digest.update(b"a");
        assert!(digest.clone().verify("86f7e437faa5a7fce15d1ddcb9eaeaea377667b8").is_ok());
        match digest.verify("86f7e437faa5a7fce15d1ddcb9eaeaea377667b9") {
            Err(Error::InvalidChecksum { calculated, .. }) => {
                assert_eq!(calculated, "86f7e437faa5a7fce15d1ddcb9eaeaea377667b8");
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn test_uppercase_hex_is_rejected() {
        let mut digest = ContentDigest::new();
        digest.update(b"a");
        assert!(digest
            .verify("86F7E437FAA5A7FCE15D1DDCB9EAEAEA377667B8")
            .is_err());
    }
}
