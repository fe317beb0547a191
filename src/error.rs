use thiserror::Error;

/// Custom error types for the checkstream library.
#[derive(Error, Debug)]
pub enum Error {
    /// Underlying I/O errors from std::io operations.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The stream ended without ever carrying a checksum trailer.
    #[error("Missing checksum: stream ended without a checksum trailer")]
    MissingChecksum,

    /// A trailer was present but does not certify the content, or it was cut short.
    #[error("Invalid checksum: stream claims '{found}', content hashes to '{calculated}'")]
    InvalidChecksum { found: String, calculated: String },
}

impl Error {
    /// Create a new `InvalidChecksum` error from the claimed and calculated hex values.
    pub fn invalid_checksum(found: impl Into<String>, calculated: impl Into<String>) -> Self {
        Self::InvalidChecksum {
            found: found.into(),
            calculated: calculated.into(),
        }
    }

    /// True for `MissingChecksum`, the only condition callers usually treat as recoverable.
    pub fn is_missing_checksum(&self) -> bool {
        matches!(self, Self::MissingChecksum)
    }
}

/// Result type alias for the library operations.
pub type Result<T> = std::result::Result<T, Error>;

pub(crate) fn stream_closed() -> std::io::Error {
    std::io::Error::other("stream closed")
}
