//! Error types

/// Storage errors
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Version tag outside the supported range
    #[error("Unsupported snapshot version: {0:#x}")]
    UnsupportedVersion(u32),

    /// Stream ended before a field
    #[error("Truncated data: missing {0}")]
    Truncated(String),

    /// Field value that cannot be trusted
    #[error("Corrupt data: {0}")]
    Corrupt(String),
}

/// Result type
pub type Result<T> = std::result::Result<T, Error>;

impl From<Error> for mwc_core::Error {
    fn from(err: Error) -> Self {
        match err {
            Error::Io(e) => mwc_core::Error::Io(e),
            other => mwc_core::Error::Storage(other.to_string()),
        }
    }
}
