use thiserror::Error;

/// Errors that can occur while reading an archive into an index.
#[derive(Debug, Error)]
pub enum Error {
    /// A member requested by name does not exist in the archive.
    #[error("member not found in archive: {0}")]
    MemberNotFound(String),

    /// Error from the zip library.
    #[error("zip error: {0}")]
    Zip(#[from] zip::result::ZipError),

    /// I/O error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for zipdir-index operations.
pub type Result<T> = std::result::Result<T, Error>;
