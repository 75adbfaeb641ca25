use std::io;
use thiserror::Error;

/// Errors returned by filesystem capabilities and the archive handler.
#[derive(Debug, Error)]
pub enum FsError {
    /// The selector does not name anything.
    #[error("no such file or directory: {0}")]
    NotFound(String),

    /// A directory operation was applied to a file.
    #[error("not a directory: {0}")]
    NotADirectory(String),

    /// A file operation was applied to a directory.
    #[error("is a directory: {0}")]
    IsADirectory(String),

    /// The operation is not available on this filesystem.
    #[error("operation not supported: {0}")]
    Unsupported(String),

    /// The content is not a recognized archive.
    #[error("not a recognized archive: {0}")]
    Format(String),

    /// Invalid handler configuration.
    #[error("configuration error: {0}")]
    Config(String),

    /// Error from the archive index.
    #[error(transparent)]
    Index(#[from] zipdir_index::Error),

    /// Error from the zip library.
    #[error("zip error: {0}")]
    Zip(#[from] zip::result::ZipError),

    /// I/O error.
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

impl FsError {
    /// The closest `std::io::ErrorKind`, for protocol layers that map errors
    /// to a small set of responses.
    pub fn kind(&self) -> io::ErrorKind {
        match self {
            FsError::NotFound(_) => io::ErrorKind::NotFound,
            FsError::NotADirectory(_) => io::ErrorKind::NotADirectory,
            FsError::IsADirectory(_) => io::ErrorKind::IsADirectory,
            FsError::Unsupported(_) => io::ErrorKind::Unsupported,
            FsError::Format(_) | FsError::Index(_) | FsError::Zip(_) => {
                io::ErrorKind::InvalidData
            }
            FsError::Config(_) => io::ErrorKind::InvalidInput,
            FsError::Io(e) => e.kind(),
        }
    }

    /// Whether the error means "nothing there".
    pub fn is_not_found(&self) -> bool {
        self.kind() == io::ErrorKind::NotFound
    }
}

/// Result type for zipdir-fs operations.
pub type Result<T> = std::result::Result<T, FsError>;
