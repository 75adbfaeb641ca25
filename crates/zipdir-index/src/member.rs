use chrono::{DateTime, Utc};

/// File type mask of a Unix mode.
pub const S_IFMT: u32 = 0o170000;
/// File type bits of a symbolic link.
pub const S_IFLNK: u32 = 0o120000;

/// A single file stored in an archive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveMember {
    /// Path of the member inside the archive, using `/` as separator.
    pub path: String,
    /// Uncompressed size in bytes.
    pub size: u64,
    /// Modification time recorded in the archive.
    pub modified: DateTime<Utc>,
    /// Raw Unix permission bits, when the archive recorded them.
    pub mode: Option<u32>,
}

impl ArchiveMember {
    /// Create a member without permission bits.
    pub fn new(path: impl Into<String>, size: u64, modified: DateTime<Utc>) -> Self {
        Self {
            path: path.into(),
            size,
            modified,
            mode: None,
        }
    }

    /// Set the raw Unix permission bits.
    pub fn with_mode(mut self, mode: u32) -> Self {
        self.mode = Some(mode);
        self
    }

    /// Whether the permission bits mark this member as a symbolic link.
    pub fn is_symlink(&self) -> bool {
        self.mode
            .map(|mode| mode & S_IFMT == S_IFLNK)
            .unwrap_or(false)
    }

    /// Whether this entry only declares a directory (name ends with `/`).
    pub fn is_directory_entry(&self) -> bool {
        self.path.ends_with('/')
    }

    /// Final path segment of the member.
    pub fn name(&self) -> &str {
        let trimmed = self.path.trim_end_matches('/');
        trimmed.rsplit('/').next().unwrap_or(trimmed)
    }
}
