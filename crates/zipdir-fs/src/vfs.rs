use crate::error::Result;
use chrono::{DateTime, Utc};
use std::io::{Read, Seek};

/// File type mask of a Unix mode.
const S_IFMT: u32 = 0o170000;
const S_IFDIR: u32 = 0o040000;
const S_IFREG: u32 = 0o100000;

/// Mode reported for directories inside an archive (`drwxr-xr-x`).
pub const DIRECTORY_MODE: u32 = S_IFDIR | 0o755;
/// Mode reported for files inside an archive (`-rw-r--r--`).
pub const FILE_MODE: u32 = S_IFREG | 0o644;

/// A readable, seekable byte stream returned by [`Vfs::open`].
pub trait ReadSeek: Read + Seek {}

impl<T: Read + Seek> ReadSeek for T {}

/// Result of [`Vfs::stat`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FileStat {
    /// Unix mode, including the file type bits.
    pub mode: u32,
    /// Size in bytes.
    pub size: u64,
    /// Access time, seconds since the epoch.
    pub atime: i64,
    /// Modification time, seconds since the epoch.
    pub mtime: i64,
    /// Change time, seconds since the epoch.
    pub ctime: i64,
}

impl FileStat {
    /// Synthetic stat for an archive directory: all times at the epoch.
    pub fn directory() -> Self {
        Self {
            mode: DIRECTORY_MODE,
            size: 0,
            atime: 0,
            mtime: 0,
            ctime: 0,
        }
    }

    /// Stat for an archive file, reusing its one stored timestamp.
    pub fn file(size: u64, modified: DateTime<Utc>) -> Self {
        let stamp = modified.timestamp();
        Self {
            mode: FILE_MODE,
            size,
            atime: stamp,
            mtime: stamp,
            ctime: stamp,
        }
    }

    pub fn is_dir(&self) -> bool {
        self.mode & S_IFMT == S_IFDIR
    }

    pub fn is_file(&self) -> bool {
        self.mode & S_IFMT == S_IFREG
    }

    /// Modification time as a UTC datetime.
    pub fn modified(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.mtime, 0)
    }
}

/// The filesystem capability set seen by content handlers.
///
/// Selectors are absolute, `/`-separated paths in the server namespace.
/// Implementations may decorate another `Vfs` and forward the selectors they
/// do not own.
pub trait Vfs {
    /// Whether anything exists at `selector`.
    fn exists(&self, selector: &str) -> bool;

    /// Whether `selector` names a directory.
    fn is_dir(&self, selector: &str) -> bool;

    /// Whether `selector` names a regular file.
    fn is_file(&self, selector: &str) -> bool;

    /// Mode, size and timestamps of `selector`.
    fn stat(&self, selector: &str) -> Result<FileStat>;

    /// Names of the entries in the directory at `selector`.
    fn list_dir(&self, selector: &str) -> Result<Vec<String>>;

    /// Open the file at `selector` for reading, positioned at the start.
    fn open(&self, selector: &str) -> Result<Box<dyn ReadSeek>>;

    /// The path this filesystem uses internally for `selector`.
    fn fs_path(&self, selector: &str) -> String;

    /// Whether `selector` may be modified.
    fn is_writable(&self, selector: &str) -> bool;

    /// Remove the file at `selector`.
    fn unlink(&self, selector: &str) -> Result<()>;

    /// Whether the content at `selector` is a recognized archive.
    fn is_archive(&self, selector: &str) -> bool {
        crate::signature::is_zip_archive(self, selector)
    }
}
