use crate::error::{FsError, Result};
use crate::vfs::{FileStat, ReadSeek, Vfs};
use log::trace;
use std::fs::{self, File, Metadata};
use std::io;
use std::path::{Path, PathBuf};

/// [`Vfs`] over a document root on the host filesystem.
///
/// Selector `/a/b` maps to `<root>/a/b`. Selectors with `..` segments never
/// resolve, so requests stay inside the root.
#[derive(Debug, Clone)]
pub struct RealFs {
    root: PathBuf,
}

impl RealFs {
    pub fn new<P: Into<PathBuf>>(root: P) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn host_path(&self, selector: &str) -> Option<PathBuf> {
        let mut path = self.root.clone();
        for segment in selector.split('/') {
            match segment {
                "" | "." => {}
                ".." => return None,
                other => path.push(other),
            }
        }
        Some(path)
    }

    fn resolve(&self, selector: &str) -> Result<PathBuf> {
        self.host_path(selector)
            .ok_or_else(|| FsError::NotFound(selector.to_string()))
    }
}

fn map_io(selector: &str, error: io::Error) -> FsError {
    match error.kind() {
        io::ErrorKind::NotFound => FsError::NotFound(selector.to_string()),
        io::ErrorKind::NotADirectory => FsError::NotADirectory(selector.to_string()),
        io::ErrorKind::IsADirectory => FsError::IsADirectory(selector.to_string()),
        _ => FsError::Io(error),
    }
}

#[cfg(unix)]
fn file_stat(meta: &Metadata) -> FileStat {
    use std::os::unix::fs::MetadataExt;

    FileStat {
        mode: meta.mode(),
        size: meta.size(),
        atime: meta.atime(),
        mtime: meta.mtime(),
        ctime: meta.ctime(),
    }
}

/// Without Unix metadata the mode is synthesized from the file type and the
/// read-only flag, and the change time falls back to the modification time.
#[cfg(not(unix))]
fn file_stat(meta: &Metadata) -> FileStat {
    use crate::vfs::{DIRECTORY_MODE, FILE_MODE};
    use std::time::{SystemTime, UNIX_EPOCH};

    fn seconds(time: io::Result<SystemTime>) -> i64 {
        time.ok()
            .and_then(|t| t.duration_since(UNIX_EPOCH).ok())
            .and_then(|d| i64::try_from(d.as_secs()).ok())
            .unwrap_or(0)
    }

    let mut mode = if meta.is_dir() { DIRECTORY_MODE } else { FILE_MODE };
    if meta.permissions().readonly() {
        mode &= !0o222;
    }
    let mtime = seconds(meta.modified());
    FileStat {
        mode,
        size: meta.len(),
        atime: seconds(meta.accessed()),
        mtime,
        ctime: mtime,
    }
}

impl Vfs for RealFs {
    fn exists(&self, selector: &str) -> bool {
        self.host_path(selector).is_some_and(|p| p.exists())
    }

    fn is_dir(&self, selector: &str) -> bool {
        self.host_path(selector).is_some_and(|p| p.is_dir())
    }

    fn is_file(&self, selector: &str) -> bool {
        self.host_path(selector).is_some_and(|p| p.is_file())
    }

    fn stat(&self, selector: &str) -> Result<FileStat> {
        trace!("stat({})", selector);
        let meta = fs::metadata(self.resolve(selector)?).map_err(|e| map_io(selector, e))?;
        Ok(file_stat(&meta))
    }

    fn list_dir(&self, selector: &str) -> Result<Vec<String>> {
        trace!("list_dir({})", selector);
        let path = self.resolve(selector)?;
        if path.is_file() {
            return Err(FsError::NotADirectory(selector.to_string()));
        }
        let mut names = Vec::new();
        for entry in fs::read_dir(&path).map_err(|e| map_io(selector, e))? {
            names.push(entry?.file_name().to_string_lossy().to_string());
        }
        Ok(names)
    }

    fn open(&self, selector: &str) -> Result<Box<dyn ReadSeek>> {
        trace!("open({})", selector);
        let path = self.resolve(selector)?;
        if path.is_dir() {
            return Err(FsError::IsADirectory(selector.to_string()));
        }
        let file = File::open(&path).map_err(|e| map_io(selector, e))?;
        Ok(Box::new(file))
    }

    fn fs_path(&self, selector: &str) -> String {
        self.host_path(selector)
            .unwrap_or_else(|| self.root.clone())
            .to_string_lossy()
            .to_string()
    }

    fn is_writable(&self, selector: &str) -> bool {
        match self.host_path(selector) {
            Some(path) => match fs::metadata(path) {
                Ok(meta) => !meta.permissions().readonly(),
                Err(_) => true,
            },
            None => false,
        }
    }

    fn unlink(&self, selector: &str) -> Result<()> {
        let path = self.resolve(selector)?;
        fs::remove_file(path).map_err(|e| map_io(selector, e))
    }
}
