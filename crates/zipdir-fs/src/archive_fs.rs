//! Filesystem facade over the interior of one archive.
//!
//! `ArchiveFs` owns the selectors at and below its boundary (the selector of
//! the archive file itself) and forwards every other selector, unchanged, to
//! the upstream filesystem it decorates.

use crate::cache::IndexCache;
use crate::error::{FsError, Result};
use crate::vfs::{FileStat, ReadSeek, Vfs};
use log::{debug, trace};
use std::cell::RefCell;
use std::fmt;
use std::io::{Cursor, Read};
use std::rc::Rc;
use zipdir_index::{ArchiveIndex, Entry, MemberSource, ZipSource};

/// Read-only [`Vfs`] exposing an archive as a directory tree.
pub struct ArchiveFs {
    upstream: Rc<dyn Vfs>,
    boundary: String,
    index: Rc<ArchiveIndex>,
    source: RefCell<ZipSource<Box<dyn ReadSeek>>>,
}

impl ArchiveFs {
    /// Open the archive at `boundary` through `upstream` and index it.
    ///
    /// # Errors
    ///
    /// Fails if the archive cannot be opened or its central directory cannot
    /// be read.
    pub fn new(upstream: Rc<dyn Vfs>, boundary: &str) -> Result<Self> {
        let boundary = boundary_selector(boundary);
        let stream = upstream.open(&boundary)?;
        let mut source = ZipSource::new(stream)?;
        let index = Rc::new(ArchiveIndex::build(&mut source)?);
        Ok(Self::assemble(upstream, boundary, index, source))
    }

    /// Like [`ArchiveFs::new`], reusing an index from `cache` when the archive
    /// bytes have been indexed before.
    pub fn with_cache(upstream: Rc<dyn Vfs>, boundary: &str, cache: &IndexCache) -> Result<Self> {
        let boundary = boundary_selector(boundary);
        let mut bytes = Vec::new();
        upstream.open(&boundary)?.read_to_end(&mut bytes)?;

        let fingerprint = IndexCache::fingerprint(&bytes);
        let mut source = ZipSource::new(Box::new(Cursor::new(bytes)) as Box<dyn ReadSeek>)?;
        let index = match cache.get(&fingerprint) {
            Some(index) => {
                debug!("reusing cached index for {}", boundary);
                index
            }
            None => {
                let index = Rc::new(ArchiveIndex::build(&mut source)?);
                cache.insert(fingerprint, Rc::clone(&index));
                index
            }
        };
        Ok(Self::assemble(upstream, boundary, index, source))
    }

    fn assemble(
        upstream: Rc<dyn Vfs>,
        boundary: String,
        index: Rc<ArchiveIndex>,
        source: ZipSource<Box<dyn ReadSeek>>,
    ) -> Self {
        debug!(
            "mounted archive {} ({} members, {} broken links)",
            boundary,
            index.member_count(),
            index.broken_link_count()
        );
        Self {
            upstream,
            boundary,
            index,
            source: RefCell::new(source),
        }
    }

    /// Selector of the archive file acting as this filesystem's root.
    pub fn boundary(&self) -> &str {
        &self.boundary
    }

    /// The archive's directory tree.
    pub fn index(&self) -> &ArchiveIndex {
        &self.index
    }

    /// The filesystem selectors outside the boundary are forwarded to.
    pub fn upstream(&self) -> &Rc<dyn Vfs> {
        &self.upstream
    }

    /// Whether `selector` is at or below the boundary.
    pub fn owns(&self, selector: &str) -> bool {
        match selector.strip_prefix(self.boundary.as_str()) {
            Some(rest) => rest.is_empty() || rest.starts_with('/'),
            None => false,
        }
    }

    /// Archive-relative path of an owned selector.
    fn archive_path<'s>(&self, selector: &'s str) -> &'s str {
        selector[self.boundary.len()..].trim_matches('/')
    }

    fn entry(&self, selector: &str) -> Option<Entry<'_>> {
        self.index.lookup(self.archive_path(selector))
    }
}

/// Boundary selectors are compared without a trailing separator.
fn boundary_selector(boundary: &str) -> String {
    let trimmed = boundary.trim_end_matches('/');
    if trimmed.starts_with('/') {
        trimmed.to_string()
    } else {
        format!("/{}", trimmed)
    }
}

impl fmt::Debug for ArchiveFs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ArchiveFs")
            .field("boundary", &self.boundary)
            .field("members", &self.index.member_count())
            .finish_non_exhaustive()
    }
}

impl Vfs for ArchiveFs {
    fn exists(&self, selector: &str) -> bool {
        if !self.owns(selector) {
            return self.upstream.exists(selector);
        }
        self.entry(selector).is_some()
    }

    fn is_dir(&self, selector: &str) -> bool {
        if !self.owns(selector) {
            return self.upstream.is_dir(selector);
        }
        self.entry(selector).is_some_and(|e| e.is_dir())
    }

    fn is_file(&self, selector: &str) -> bool {
        if !self.owns(selector) {
            return self.upstream.is_file(selector);
        }
        self.entry(selector).is_some_and(|e| !e.is_dir())
    }

    fn stat(&self, selector: &str) -> Result<FileStat> {
        if !self.owns(selector) {
            return self.upstream.stat(selector);
        }
        trace!("stat({}) in {}", selector, self.boundary);
        match self.entry(selector) {
            Some(Entry::Directory(_)) => Ok(FileStat::directory()),
            Some(Entry::Member(member)) => Ok(FileStat::file(member.size, member.modified)),
            None => Err(FsError::NotFound(selector.to_string())),
        }
    }

    fn list_dir(&self, selector: &str) -> Result<Vec<String>> {
        if !self.owns(selector) {
            return self.upstream.list_dir(selector);
        }
        trace!("list_dir({}) in {}", selector, self.boundary);
        match self.entry(selector) {
            Some(Entry::Directory(dir)) => Ok(dir.names().map(str::to_string).collect()),
            Some(Entry::Member(_)) => Err(FsError::NotADirectory(selector.to_string())),
            None => Err(FsError::NotFound(selector.to_string())),
        }
    }

    fn open(&self, selector: &str) -> Result<Box<dyn ReadSeek>> {
        if !self.owns(selector) {
            return self.upstream.open(selector);
        }
        trace!("open({}) in {}", selector, self.boundary);
        let member = match self.entry(selector) {
            Some(Entry::Member(member)) => member,
            Some(Entry::Directory(_)) => return Err(FsError::IsADirectory(selector.to_string())),
            None => return Err(FsError::NotFound(selector.to_string())),
        };
        let data = self.source.borrow_mut().read_member(&member.path)?;
        Ok(Box::new(Cursor::new(data)))
    }

    fn fs_path(&self, selector: &str) -> String {
        if !self.owns(selector) {
            return self.upstream.fs_path(selector);
        }
        self.archive_path(selector).to_string()
    }

    fn is_writable(&self, selector: &str) -> bool {
        if !self.owns(selector) {
            return self.upstream.is_writable(selector);
        }
        false
    }

    fn unlink(&self, selector: &str) -> Result<()> {
        if !self.owns(selector) {
            return self.upstream.unlink(selector);
        }
        Err(FsError::Unsupported(format!(
            "cannot unlink {} inside read-only archive {}",
            selector, self.boundary
        )))
    }
}
