//! # zipdir-index
//!
//! In-memory directory tree for the members of a ZIP archive.
//!
//! This crate provides:
//! - Archive member metadata, including symlink detection from raw Unix mode bits
//! - An arena-backed tree where implicit directories materialize from member paths
//! - Fixed-point resolution of archive-internal symlinks, aliasing links to the
//!   node they point at
//! - The [`MemberSource`] codec contract and its ZIP implementation
//!
//! Links that never resolve (dangling targets, cycles such as `a -> b -> a`,
//! targets that climb above the archive root) are left out of the tree, so
//! looking them up is indistinguishable from looking up a path that never
//! existed.
//!
//! ## Example
//!
//! ```ignore
//! use std::fs::File;
//! use zipdir_index::{ArchiveIndex, Entry, ZipSource};
//!
//! let mut source = ZipSource::new(File::open("site.zip")?)?;
//! let index = ArchiveIndex::build(&mut source)?;
//!
//! if let Some(Entry::Directory(dir)) = index.lookup("docs") {
//!     for name in dir.names() {
//!         println!("{}", name);
//!     }
//! }
//! ```

mod error;
mod index;
mod member;
mod resolve;
mod source;
mod tree;

pub use error::{Error, Result};
pub use index::{ArchiveIndex, Entry};
pub use member::{ArchiveMember, S_IFLNK, S_IFMT};
pub use resolve::{normalize_target, PendingLink};
pub use source::{MemberSource, ZipSource};
pub use tree::{DirectoryNode, NodeId};
