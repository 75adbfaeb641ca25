//! # zipdir-fs
//!
//! Browse the inside of ZIP archives as ordinary directories of a selector
//! namespace, without extracting them.
//!
//! This crate provides:
//! - The [`Vfs`] capability trait shared by every filesystem layer
//! - [`RealFs`], a document root on the host filesystem
//! - [`ArchiveFs`], a read-only view of one archive that forwards selectors
//!   outside the archive to the filesystem it wraps
//! - [`ArchiveHandler`], which finds the deepest archive along a selector and
//!   hands the request to the handler-selection layer with an `ArchiveFs`
//! - TOML configuration and an opt-in [`IndexCache`]
//!
//! ## Example
//!
//! ```ignore
//! use std::rc::Rc;
//! use zipdir_fs::{ArchiveHandler, RealFs, ServerConfig, Vfs};
//!
//! let config = ServerConfig::load("zipdir.toml")?;
//! let upstream: Rc<dyn Vfs> = Rc::new(RealFs::new(&config.root));
//! let handler = ArchiveHandler::new(&config.handlers.zip, Rc::clone(&upstream))?;
//!
//! if let Some(boundary) = handler.detect("/pub/site.zip/docs") {
//!     let vfs = handler.mount(&boundary)?;
//!     for name in vfs.list_dir("/pub/site.zip/docs")? {
//!         println!("{}", name);
//!     }
//! }
//! ```
//!
//! ## Nested archives
//!
//! `ArchiveFs::open` returns a seekable in-memory stream, so an `ArchiveFs`
//! can be the upstream of another `ArchiveHandler`. Each layer only owns the
//! selectors below its own boundary.

mod archive_fs;
mod cache;
mod config;
mod error;
mod handler;
mod real;
mod selector;
pub mod signature;
mod vfs;

pub use archive_fs::ArchiveFs;
pub use cache::IndexCache;
pub use config::{HandlersConfig, ServerConfig, ZipHandlerConfig};
pub use error::{FsError, Result};
pub use handler::{ArchiveHandler, Boundary, HandlerSelector};
pub use real::RealFs;
pub use selector::{candidate_prefixes, normalize_selector};
pub use vfs::{FileStat, ReadSeek, Vfs, DIRECTORY_MODE, FILE_MODE};

// Re-export zipdir-index types for convenience
pub use zipdir_index::{ArchiveIndex, ArchiveMember, Entry};
