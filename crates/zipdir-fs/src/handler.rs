//! Request handler that detects where a selector crosses into an archive.
//!
//! For an incoming selector the handler probes every prefix, deepest first,
//! and stops at the first one that is a regular file on the upstream
//! filesystem with a ZIP signature. An [`ArchiveFs`] rooted there then
//! replaces the upstream filesystem for the rest of the request.

use crate::archive_fs::ArchiveFs;
use crate::cache::IndexCache;
use crate::config::ZipHandlerConfig;
use crate::error::{FsError, Result};
use crate::selector::{candidate_prefixes, normalize_selector};
use crate::vfs::Vfs;
use log::{debug, trace};
use regex::Regex;
use std::rc::Rc;

/// Where a selector enters an archive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Boundary {
    /// Selector of the archive file.
    pub base: String,
    /// Part of the request below the archive, if any. Informational only.
    pub remainder: Option<String>,
}

/// Chooses and runs a content handler for a located resource.
///
/// Implemented by the server's handler-selection layer; the archive handler
/// calls it with an [`ArchiveFs`] in place of the upstream filesystem.
pub trait HandlerSelector {
    type Output;

    fn select(&self, selector: &str, vfs: Rc<dyn Vfs>) -> Result<Self::Output>;
}

/// Boundary-detecting handler for archive selectors.
pub struct ArchiveHandler {
    upstream: Rc<dyn Vfs>,
    enabled: bool,
    pattern: Regex,
    cache: Option<Rc<IndexCache>>,
}

impl ArchiveHandler {
    /// Create a handler probing `upstream`.
    ///
    /// # Errors
    ///
    /// Returns [`FsError::Config`] if the configured pattern is not a valid
    /// regular expression.
    pub fn new(config: &ZipHandlerConfig, upstream: Rc<dyn Vfs>) -> Result<Self> {
        let pattern = Regex::new(&config.pattern)
            .map_err(|e| FsError::Config(format!("invalid zip pattern: {}", e)))?;
        let cache = config.cache.then(|| Rc::new(IndexCache::new()));
        Ok(Self {
            upstream,
            enabled: config.enabled,
            pattern,
            cache,
        })
    }

    /// Share `cache` with other handlers instead of a private one.
    pub fn with_cache(mut self, cache: Rc<IndexCache>) -> Self {
        self.cache = Some(cache);
        self
    }

    pub fn upstream(&self) -> &Rc<dyn Vfs> {
        &self.upstream
    }

    /// Find the deepest prefix of `selector` that is an archive.
    pub fn detect(&self, selector: &str) -> Option<Boundary> {
        if !self.enabled {
            return None;
        }

        let selector = normalize_selector(selector);
        for (base, remainder) in candidate_prefixes(&selector) {
            trace!("probing {} for an archive", base);
            if self.pattern.is_match(&base)
                && self.upstream.is_file(&base)
                && self.upstream.is_archive(&base)
            {
                debug!("{} crosses into archive {}", selector, base);
                return Some(Boundary { base, remainder });
            }
        }

        trace!("{} is not inside an archive", selector);
        None
    }

    /// Whether `selector` lies inside an archive this handler can serve.
    pub fn can_handle(&self, selector: &str) -> bool {
        self.detect(selector).is_some()
    }

    /// Build the filesystem for a detected boundary.
    pub fn mount(&self, boundary: &Boundary) -> Result<ArchiveFs> {
        match &self.cache {
            Some(cache) => ArchiveFs::with_cache(Rc::clone(&self.upstream), &boundary.base, cache),
            None => ArchiveFs::new(Rc::clone(&self.upstream), &boundary.base),
        }
    }

    /// Serve `selector` through `selector_layer` if it lies inside an archive.
    ///
    /// Returns `Ok(None)` when the handler declines, so the next handler in
    /// the chain can take the request.
    pub fn handle<S: HandlerSelector>(
        &self,
        selector: &str,
        selector_layer: &S,
    ) -> Result<Option<S::Output>> {
        let Some(boundary) = self.detect(selector) else {
            return Ok(None);
        };
        let vfs: Rc<dyn Vfs> = Rc::new(self.mount(&boundary)?);
        selector_layer
            .select(&normalize_selector(selector), vfs)
            .map(Some)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vfs::{FileStat, ReadSeek};

    /// Upstream with a fixed set of "archive" files that never need opening.
    struct FakeUpstream {
        archives: Vec<&'static str>,
    }

    impl Vfs for FakeUpstream {
        fn exists(&self, selector: &str) -> bool {
            self.is_file(selector)
        }
        fn is_dir(&self, _selector: &str) -> bool {
            false
        }
        fn is_file(&self, selector: &str) -> bool {
            self.archives.iter().any(|a| *a == selector) || selector.ends_with(".txt.zip")
        }
        fn stat(&self, selector: &str) -> Result<FileStat> {
            Err(FsError::NotFound(selector.to_string()))
        }
        fn list_dir(&self, selector: &str) -> Result<Vec<String>> {
            Err(FsError::NotFound(selector.to_string()))
        }
        fn open(&self, selector: &str) -> Result<Box<dyn ReadSeek>> {
            Err(FsError::NotFound(selector.to_string()))
        }
        fn fs_path(&self, selector: &str) -> String {
            selector.to_string()
        }
        fn is_writable(&self, _selector: &str) -> bool {
            false
        }
        fn unlink(&self, selector: &str) -> Result<()> {
            Err(FsError::Unsupported(selector.to_string()))
        }
        fn is_archive(&self, selector: &str) -> bool {
            self.archives.iter().any(|a| *a == selector)
        }
    }

    fn handler(config: ZipHandlerConfig, archives: Vec<&'static str>) -> ArchiveHandler {
        ArchiveHandler::new(&config, Rc::new(FakeUpstream { archives })).unwrap()
    }

    #[test]
    fn test_deepest_prefix_wins() {
        let h = handler(ZipHandlerConfig::default(), vec!["/a.zip", "/a.zip/inner.zip"]);
        let boundary = h.detect("/a.zip/inner.zip/file").unwrap();
        assert_eq!(boundary.base, "/a.zip/inner.zip");
        assert_eq!(boundary.remainder.as_deref(), Some("file"));

        let boundary = h.detect("/a.zip/other/file").unwrap();
        assert_eq!(boundary.base, "/a.zip");
        assert_eq!(boundary.remainder.as_deref(), Some("other/file"));
    }

    #[test]
    fn test_archive_itself_has_no_remainder() {
        let h = handler(ZipHandlerConfig::default(), vec!["/a.zip"]);
        let boundary = h.detect("/a.zip/").unwrap();
        assert_eq!(boundary.base, "/a.zip");
        assert_eq!(boundary.remainder, None);
    }

    #[test]
    fn test_declines_without_archive() {
        let h = handler(ZipHandlerConfig::default(), vec!["/a.zip"]);
        assert!(h.detect("/b.zip/file").is_none());
        assert!(h.detect("/").is_none());
        assert!(!h.can_handle("/plain/file.txt"));
    }

    #[test]
    fn test_file_with_zip_name_but_no_signature_is_rejected() {
        let h = handler(ZipHandlerConfig::default(), vec![]);
        assert!(h.detect("/notes.txt.zip/x").is_none());
    }

    #[test]
    fn test_pattern_filters_candidates() {
        let config = ZipHandlerConfig {
            pattern: r"\.jar$".to_string(),
            ..Default::default()
        };
        let h = handler(config, vec!["/a.zip", "/lib.jar"]);
        assert!(h.detect("/a.zip/file").is_none());
        assert_eq!(h.detect("/lib.jar/META-INF").unwrap().base, "/lib.jar");
    }

    #[test]
    fn test_disabled_handler_declines() {
        let config = ZipHandlerConfig {
            enabled: false,
            ..Default::default()
        };
        let h = handler(config, vec!["/a.zip"]);
        assert!(h.detect("/a.zip/file").is_none());
    }

    #[test]
    fn test_invalid_pattern_is_config_error() {
        let config = ZipHandlerConfig {
            pattern: "(".to_string(),
            ..Default::default()
        };
        let result = ArchiveHandler::new(&config, Rc::new(FakeUpstream { archives: vec![] }));
        assert!(matches!(result, Err(FsError::Config(_))));
    }
}
