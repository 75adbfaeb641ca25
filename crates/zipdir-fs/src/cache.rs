use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;
use zipdir_index::ArchiveIndex;

/// Shares built indexes between [`ArchiveFs`](crate::ArchiveFs) instances
/// opened on identical archive bytes.
///
/// Entries are keyed by a blake3 fingerprint of the whole archive, so a
/// modified archive never hits a stale index.
///
/// There is no eviction: every distinct archive content stays cached until
/// [`IndexCache::remove`] or [`IndexCache::clear`] is called, so a long-lived
/// cache over frequently rewritten archives grows with each revision.
#[derive(Debug, Default)]
pub struct IndexCache {
    entries: RefCell<HashMap<blake3::Hash, Rc<ArchiveIndex>>>,
}

impl IndexCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fingerprint of an archive's content.
    pub fn fingerprint(bytes: &[u8]) -> blake3::Hash {
        blake3::hash(bytes)
    }

    pub fn get(&self, fingerprint: &blake3::Hash) -> Option<Rc<ArchiveIndex>> {
        self.entries.borrow().get(fingerprint).cloned()
    }

    pub fn insert(&self, fingerprint: blake3::Hash, index: Rc<ArchiveIndex>) {
        self.entries.borrow_mut().insert(fingerprint, index);
    }

    /// Drop one entry, returning the index it held.
    pub fn remove(&self, fingerprint: &blake3::Hash) -> Option<Rc<ArchiveIndex>> {
        self.entries.borrow_mut().remove(fingerprint)
    }

    pub fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.borrow().is_empty()
    }

    pub fn clear(&self) {
        self.entries.borrow_mut().clear();
    }
}
