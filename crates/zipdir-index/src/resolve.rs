//! Fixed-point resolution of archive-internal symbolic links.

use crate::tree::{segments, Tree};
use log::{debug, warn};

/// A symlink whose target has not been found in the tree yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingLink {
    /// Archive path of the link member.
    pub source: String,
    /// Normalized, root-relative target path.
    pub target: String,
}

impl PendingLink {
    /// Build a pending link from a link member path and its raw payload.
    ///
    /// Returns `None` when the target normalizes to a location above the
    /// archive root.
    pub fn new(source: &str, raw_target: &str) -> Option<Self> {
        let target = normalize_target(source, raw_target)?;
        Some(Self {
            source: source.trim_end_matches('/').to_string(),
            target,
        })
    }
}

/// Normalize a link target against the directory containing `source`.
///
/// Absolute targets are taken relative to the archive root. `.` and `..`
/// segments are folded; a `..` that would climb above the root yields `None`.
pub fn normalize_target(source: &str, raw_target: &str) -> Option<String> {
    let mut stack: Vec<&str> = Vec::new();

    if !raw_target.starts_with('/') {
        let source = source.trim_end_matches('/');
        if let Some((parent, _)) = source.rsplit_once('/') {
            stack.extend(parent.split('/').filter(|s| !s.is_empty() && *s != "."));
        }
    }

    for segment in raw_target.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                stack.pop()?;
            }
            other => stack.push(other),
        }
    }

    Some(stack.join("/"))
}

/// Run resolution rounds until nothing more resolves.
///
/// Each round looks up every pending target in the tree built so far and, on
/// success, aliases the link path to the target node. Returns the links that
/// never resolved.
pub(crate) fn resolve_links(tree: &mut Tree, mut pending: Vec<PendingLink>) -> Vec<PendingLink> {
    let mut round = 0usize;

    while !pending.is_empty() {
        round += 1;
        let before = pending.len();
        let mut unresolved = Vec::with_capacity(before);

        for link in pending {
            let Some(target) = tree.lookup(&link.target) else {
                unresolved.push(link);
                continue;
            };
            let attached = segments(&link.source)
                .map(|path| tree.alias(&path, target))
                .unwrap_or(false);
            if !attached {
                warn!(
                    "symlink {} -> {} could not be placed in the tree",
                    link.source, link.target
                );
            }
        }

        debug!(
            "link resolution round {}: {} of {} still pending",
            round,
            unresolved.len(),
            before
        );

        pending = unresolved;
        if pending.len() == before {
            break;
        }
    }

    pending
}
