use crate::error::Result;
use crate::member::ArchiveMember;
use crate::resolve::{resolve_links, PendingLink};
use crate::source::MemberSource;
use crate::tree::{segments, DirectoryNode, NodeId, Tree};
use log::{debug, warn};

/// A node found by [`ArchiveIndex::lookup`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Entry<'a> {
    Directory(&'a DirectoryNode),
    Member(&'a ArchiveMember),
}

impl<'a> Entry<'a> {
    pub fn is_dir(&self) -> bool {
        matches!(self, Entry::Directory(_))
    }

    pub fn as_directory(&self) -> Option<&'a DirectoryNode> {
        match *self {
            Entry::Directory(dir) => Some(dir),
            Entry::Member(_) => None,
        }
    }

    pub fn as_member(&self) -> Option<&'a ArchiveMember> {
        match *self {
            Entry::Member(member) => Some(member),
            Entry::Directory(_) => None,
        }
    }
}

/// The directory tree of one archive, with internal symlinks resolved.
///
/// Built once from a [`MemberSource`] and immutable afterwards.
#[derive(Debug, Clone)]
pub struct ArchiveIndex {
    tree: Tree,
    member_count: usize,
    broken_links: usize,
}

/// Build-time classification of an archive member.
enum BuildItem {
    Directory(String),
    File(ArchiveMember),
    Link(PendingLink),
    /// A symlink whose target can never resolve.
    Broken(String),
}

impl ArchiveIndex {
    /// Enumerate `source` and build the tree, reading symlink payloads as needed.
    pub fn build<S: MemberSource + ?Sized>(source: &mut S) -> Result<Self> {
        let members = source.members()?;
        let mut items = Vec::with_capacity(members.len());

        for member in members {
            items.push(classify(source, member)?);
        }

        Ok(Self::from_items(items))
    }

    /// Build from members whose link targets are already known.
    ///
    /// `link_target` is consulted for symlink members only and returns the raw
    /// target string.
    pub fn from_members<I, F>(members: I, mut link_target: F) -> Self
    where
        I: IntoIterator<Item = ArchiveMember>,
        F: FnMut(&ArchiveMember) -> Option<String>,
    {
        let items = members
            .into_iter()
            .map(|member| {
                if !member.is_symlink() {
                    return plain_item(member);
                }
                link_target(&member)
                    .and_then(|raw| PendingLink::new(&member.path, &raw))
                    .map(BuildItem::Link)
                    .unwrap_or(BuildItem::Broken(member.path))
            })
            .collect();
        Self::from_items(items)
    }

    fn from_items(items: Vec<BuildItem>) -> Self {
        let mut tree = Tree::new();
        let mut pending = Vec::new();
        let mut member_count = 0;
        let mut broken_links = 0;

        for item in items {
            match item {
                BuildItem::Directory(path) => match segments(&path) {
                    Some(dirs) if tree.ensure_dir(&dirs).is_some() => {}
                    _ => warn!("skipping directory entry {}", path),
                },
                BuildItem::File(member) => {
                    let path = member.path.clone();
                    let placed = match segments(&path) {
                        Some(segs) if !segs.is_empty() => tree.insert_member(&segs, member),
                        _ => false,
                    };
                    if placed {
                        member_count += 1;
                    } else {
                        warn!("skipping archive member {}", path);
                    }
                }
                BuildItem::Link(link) => pending.push(link),
                BuildItem::Broken(path) => {
                    debug!("symlink {} can never resolve", path);
                    broken_links += 1;
                }
            }
        }

        let total_links = pending.len();
        let broken = resolve_links(&mut tree, pending);
        for link in &broken {
            debug!("broken symlink {} -> {}", link.source, link.target);
        }
        broken_links += broken.len();

        debug!(
            "indexed {} members, {} of {} symlinks resolved, {} nodes",
            member_count,
            total_links - broken.len(),
            total_links,
            tree.len()
        );

        Self {
            tree,
            member_count,
            broken_links,
        }
    }

    /// Resolve a tree-relative path to its node id.
    pub fn lookup_id(&self, path: &str) -> Option<NodeId> {
        self.tree.lookup(path)
    }

    /// Resolve a tree-relative path. The empty path is the root.
    pub fn lookup(&self, path: &str) -> Option<Entry<'_>> {
        self.lookup_id(path).map(|id| self.entry(id))
    }

    /// The node stored under `id`.
    pub fn entry(&self, id: NodeId) -> Entry<'_> {
        self.tree.node(id)
    }

    /// The archive root directory.
    pub fn root(&self) -> &DirectoryNode {
        self.tree.root()
    }

    /// Number of regular members placed in the tree.
    pub fn member_count(&self) -> usize {
        self.member_count
    }

    /// Number of symlinks that never resolved.
    pub fn broken_link_count(&self) -> usize {
        self.broken_links
    }
}

fn plain_item(member: ArchiveMember) -> BuildItem {
    if member.is_directory_entry() {
        BuildItem::Directory(member.path)
    } else {
        BuildItem::File(member)
    }
}

fn classify<S: MemberSource + ?Sized>(source: &mut S, member: ArchiveMember) -> Result<BuildItem> {
    if !member.is_symlink() {
        return Ok(plain_item(member));
    }

    let payload = match source.read_member(&member.path) {
        Ok(payload) => payload,
        Err(e) => {
            warn!("symlink {} has an unreadable target: {}", member.path, e);
            return Ok(BuildItem::Broken(member.path));
        }
    };
    let item = match String::from_utf8(payload) {
        Ok(raw) => PendingLink::new(&member.path, &raw)
            .map(BuildItem::Link)
            .unwrap_or(BuildItem::Broken(member.path)),
        Err(_) => {
            warn!("symlink {} has a non UTF-8 target", member.path);
            BuildItem::Broken(member.path)
        }
    };
    Ok(item)
}
