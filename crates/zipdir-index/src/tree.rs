//! Arena-backed directory tree.
//!
//! Nodes live in a flat `Vec` and refer to each other by [`NodeId`]. The
//! root directory is held outside the arena under [`NodeId::ROOT`]. A
//! resolved symlink is just a second directory entry holding the id of an
//! existing node, so aliased subtrees are shared rather than copied.

use crate::index::Entry;
use crate::member::ArchiveMember;
use std::collections::BTreeMap;

/// Index of a node inside the tree arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl NodeId {
    /// The archive root.
    pub const ROOT: NodeId = NodeId(0);

    pub fn index(self) -> usize {
        self.0
    }
}

/// A directory: child name to node id.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DirectoryNode {
    children: BTreeMap<String, NodeId>,
}

impl DirectoryNode {
    /// Names of the direct children, sorted.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.children.keys().map(String::as_str)
    }

    /// Look up a direct child by name.
    pub fn child(&self, name: &str) -> Option<NodeId> {
        self.children.get(name).copied()
    }

    pub fn len(&self) -> usize {
        self.children.len()
    }

    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }
}

/// A node in the arena.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Directory(DirectoryNode),
    Member(ArchiveMember),
}

/// Splits an archive path into its meaningful segments.
///
/// Empty and `.` segments are dropped. Returns `None` when a `..` segment is
/// present: the tree has no parent links, so such paths never resolve.
pub(crate) fn segments(path: &str) -> Option<Vec<&str>> {
    let mut out = Vec::new();
    for segment in path.split('/') {
        match segment {
            "" | "." => continue,
            ".." => return None,
            other => out.push(other),
        }
    }
    Some(out)
}

#[derive(Debug, Clone)]
pub(crate) struct Tree {
    root: DirectoryNode,
    /// Node `NodeId(i)` for `i > 0` is stored at `nodes[i - 1]`.
    nodes: Vec<Node>,
}

impl Tree {
    pub(crate) fn new() -> Self {
        Self {
            root: DirectoryNode::default(),
            nodes: Vec::new(),
        }
    }

    pub(crate) fn root(&self) -> &DirectoryNode {
        &self.root
    }

    pub(crate) fn node(&self, id: NodeId) -> Entry<'_> {
        if id == NodeId::ROOT {
            return Entry::Directory(&self.root);
        }
        match &self.nodes[id.0 - 1] {
            Node::Directory(dir) => Entry::Directory(dir),
            Node::Member(member) => Entry::Member(member),
        }
    }

    /// Number of nodes, the root included.
    pub(crate) fn len(&self) -> usize {
        self.nodes.len() + 1
    }

    fn push(&mut self, node: Node) -> NodeId {
        self.nodes.push(node);
        NodeId(self.nodes.len())
    }

    fn directory_mut(&mut self, id: NodeId) -> Option<&mut DirectoryNode> {
        if id == NodeId::ROOT {
            return Some(&mut self.root);
        }
        match &mut self.nodes[id.0 - 1] {
            Node::Directory(dir) => Some(dir),
            Node::Member(_) => None,
        }
    }

    /// Descend from the root one segment at a time.
    pub(crate) fn lookup(&self, path: &str) -> Option<NodeId> {
        let mut current = NodeId::ROOT;
        for segment in segments(path)? {
            current = match self.node(current) {
                Entry::Directory(dir) => dir.child(segment)?,
                Entry::Member(_) => return None,
            };
        }
        Some(current)
    }

    /// Walk `dirs` from the root, creating missing directories.
    ///
    /// Returns `None` if the walk runs into a member leaf.
    pub(crate) fn ensure_dir(&mut self, dirs: &[&str]) -> Option<NodeId> {
        let mut current = NodeId::ROOT;
        for segment in dirs {
            let existing = self.directory_mut(current)?.child(segment);
            current = match existing {
                Some(id) => id,
                None => {
                    let id = self.push(Node::Directory(DirectoryNode::default()));
                    self.directory_mut(current)?
                        .children
                        .insert((*segment).to_string(), id);
                    id
                }
            };
        }
        match self.node(current) {
            Entry::Directory(_) => Some(current),
            Entry::Member(_) => None,
        }
    }

    /// Attach a member as a new leaf at `path`. Returns `false` if the slot
    /// is taken or the parent chain crosses a leaf.
    pub(crate) fn insert_member(&mut self, path: &[&str], member: ArchiveMember) -> bool {
        let Some((name, dirs)) = path.split_last() else {
            return false;
        };
        let Some(parent) = self.ensure_dir(dirs) else {
            return false;
        };
        if self.has_child(parent, name) {
            return false;
        }
        let id = self.push(Node::Member(member));
        self.attach(parent, name, id)
    }

    /// Point `path` at an existing node. Returns `false` if the slot is taken
    /// or the parent chain crosses a leaf.
    pub(crate) fn alias(&mut self, path: &[&str], target: NodeId) -> bool {
        let Some((name, dirs)) = path.split_last() else {
            return false;
        };
        let Some(parent) = self.ensure_dir(dirs) else {
            return false;
        };
        if self.has_child(parent, name) {
            return false;
        }
        self.attach(parent, name, target)
    }

    fn has_child(&self, parent: NodeId, name: &str) -> bool {
        match self.node(parent) {
            Entry::Directory(dir) => dir.child(name).is_some(),
            Entry::Member(_) => true,
        }
    }

    fn attach(&mut self, parent: NodeId, name: &str, child: NodeId) -> bool {
        match self.directory_mut(parent) {
            Some(dir) => {
                dir.children.insert(name.to_string(), child);
                true
            }
            None => false,
        }
    }
}
