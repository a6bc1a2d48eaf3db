//! Namespace node types

use crate::types::NodeKind;

/// File node representation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileNode {
    pub name: String,
}

/// Directory node representation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectoryNode {
    pub name: String,
    /// Children in insertion order, owned exclusively by this directory
    pub children: Vec<FsNode>,
}

/// Namespace node
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FsNode {
    File(FileNode),
    Directory(DirectoryNode),
}

impl DirectoryNode {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            children: Vec::new(),
        }
    }

    /// Find a direct child by name (exact-match, case-sensitive)
    pub fn child(&self, name: &str) -> Option<&FsNode> {
        self.children.iter().find(|c| c.name() == name)
    }

    pub fn child_mut(&mut self, name: &str) -> Option<&mut FsNode> {
        self.children.iter_mut().find(|c| c.name() == name)
    }
}

impl FsNode {
    pub fn new(name: impl Into<String>, kind: NodeKind) -> Self {
        match kind {
            NodeKind::File => FsNode::File(FileNode { name: name.into() }),
            NodeKind::Directory => FsNode::Directory(DirectoryNode::new(name)),
        }
    }

    pub fn name(&self) -> &str {
        match self {
            FsNode::File(f) => &f.name,
            FsNode::Directory(d) => &d.name,
        }
    }

    pub fn kind(&self) -> NodeKind {
        match self {
            FsNode::File(_) => NodeKind::File,
            FsNode::Directory(_) => NodeKind::Directory,
        }
    }
}
