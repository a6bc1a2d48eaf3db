//! Tree Store
//!
//! The in-memory hierarchical namespace of files and directories, rooted at
//! `/`. This is the single shared mutable resource contended by all workers;
//! synchronization lives outside it (see [`crate::sync`]), so every operation
//! here takes plain `&self`/`&mut self`.

pub mod node;

use crate::error::ApplyError;
use crate::types::NodeKind;
use self::node::{DirectoryNode, FsNode};
use std::io::{self, Write};

/// In-memory namespace tree
///
/// Paths are absolute, `/`-delimited and case-sensitive; empty segments are
/// ignored, so `/a//b` and `/a/b/` name the same node. The root directory
/// pre-exists and cannot be created or deleted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeStore {
    root: DirectoryNode,
}

impl Default for TreeStore {
    fn default() -> Self {
        Self::new()
    }
}

impl TreeStore {
    pub fn new() -> Self {
        Self {
            root: DirectoryNode::new("/"),
        }
    }

    fn segments(path: &str) -> Vec<&str> {
        path.split('/').filter(|s| !s.is_empty()).collect()
    }

    /// Walk `segments` from the root, descending only through directories
    fn resolve_dir(&self, segments: &[&str]) -> Option<&DirectoryNode> {
        let mut dir = &self.root;
        for segment in segments {
            match dir.child(segment) {
                Some(FsNode::Directory(next)) => dir = next,
                _ => return None,
            }
        }
        Some(dir)
    }

    fn resolve_dir_mut(&mut self, segments: &[&str]) -> Option<&mut DirectoryNode> {
        let mut dir = &mut self.root;
        for segment in segments {
            match dir.child_mut(segment) {
                Some(FsNode::Directory(next)) => dir = next,
                _ => return None,
            }
        }
        Some(dir)
    }

    /// Create a file or directory at `path`.
    ///
    /// Fails with `NotFound` if an intermediate segment is missing or is a
    /// file, and with `AlreadyExists` if the final segment is already taken.
    /// A failed create leaves the tree unchanged.
    pub fn create(&mut self, path: &str, kind: NodeKind) -> Result<(), ApplyError> {
        let segments = Self::segments(path);
        let Some((leaf, parents)) = segments.split_last() else {
            // The root itself
            return Err(ApplyError::AlreadyExists(path.to_string()));
        };
        let dir = self
            .resolve_dir_mut(parents)
            .ok_or_else(|| ApplyError::NotFound(path.to_string()))?;
        if dir.child(leaf).is_some() {
            return Err(ApplyError::AlreadyExists(path.to_string()));
        }
        dir.children.push(FsNode::new(*leaf, kind));
        Ok(())
    }

    /// Resolve `path` and report the kind of the node it names.
    ///
    /// Side-effect free.
    pub fn lookup(&self, path: &str) -> Result<NodeKind, ApplyError> {
        let segments = Self::segments(path);
        let Some((leaf, parents)) = segments.split_last() else {
            return Ok(NodeKind::Directory);
        };
        self.resolve_dir(parents)
            .and_then(|dir| dir.child(leaf))
            .map(FsNode::kind)
            .ok_or_else(|| ApplyError::NotFound(path.to_string()))
    }

    /// Delete the node at `path`, detaching its entire subtree.
    ///
    /// Directories are removed recursively regardless of content. Fails with
    /// `NotFound` if any segment is missing; the root is not deletable.
    pub fn delete(&mut self, path: &str) -> Result<(), ApplyError> {
        let segments = Self::segments(path);
        let Some((leaf, parents)) = segments.split_last() else {
            return Err(ApplyError::NotFound(path.to_string()));
        };
        let dir = self
            .resolve_dir_mut(parents)
            .ok_or_else(|| ApplyError::NotFound(path.to_string()))?;
        let index = dir
            .children
            .iter()
            .position(|c| c.name() == *leaf)
            .ok_or_else(|| ApplyError::NotFound(path.to_string()))?;
        // Dropping the detached node releases the whole subtree
        dir.children.remove(index);
        Ok(())
    }

    /// Write a deterministic textual dump of the tree to `sink`.
    ///
    /// Depth-first, children in insertion order, two-space indentation per
    /// level; directory names carry a trailing `/`. Equal trees produce
    /// byte-identical dumps.
    pub fn serialize<W: Write>(&self, sink: &mut W) -> io::Result<()> {
        writeln!(sink, "/")?;
        for child in &self.root.children {
            Self::serialize_node(child, 1, sink)?;
        }
        Ok(())
    }

    fn serialize_node<W: Write>(node: &FsNode, depth: usize, sink: &mut W) -> io::Result<()> {
        let indent = "  ".repeat(depth);
        match node {
            FsNode::File(file) => writeln!(sink, "{}{}", indent, file.name)?,
            FsNode::Directory(dir) => {
                writeln!(sink, "{}{}/", indent, dir.name)?;
                for child in &dir.children {
                    Self::serialize_node(child, depth + 1, sink)?;
                }
            }
        }
        Ok(())
    }

    /// Render the dump into a `String`
    pub fn render(&self) -> String {
        let mut buf = Vec::new();
        self.serialize(&mut buf)
            .expect("writing to an in-memory buffer cannot fail");
        String::from_utf8(buf).expect("tree dump is valid UTF-8")
    }
}
