//! File and directory node types.

use std::path::{Path, PathBuf};

use compact_str::CompactString;
use serde::{Deserialize, Serialize};

/// A single file or directory in an info tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileNode {
    /// File/directory name (not full path).
    pub name: CompactString,

    /// Path relative to the walk root, joined with `/`.
    pub path: String,

    /// Absolute path resolved when the entry was visited.
    pub absolute_path: PathBuf,

    /// Extension without the leading dot; empty for directories.
    pub extension: CompactString,

    /// Whether this node is a directory.
    pub is_dir: bool,

    /// Children nodes (directories only), in traversal order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<FileNode>,
}

impl FileNode {
    /// Create a new file node.
    pub fn new_file(
        name: impl Into<CompactString>,
        path: impl Into<String>,
        absolute_path: impl Into<PathBuf>,
        extension: impl Into<CompactString>,
    ) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
            absolute_path: absolute_path.into(),
            extension: extension.into(),
            is_dir: false,
            children: Vec::new(),
        }
    }

    /// Create a new directory node holding `children`.
    pub fn new_directory(
        name: impl Into<CompactString>,
        path: impl Into<String>,
        absolute_path: impl Into<PathBuf>,
        children: Vec<FileNode>,
    ) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
            absolute_path: absolute_path.into(),
            extension: CompactString::default(),
            is_dir: true,
            children,
        }
    }

    /// Check if this node is a directory.
    pub fn is_dir(&self) -> bool {
        self.is_dir
    }

    /// Check if this node is a file.
    pub fn is_file(&self) -> bool {
        !self.is_dir
    }

    /// Get the number of direct children.
    pub fn child_count(&self) -> usize {
        self.children.len()
    }

    /// Count files in this subtree (1 for a file node).
    pub fn file_count(&self) -> usize {
        if self.is_dir {
            self.children.iter().map(FileNode::file_count).sum()
        } else {
            1
        }
    }

    /// Find a descendant by its path relative to this node.
    pub fn find(&self, relative: impl AsRef<Path>) -> Option<&FileNode> {
        let mut current = self;
        for component in relative.as_ref().components() {
            let name = component.as_os_str().to_str()?;
            current = current.children.iter().find(|c| c.name == name)?;
        }
        Some(current)
    }
}
