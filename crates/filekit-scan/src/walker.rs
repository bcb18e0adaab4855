//! Depth-first directory walker built on jwalk.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use jwalk::{Parallelism, WalkDir};

use filekit_core::{FileNode, FsError, PartialError, WalkConfig};

use crate::extension::{extension_without_dot, raw_extension, strip_first};

/// Result of a fail-fast walk: the aggregate, or the first error together
/// with whatever had been aggregated before it.
pub type WalkResult<T> = Result<T, PartialError<T>>;

/// A single walk entry, classified at the time it was listed.
#[derive(Debug)]
struct Entry {
    /// Depth below the root (top-level entries are at depth 1).
    depth: usize,
    name: String,
    path: PathBuf,
    is_dir: bool,
}

/// Recursive walker over a directory tree.
///
/// Every operation descends into all subdirectories with no depth limit
/// and stops at the first error.
#[derive(Debug, Clone)]
pub struct TreeWalker {
    config: WalkConfig,
}

impl TreeWalker {
    /// Create a walker for the given configuration.
    pub fn new(config: WalkConfig) -> Self {
        Self { config }
    }

    /// The configuration this walker uses.
    pub fn config(&self) -> &WalkConfig {
        &self.config
    }

    /// Concatenate the contents of every file whose name ends with `suffix`.
    pub fn concat_matching(&self, suffix: &str) -> WalkResult<Vec<u8>> {
        self.concat_files(|name| name.ends_with(suffix))
    }

    /// Concatenate the contents of every non-directory entry.
    pub fn concat_all(&self) -> WalkResult<Vec<u8>> {
        self.concat_files(|_| true)
    }

    /// List files whose extension equals `ext` (e.g. `".html"`).
    ///
    /// Entries are paths relative to the root joined with `/`. With
    /// `strip`, the first occurrence of `ext` in each file name is removed.
    pub fn list_by_extension(&self, ext: &str, strip: bool) -> WalkResult<Vec<String>> {
        let root = &self.config.root;
        tracing::debug!(root = %root.display(), ext, strip, "listing files");

        let mut list = Vec::new();
        if let Err(e) = self.check_dir_root() {
            return Err(PartialError::new(list, e));
        }

        for entry in self.entries() {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => return Err(PartialError::new(list, e)),
            };
            if entry.is_dir || raw_extension(&entry.name) != ext {
                continue;
            }

            let name = if strip {
                strip_first(&entry.name, ext)
            } else {
                entry.name
            };
            match parent_prefix(root, &entry.path) {
                prefix if prefix.is_empty() => list.push(name),
                prefix => list.push(format!("{prefix}/{name}")),
            }
        }
        Ok(list)
    }

    /// Build a tree of [`FileNode`]s mirroring the directory hierarchy.
    ///
    /// Returns the top-level entries of the root. On error the partial
    /// tree includes the directories that were still being filled.
    pub fn file_info_tree(&self) -> WalkResult<Vec<FileNode>> {
        let root = &self.config.root;
        tracing::debug!(root = %root.display(), "building info tree");

        let mut builder = TreeBuilder::default();
        if let Err(e) = self.check_dir_root() {
            return Err(PartialError::new(builder.finish(), e));
        }

        for entry in self.entries() {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => return Err(PartialError::new(builder.finish(), e)),
            };

            let absolute = match std::path::absolute(&entry.path) {
                Ok(absolute) => absolute,
                Err(e) => {
                    let err = FsError::io(&entry.path, e);
                    return Err(PartialError::new(builder.finish(), err));
                }
            };
            let relative = relative_path(root, &entry.path);

            builder.close_to(entry.depth - 1);
            if entry.is_dir {
                builder.open.push(DirFrame {
                    name: entry.name,
                    relative,
                    absolute,
                    children: Vec::new(),
                });
            } else {
                let extension = extension_without_dot(&entry.name).to_string();
                builder.push(FileNode::new_file(entry.name, relative, absolute, extension));
            }
        }
        Ok(builder.finish())
    }

    fn concat_files(&self, filter: impl Fn(&str) -> bool) -> WalkResult<Vec<u8>> {
        let root = &self.config.root;
        tracing::debug!(root = %root.display(), "concatenating files");

        let mut bytes = Vec::new();
        let metadata = match fs::metadata(root) {
            Ok(metadata) => metadata,
            Err(e) => return Err(PartialError::new(bytes, FsError::io(root, e))),
        };

        if !metadata.is_dir() {
            let name = root
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default();
            if filter(&name) {
                if let Err(e) = append_file(root, &mut bytes) {
                    return Err(PartialError::new(bytes, e));
                }
            }
            return Ok(bytes);
        }

        for entry in self.entries() {
            let result = entry.and_then(|entry| {
                if !entry.is_dir && filter(&entry.name) {
                    append_file(&entry.path, &mut bytes)
                } else {
                    Ok(())
                }
            });
            if let Err(e) = result {
                return Err(PartialError::new(bytes, e));
            }
        }
        Ok(bytes)
    }

    /// Stream the entries below the root in depth-first order.
    ///
    /// Symlink loops are reported by jwalk and skipped; any other error is
    /// yielded so the caller can stop.
    fn entries(&self) -> impl Iterator<Item = Result<Entry, FsError>> + '_ {
        let root = &self.config.root;

        WalkDir::new(root)
            .parallelism(Parallelism::Serial)
            .skip_hidden(false)
            .follow_links(self.config.follow_symlinks)
            .sort(self.config.sort_entries)
            .min_depth(1)
            .into_iter()
            .filter_map(move |result| match result {
                Ok(entry) => Some(Ok(Entry {
                    depth: entry.depth(),
                    name: entry.file_name().to_string_lossy().into_owned(),
                    is_dir: entry.file_type().is_dir(),
                    path: entry.path(),
                })),
                Err(err) if err.loop_ancestor().is_some() => {
                    tracing::warn!(error = %err, "skipping symlink cycle");
                    None
                }
                Err(err) => Some(Err(walk_error(root, err))),
            })
    }

    /// Make sure the root exists and is a directory.
    fn check_dir_root(&self) -> Result<(), FsError> {
        let root = &self.config.root;
        let metadata = fs::metadata(root).map_err(|e| FsError::io(root, e))?;
        if !metadata.is_dir() {
            return Err(FsError::NotADirectory { path: root.clone() });
        }
        Ok(())
    }
}

/// A directory whose children are still being collected.
#[derive(Debug)]
struct DirFrame {
    name: String,
    relative: String,
    absolute: PathBuf,
    children: Vec<FileNode>,
}

/// Assembles nodes from a depth-first entry stream.
#[derive(Debug, Default)]
struct TreeBuilder {
    top: Vec<FileNode>,
    open: Vec<DirFrame>,
}

impl TreeBuilder {
    /// Close directories until only `depth` remain open.
    fn close_to(&mut self, depth: usize) {
        while self.open.len() > depth {
            let Some(frame) = self.open.pop() else { break };
            let node = FileNode::new_directory(
                frame.name,
                frame.relative,
                frame.absolute,
                frame.children,
            );
            self.push(node);
        }
    }

    fn push(&mut self, node: FileNode) {
        match self.open.last_mut() {
            Some(parent) => parent.children.push(node),
            None => self.top.push(node),
        }
    }

    fn finish(mut self) -> Vec<FileNode> {
        self.close_to(0);
        self.top
    }
}

/// Path of `path` relative to `root`, joined with `/`.
fn relative_path(root: &Path, path: &Path) -> String {
    let relative = path.strip_prefix(root).unwrap_or(path);
    relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

/// Relative path of the directory containing `path`.
fn parent_prefix(root: &Path, path: &Path) -> String {
    path.parent()
        .map(|parent| relative_path(root, parent))
        .unwrap_or_default()
}

/// Convert a jwalk error, keeping the underlying I/O error kind.
fn walk_error(root: &Path, err: jwalk::Error) -> FsError {
    let path = err
        .path()
        .map(Path::to_path_buf)
        .unwrap_or_else(|| root.to_path_buf());
    let kind = err.io_error().map_or(io::ErrorKind::Other, io::Error::kind);
    FsError::io(path, io::Error::new(kind, err.to_string()))
}

fn append_file(path: &Path, bytes: &mut Vec<u8>) -> Result<(), FsError> {
    let contents = fs::read(path).map_err(|e| FsError::io(path, e))?;
    tracing::debug!(path = %path.display(), len = contents.len(), "read file");
    bytes.extend_from_slice(&contents);
    Ok(())
}

/// Concatenate every file under `root` whose name ends with `suffix`.
pub fn load_byte_files(root: impl Into<PathBuf>, suffix: &str) -> WalkResult<Vec<u8>> {
    TreeWalker::new(WalkConfig::new(root)).concat_matching(suffix)
}

/// Concatenate every file under `root`.
pub fn load_bytes_dir(root: impl Into<PathBuf>) -> WalkResult<Vec<u8>> {
    TreeWalker::new(WalkConfig::new(root)).concat_all()
}

/// List files under `root` with extension `ext`, optionally stripping it.
///
/// `load_list_files("/srv/site", ".html", true)` yields entries such as
/// `"index"` and `"blog/post"`.
pub fn load_list_files(
    root: impl Into<PathBuf>,
    ext: &str,
    strip: bool,
) -> WalkResult<Vec<String>> {
    TreeWalker::new(WalkConfig::new(root)).list_by_extension(ext, strip)
}

/// Build the info tree of `root`.
pub fn load_files_info(root: impl Into<PathBuf>) -> WalkResult<Vec<FileNode>> {
    TreeWalker::new(WalkConfig::new(root)).file_info_tree()
}
