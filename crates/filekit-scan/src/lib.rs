//! Directory walking for filekit.
//!
//! This crate provides a depth-first walker over a directory tree with four
//! per-entry actions: concatenating matching files, concatenating every file,
//! listing files by extension and building a [`FileNode`] info tree.
//!
//! # Example
//!
//! ```rust,no_run
//! use filekit_scan::{TreeWalker, WalkConfig};
//!
//! let walker = TreeWalker::new(WalkConfig::new("/srv/site"));
//! let pages = walker.list_by_extension(".html", true).unwrap();
//!
//! for page in pages {
//!     println!("{page}");
//! }
//! ```
//!
//! All walks stop at the first error. The returned [`PartialError`] carries
//! whatever was gathered before the failure.

mod extension;
mod walker;

pub use extension::{extension_without_dot, raw_extension, strip_first};
pub use walker::{
    TreeWalker, WalkResult, load_byte_files, load_bytes_dir, load_files_info, load_list_files,
};

// Re-export core types for convenience
pub use filekit_core::{FileNode, FsError, PartialError, WalkConfig};
