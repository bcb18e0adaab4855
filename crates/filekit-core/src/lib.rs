//! Core types for filekit.
//!
//! This crate provides the data structures shared by the walker and the
//! operations crates: file nodes, walk configuration and the error taxonomy.

mod config;
mod error;
mod node;

pub use config::{TIMESTAMP_FORMAT, WalkConfig, WalkConfigBuilder};
pub use error::{BoxError, DataFormat, FsError, PartialError};
pub use node::FileNode;
