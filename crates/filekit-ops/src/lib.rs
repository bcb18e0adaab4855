//! File operations for filekit.
//!
//! This crate provides synchronous copy, archive and structured-file
//! operations, plus a handful of small path utilities.
//!
//! Copying is best-effort per entry: a failing file is reported in the
//! returned [`CopyReport`] and its siblings are still copied.

mod archive;
mod copy;
mod data;
mod report;
mod util;

pub use archive::{unzip, zipit};
pub use copy::{copy_dir, copy_file, copy_path};
pub use data::{load_data, load_json, load_yaml, save_data, save_json, save_yaml};
pub use report::{CopyReport, OperationError};
pub use util::{
    PRE_RENAME_MARKER, format_timestamp, remove_duplicates, rename_if_exists, timestamp,
    working_dir,
};

pub use filekit_core::{DataFormat, FsError};
