//! Result types for best-effort operations.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use filekit_core::FsError;

/// An error that occurred on one entry of a best-effort operation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OperationError {
    /// The path that caused the error.
    pub path: PathBuf,
    /// A human-readable error message.
    pub message: String,
}

impl OperationError {
    /// Create a new operation error.
    pub fn new(path: PathBuf, message: impl Into<String>) -> Self {
        Self {
            path,
            message: message.into(),
        }
    }

    /// Record an [`FsError`] against `path`.
    pub fn from_fs(path: PathBuf, error: &FsError) -> Self {
        Self::new(path, error.to_string())
    }
}

impl std::fmt::Display for OperationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.path.display(), self.message)
    }
}

/// Outcome of a copy.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CopyReport {
    /// Number of files copied.
    pub succeeded: usize,
    /// Number of entries that failed.
    pub failed: usize,
    /// Total bytes copied.
    pub bytes_copied: u64,
    /// Errors that occurred.
    pub errors: Vec<OperationError>,
}

impl CopyReport {
    /// Create an empty report.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a copied file.
    pub fn record_file(&mut self, bytes: u64) {
        self.succeeded += 1;
        self.bytes_copied += bytes;
    }

    /// Record a failed entry.
    pub fn record_error(&mut self, error: OperationError) {
        self.failed += 1;
        self.errors.push(error);
    }

    /// Fold a nested report into this one.
    pub fn merge(&mut self, other: CopyReport) {
        self.succeeded += other.succeeded;
        self.failed += other.failed;
        self.bytes_copied += other.bytes_copied;
        self.errors.extend(other.errors);
    }

    /// Check if every entry was copied.
    pub fn is_success(&self) -> bool {
        self.failed == 0
    }

    /// Get a human-readable summary.
    pub fn summary(&self) -> String {
        if self.failed == 0 {
            format!("Copied {} files", self.succeeded)
        } else {
            format!("Copied {} files, {} failed", self.succeeded, self.failed)
        }
    }
}
