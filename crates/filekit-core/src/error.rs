//! Error types for filesystem operations.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use strum::Display;
use thiserror::Error;

/// Boxed error from a serializer or archive backend.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Structured file formats understood by the load/save helpers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Serialize, Deserialize)]
pub enum DataFormat {
    #[strum(serialize = "JSON")]
    Json,
    #[strum(serialize = "YAML")]
    Yaml,
}

impl DataFormat {
    /// Guess the format from a path's extension (`json`, `yaml`, `yml`).
    pub fn from_path(path: &Path) -> Option<Self> {
        match path.extension()?.to_str()? {
            "json" => Some(Self::Json),
            "yaml" | "yml" => Some(Self::Yaml),
            _ => None,
        }
    }
}

/// Errors that can occur during filesystem operations.
#[derive(Debug, Error)]
pub enum FsError {
    /// Permission denied for a path.
    #[error("Permission denied: {path}")]
    PermissionDenied { path: PathBuf },

    /// Path not found.
    #[error("Path not found: {path}")]
    NotFound { path: PathBuf },

    /// Generic I/O error (read, write, copy).
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Malformed structured data.
    #[error("Failed to decode {format} from {path}: {source}")]
    Decode {
        path: PathBuf,
        format: DataFormat,
        #[source]
        source: BoxError,
    },

    /// Value could not be serialized.
    #[error("Failed to encode {format} for {path}: {source}")]
    Encode {
        path: PathBuf,
        format: DataFormat,
        #[source]
        source: BoxError,
    },

    /// ZIP container error.
    #[error("Archive error at {path}: {source}")]
    Archive {
        path: PathBuf,
        #[source]
        source: BoxError,
    },

    /// Path was expected to be a directory.
    #[error("Not a directory: {path}")]
    NotADirectory { path: PathBuf },

    /// Invalid configuration.
    #[error("Invalid configuration: {message}")]
    InvalidConfig { message: String },
}

impl FsError {
    /// Create an I/O error with path context.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        let path = path.into();
        match source.kind() {
            std::io::ErrorKind::PermissionDenied => Self::PermissionDenied { path },
            std::io::ErrorKind::NotFound => Self::NotFound { path },
            _ => Self::Io { path, source },
        }
    }

    /// Create an archive error with path context.
    pub fn archive(path: impl Into<PathBuf>, source: impl Into<BoxError>) -> Self {
        Self::Archive {
            path: path.into(),
            source: source.into(),
        }
    }

    /// The path this error refers to, if any.
    pub fn path(&self) -> Option<&Path> {
        match self {
            Self::PermissionDenied { path }
            | Self::NotFound { path }
            | Self::Io { path, .. }
            | Self::Decode { path, .. }
            | Self::Encode { path, .. }
            | Self::Archive { path, .. }
            | Self::NotADirectory { path } => Some(path),
            Self::InvalidConfig { .. } => None,
        }
    }

    /// Check if this is a not-found error.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

/// A fail-fast traversal error together with whatever was aggregated
/// before the failure.
#[derive(Debug, Error)]
#[error("{source}")]
pub struct PartialError<T> {
    /// Result built up to the point of failure.
    pub partial: T,
    /// The error that stopped the traversal.
    #[source]
    pub source: FsError,
}

impl<T> PartialError<T> {
    pub fn new(partial: T, source: FsError) -> Self {
        Self { partial, source }
    }

    /// Drop the partial result and keep the error.
    pub fn into_error(self) -> FsError {
        self.source
    }
}

impl<T> From<PartialError<T>> for FsError {
    fn from(err: PartialError<T>) -> Self {
        err.source
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fs_error_io_classification() {
        let err = FsError::io(
            "/test/path",
            std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        );
        assert!(matches!(err, FsError::PermissionDenied { .. }));

        let err = FsError::io(
            "/test/path",
            std::io::Error::new(std::io::ErrorKind::NotFound, "missing"),
        );
        assert!(err.is_not_found());

        let err = FsError::io("/test/path", std::io::Error::other("boom"));
        assert!(matches!(err, FsError::Io { .. }));
        assert_eq!(err.path(), Some(Path::new("/test/path")));
    }

    #[test]
    fn test_data_format_from_path() {
        assert_eq!(DataFormat::from_path(Path::new("a.json")), Some(DataFormat::Json));
        assert_eq!(DataFormat::from_path(Path::new("a.yml")), Some(DataFormat::Yaml));
        assert_eq!(DataFormat::from_path(Path::new("a.yaml")), Some(DataFormat::Yaml));
        assert_eq!(DataFormat::from_path(Path::new("a.toml")), None);
        assert_eq!(DataFormat::from_path(Path::new("noext")), None);
        assert_eq!(DataFormat::Yaml.to_string(), "YAML");
    }

    #[test]
    fn test_partial_error_keeps_partial() {
        let err = PartialError::new(vec![1u8, 2], FsError::NotFound { path: "/x".into() });
        assert_eq!(err.partial, vec![1, 2]);
        assert!(err.to_string().contains("/x"));
        assert!(FsError::from(err).is_not_found());
    }
}
