//! Recursive file and directory copy.

use std::fs::{self, File};
use std::io;
use std::path::Path;

use filekit_core::FsError;

use crate::report::{CopyReport, OperationError};

/// Copy a single file, then give the destination the source's permissions.
///
/// The source must be a regular file; the destination is only created or
/// truncated once that is known. Returns the number of bytes
/// copied.
pub fn copy_file(src: impl AsRef<Path>, dst: impl AsRef<Path>) -> Result<u64, FsError> {
    let (src, dst) = (src.as_ref(), dst.as_ref());

    let mut source = File::open(src).map_err(|e| FsError::io(src, e))?;
    let metadata = source.metadata().map_err(|e| FsError::io(src, e))?;
    if !metadata.is_file() {
        let err = io::Error::new(io::ErrorKind::InvalidInput, "not a regular file");
        return Err(FsError::io(src, err));
    }

    let mut dest = File::create(dst).map_err(|e| FsError::io(dst, e))?;
    let bytes = io::copy(&mut source, &mut dest).map_err(|e| FsError::io(dst, e))?;
    fs::set_permissions(dst, metadata.permissions()).map_err(|e| FsError::io(dst, e))?;

    Ok(bytes)
}

/// Recursively copy a directory.
///
/// The destination (and any missing parents) is created with the source's
/// mode. Failures on individual entries are logged and recorded in the
/// report; the remaining entries are still copied. Only a failure to read
/// the source or create the destination is returned as an error.
pub fn copy_dir(src: impl AsRef<Path>, dst: impl AsRef<Path>) -> Result<CopyReport, FsError> {
    let (src, dst) = (src.as_ref(), dst.as_ref());

    let metadata = fs::metadata(src).map_err(|e| FsError::io(src, e))?;
    if !metadata.is_dir() {
        return Err(FsError::NotADirectory {
            path: src.to_path_buf(),
        });
    }
    create_dir_like(dst, &metadata)?;

    let entries = fs::read_dir(src).map_err(|e| FsError::io(src, e))?;
    let mut report = CopyReport::new();

    for entry in entries {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                let err = FsError::io(src, e);
                tracing::warn!(path = %src.display(), error = %err, "failed to read entry");
                report.record_error(OperationError::from_fs(src.to_path_buf(), &err));
                continue;
            }
        };

        let path = entry.path();
        let dest_path = dst.join(entry.file_name());
        let is_dir = entry.file_type().is_ok_and(|t| t.is_dir());

        let result = if is_dir {
            copy_dir(&path, &dest_path).map(|nested| report.merge(nested))
        } else {
            copy_file(&path, &dest_path).map(|bytes| report.record_file(bytes))
        };

        if let Err(err) = result {
            tracing::warn!(path = %path.display(), error = %err, "failed to copy entry");
            report.record_error(OperationError::from_fs(path, &err));
        }
    }

    tracing::debug!(
        src = %src.display(),
        dst = %dst.display(),
        succeeded = report.succeeded,
        failed = report.failed,
        "copied directory"
    );
    Ok(report)
}

/// Copy a file or a directory tree.
pub fn copy_path(src: impl AsRef<Path>, dst: impl AsRef<Path>) -> Result<CopyReport, FsError> {
    let (src, dst) = (src.as_ref(), dst.as_ref());

    let metadata = fs::metadata(src).map_err(|e| FsError::io(src, e))?;
    if metadata.is_dir() {
        copy_dir(src, dst)
    } else {
        let mut report = CopyReport::new();
        report.record_file(copy_file(src, dst)?);
        Ok(report)
    }
}

/// Create `dir` and its missing parents with the mode of `like`.
fn create_dir_like(dir: &Path, like: &fs::Metadata) -> Result<(), FsError> {
    let mut builder = fs::DirBuilder::new();
    builder.recursive(true);

    #[cfg(unix)]
    {
        use std::os::unix::fs::{DirBuilderExt, PermissionsExt};
        builder.mode(like.permissions().mode());
    }
    #[cfg(not(unix))]
    let _ = like;

    builder.create(dir).map_err(|e| FsError::io(dir, e))
}
