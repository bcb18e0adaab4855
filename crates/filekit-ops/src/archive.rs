//! ZIP packing and unpacking.

use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};

use jwalk::{Parallelism, WalkDir};
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipArchive, ZipWriter};

use filekit_core::FsError;

/// Extract every entry of `archive` below `target`.
///
/// Directories are recreated, files are written with the mode stored in the
/// archive (when there is one). Entries whose names would land outside
/// `target` are rejected.
pub fn unzip(archive: impl AsRef<Path>, target: impl AsRef<Path>) -> Result<(), FsError> {
    let (archive_path, target) = (archive.as_ref(), target.as_ref());

    let file = File::open(archive_path).map_err(|e| FsError::io(archive_path, e))?;
    let mut archive = ZipArchive::new(file).map_err(|e| FsError::archive(archive_path, e))?;

    fs::create_dir_all(target).map_err(|e| FsError::io(target, e))?;

    // Directory modes are applied last so read-only directories can still
    // receive their contents.
    let mut dir_modes: Vec<(PathBuf, u32)> = Vec::new();

    for index in 0..archive.len() {
        let mut entry = archive
            .by_index(index)
            .map_err(|e| FsError::archive(archive_path, e))?;

        let Some(relative) = entry.enclosed_name() else {
            return Err(FsError::archive(
                archive_path,
                format!("entry escapes target directory: {}", entry.name()),
            ));
        };
        let path = target.join(relative);
        let mode = entry.unix_mode();

        if entry.is_dir() {
            fs::create_dir_all(&path).map_err(|e| FsError::io(&path, e))?;
            if let Some(mode) = mode {
                dir_modes.push((path, mode));
            }
            continue;
        }

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| FsError::io(parent, e))?;
        }
        let mut out = File::create(&path).map_err(|e| FsError::io(&path, e))?;
        io::copy(&mut entry, &mut out).map_err(|e| FsError::io(&path, e))?;

        if let Some(mode) = mode {
            apply_mode(&path, mode)?;
        }
        tracing::debug!(path = %path.display(), "extracted");
    }

    for (dir, mode) in dir_modes.into_iter().rev() {
        apply_mode(&dir, mode)?;
    }
    Ok(())
}

/// Pack a directory or a single file into a new ZIP archive at `target`.
///
/// For a directory, every entry name is prefixed with the directory's own
/// name and directories are stored as `name/`. Files are deflated.
pub fn zipit(source: impl AsRef<Path>, target: impl AsRef<Path>) -> Result<(), FsError> {
    let (source, target) = (source.as_ref(), target.as_ref());

    let metadata = fs::metadata(source).map_err(|e| FsError::io(source, e))?;
    let base_dir = if metadata.is_dir() {
        let absolute = std::path::absolute(source).map_err(|e| FsError::io(source, e))?;
        Some(
            absolute
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default(),
        )
    } else {
        None
    };

    let file = File::create(target).map_err(|e| FsError::io(target, e))?;
    let mut archive = ZipWriter::new(file);

    let Some(base_dir) = base_dir else {
        let name = source
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        add_file(&mut archive, target, source, name, unix_mode(&metadata))?;
        archive.finish().map_err(|e| FsError::archive(target, e))?;
        return Ok(());
    };

    // Symlinks are archived as what they point to: linked directories are
    // descended and linked files contribute their target's bytes.
    let walker = WalkDir::new(source)
        .parallelism(Parallelism::Serial)
        .skip_hidden(false)
        .follow_links(true)
        .sort(true);

    for entry_result in walker {
        let entry = match entry_result {
            Ok(entry) => entry,
            Err(err) if err.loop_ancestor().is_some() => {
                tracing::warn!(error = %err, "skipping symlink cycle");
                continue;
            }
            Err(err) => return Err(walk_error(source, err)),
        };

        let path = entry.path();
        let metadata = fs::metadata(&path).map_err(|e| FsError::io(&path, e))?;
        let mode = unix_mode(&metadata);
        let name = entry_name(&base_dir, path.strip_prefix(source).unwrap_or(&path));

        if entry.file_type().is_dir() {
            let options = SimpleFileOptions::default()
                .compression_method(CompressionMethod::Stored)
                .unix_permissions(mode);
            archive
                .add_directory(format!("{name}/"), options)
                .map_err(|e| FsError::archive(target, e))?;
        } else {
            add_file(&mut archive, target, &path, name, mode)?;
        }
    }

    archive.finish().map_err(|e| FsError::archive(target, e))?;
    Ok(())
}

/// Append one deflated file entry.
fn add_file(
    archive: &mut ZipWriter<File>,
    target: &Path,
    path: &Path,
    name: String,
    mode: u32,
) -> Result<(), FsError> {
    let options = SimpleFileOptions::default()
        .compression_method(CompressionMethod::Deflated)
        .unix_permissions(mode);
    archive
        .start_file(name, options)
        .map_err(|e| FsError::archive(target, e))?;

    let mut input = File::open(path).map_err(|e| FsError::io(path, e))?;
    io::copy(&mut input, archive).map_err(|e| FsError::io(path, e))?;
    tracing::debug!(path = %path.display(), "added to archive");
    Ok(())
}

/// Convert a jwalk error, keeping the underlying I/O error kind.
fn walk_error(source: &Path, err: jwalk::Error) -> FsError {
    let path = err
        .path()
        .map(Path::to_path_buf)
        .unwrap_or_else(|| source.to_path_buf());
    let kind = err.io_error().map_or(io::ErrorKind::Other, io::Error::kind);
    FsError::io(path, io::Error::new(kind, err.to_string()))
}

/// Build an archive entry name: `base` followed by the components of
/// `relative`, all joined with `/`.
fn entry_name(base: &str, relative: &Path) -> String {
    let mut name = base.to_string();
    for component in relative.components() {
        if !name.is_empty() {
            name.push('/');
        }
        name.push_str(&component.as_os_str().to_string_lossy());
    }
    name
}

#[cfg(unix)]
fn unix_mode(metadata: &fs::Metadata) -> u32 {
    use std::os::unix::fs::PermissionsExt;
    metadata.permissions().mode() & 0o7777
}

#[cfg(not(unix))]
fn unix_mode(metadata: &fs::Metadata) -> u32 {
    match (metadata.is_dir(), metadata.permissions().readonly()) {
        (true, _) => 0o755,
        (false, true) => 0o444,
        (false, false) => 0o644,
    }
}

#[cfg(unix)]
fn apply_mode(path: &Path, mode: u32) -> Result<(), FsError> {
    use std::os::unix::fs::PermissionsExt;
    fs::set_permissions(path, fs::Permissions::from_mode(mode & 0o7777))
        .map_err(|e| FsError::io(path, e))
}

#[cfg(not(unix))]
fn apply_mode(_path: &Path, _mode: u32) -> Result<(), FsError> {
    Ok(())
}
