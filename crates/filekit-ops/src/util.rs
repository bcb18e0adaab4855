//! Small path and collection utilities.

use std::ffi::OsString;
use std::fmt::Display;
use std::hash::Hash;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Local, TimeZone};
use indexmap::IndexSet;

use filekit_core::{FsError, TIMESTAMP_FORMAT};

/// Marker placed between a path and its timestamp by [`rename_if_exists`].
pub const PRE_RENAME_MARKER: &str = "-Pre-";

/// Remove duplicates, keeping the first occurrence of each element.
pub fn remove_duplicates<T, I>(elements: I) -> Vec<T>
where
    I: IntoIterator<Item = T>,
    T: Eq + Hash,
{
    elements
        .into_iter()
        .collect::<IndexSet<T>>()
        .into_iter()
        .collect()
}

/// Current local time formatted with [`TIMESTAMP_FORMAT`].
pub fn timestamp() -> String {
    format_timestamp(&Local::now())
}

/// Format a point in time with [`TIMESTAMP_FORMAT`].
pub fn format_timestamp<Tz>(time: &DateTime<Tz>) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    time.format(TIMESTAMP_FORMAT).to_string()
}

/// Move `path` aside to `<path>-Pre-<timestamp>`.
///
/// Returns the new path, or `None` if there was nothing at `path`.
pub fn rename_if_exists(path: impl AsRef<Path>) -> Result<Option<PathBuf>, FsError> {
    let path = path.as_ref();

    let mut renamed = OsString::from(path.as_os_str());
    renamed.push(PRE_RENAME_MARKER);
    renamed.push(timestamp());
    let renamed = PathBuf::from(renamed);

    match std::fs::rename(path, &renamed) {
        Ok(()) => {
            tracing::debug!(from = %path.display(), to = %renamed.display(), "renamed");
            Ok(Some(renamed))
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(FsError::io(path, e)),
    }
}

/// The current working directory.
pub fn working_dir() -> Result<PathBuf, FsError> {
    std::env::current_dir().map_err(|e| FsError::io(".", e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{FixedOffset, Utc};
    use tempfile::TempDir;

    #[test]
    fn test_remove_duplicates_keeps_first() {
        let deduped = remove_duplicates(vec!["a", "b", "a", "c", "b"]);
        assert_eq!(deduped, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_remove_duplicates_empty_and_owned() {
        assert!(remove_duplicates(Vec::<String>::new()).is_empty());

        let owned = vec!["x".to_string(), "x".to_string()];
        assert_eq!(remove_duplicates(owned), vec!["x".to_string()]);
    }

    #[test]
    fn test_format_timestamp_layout() {
        let time = Utc.with_ymd_and_hms(2015, 3, 7, 9, 4, 5).unwrap();
        assert_eq!(format_timestamp(&time), "Mar-07-2015_09-04-05-+0000");

        let offset = FixedOffset::east_opt(2 * 3600).unwrap();
        let time = offset.with_ymd_and_hms(2024, 12, 31, 23, 59, 0).unwrap();
        assert_eq!(format_timestamp(&time), "Dec-31-2024_23-59-00-+0200");
    }

    #[test]
    fn test_rename_if_exists_moves_file() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("config.yaml");
        std::fs::write(&path, b"a: 1").unwrap();

        let renamed = rename_if_exists(&path).unwrap().unwrap();
        assert!(!path.exists());
        assert!(renamed.exists());

        let name = renamed.file_name().unwrap().to_string_lossy().into_owned();
        assert!(name.starts_with("config.yaml-Pre-"));
    }

    #[test]
    fn test_rename_if_exists_missing_is_none() {
        let tmp = TempDir::new().unwrap();
        assert!(rename_if_exists(tmp.path().join("absent")).unwrap().is_none());
    }

    #[test]
    fn test_working_dir_is_absolute() {
        assert!(working_dir().unwrap().is_absolute());
    }
}
