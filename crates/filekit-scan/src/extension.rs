//! File name extension helpers.
//!
//! These operate on the raw file name rather than [`std::path::Path::extension`]
//! so that names like `.bashrc` report `.bashrc` as their extension.

/// Extension of `name` including the leading dot, or `""` if there is none.
///
/// The extension is everything from the last `.` to the end of the name.
pub fn raw_extension(name: &str) -> &str {
    match name.rfind(['.', '/']) {
        Some(idx) if name.as_bytes()[idx] == b'.' => &name[idx..],
        _ => "",
    }
}

/// Extension of `name` without the leading dot.
pub fn extension_without_dot(name: &str) -> &str {
    raw_extension(name).strip_prefix('.').unwrap_or("")
}

/// Remove the first occurrence of `ext` from `name`.
///
/// This is a substring replacement, not a suffix trim: `v.js.map` with
/// `.js` becomes `v.map`.
pub fn strip_first(name: &str, ext: &str) -> String {
    if ext.is_empty() {
        return name.to_string();
    }
    name.replacen(ext, "", 1)
}
