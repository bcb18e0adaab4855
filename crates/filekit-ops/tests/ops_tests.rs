use filekit_ops::{
    FsError, copy_dir, load_json, load_yaml, remove_duplicates, save_json, save_yaml, unzip,
    zipit,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct Manifest {
    name: String,
    version: u32,
    tags: Vec<String>,
    settings: BTreeMap<String, bool>,
    parent: Option<String>,
}

fn sample_manifest() -> Manifest {
    let mut settings = BTreeMap::new();
    settings.insert("minify".to_string(), true);
    settings.insert("watch".to_string(), false);
    Manifest {
        name: "site".to_string(),
        version: 3,
        tags: vec!["web".to_string(), "static".to_string()],
        settings,
        parent: None,
    }
}

fn write(root: &Path, rel: &str, contents: &[u8]) {
    let path = root.join(rel);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, contents).unwrap();
}

#[test]
fn test_json_round_trip() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("manifest.json");
    let manifest = sample_manifest();

    save_json(&path, &manifest).unwrap();
    let loaded: Manifest = load_json(&path).unwrap();
    assert_eq!(loaded, manifest);
}

#[test]
fn test_yaml_round_trip() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("manifest.yaml");
    let manifest = sample_manifest();

    save_yaml(&path, &manifest).unwrap();
    let loaded: Manifest = load_yaml(&path).unwrap();
    assert_eq!(loaded, manifest);
}

#[test]
fn test_save_json_to_missing_directory_fails() {
    let tmp = TempDir::new().unwrap();
    let err = save_json(tmp.path().join("no/such/dir.json"), &sample_manifest()).unwrap_err();
    assert!(err.is_not_found());
}

#[test]
fn test_copy_dir_copies_tree() {
    let tmp = TempDir::new().unwrap();
    let src = tmp.path().join("src");
    write(&src, "a.txt", b"alpha");
    write(&src, "nested/b.txt", b"beta");
    write(&src, "nested/deeper/c.bin", &[9u8; 64]);
    fs::create_dir_all(src.join("empty")).unwrap();

    let dst = tmp.path().join("parents/that/do/not/exist");
    let report = copy_dir(&src, &dst).unwrap();

    assert!(report.is_success());
    assert_eq!(report.succeeded, 3);
    assert_eq!(report.bytes_copied, 5 + 4 + 64);
    assert_eq!(fs::read(dst.join("a.txt")).unwrap(), b"alpha");
    assert_eq!(fs::read(dst.join("nested/b.txt")).unwrap(), b"beta");
    assert_eq!(fs::read(dst.join("nested/deeper/c.bin")).unwrap(), vec![9u8; 64]);
    assert!(dst.join("empty").is_dir());
}

#[test]
fn test_copy_dir_missing_source_fails() {
    let tmp = TempDir::new().unwrap();
    let err = copy_dir(tmp.path().join("missing"), tmp.path().join("out")).unwrap_err();
    assert!(err.is_not_found());
}

#[cfg(unix)]
#[test]
fn test_copy_dir_continues_after_entry_failure() {
    let tmp = TempDir::new().unwrap();
    let src = tmp.path().join("src");
    write(&src, "a.txt", b"a");
    write(&src, "c.txt", b"c");
    write(&src, "sub/d.txt", b"d");
    // A dangling symlink cannot be opened for reading.
    std::os::unix::fs::symlink(src.join("gone"), src.join("b.txt")).unwrap();

    let dst = tmp.path().join("dst");
    let report = copy_dir(&src, &dst).unwrap();

    assert_eq!(report.succeeded, 3);
    assert_eq!(report.failed, 1);
    assert!(report.errors[0].path.ends_with("b.txt"));
    assert_eq!(fs::read(dst.join("a.txt")).unwrap(), b"a");
    assert_eq!(fs::read(dst.join("c.txt")).unwrap(), b"c");
    assert_eq!(fs::read(dst.join("sub/d.txt")).unwrap(), b"d");
    assert!(!dst.join("b.txt").exists());
}

#[test]
fn test_zip_unzip_round_trip() {
    let tmp = TempDir::new().unwrap();
    let src = tmp.path().join("bundle");
    write(&src, "readme.md", b"# bundle");
    write(&src, "assets/logo.svg", b"<svg/>");
    write(&src, "assets/fonts/mono.woff", &[0xAB; 300]);
    write(&src, ".hidden", b"dot");

    let archive = tmp.path().join("bundle.zip");
    zipit(&src, &archive).unwrap();

    let out = tmp.path().join("out");
    unzip(&archive, &out).unwrap();

    let extracted = out.join("bundle");
    for rel in ["readme.md", "assets/logo.svg", "assets/fonts/mono.woff", ".hidden"] {
        assert_eq!(
            fs::read(extracted.join(rel)).unwrap(),
            fs::read(src.join(rel)).unwrap(),
            "content mismatch for {rel}"
        );
    }
}

#[cfg(unix)]
#[test]
fn test_zip_unzip_preserves_mode() {
    use std::os::unix::fs::PermissionsExt;

    let tmp = TempDir::new().unwrap();
    let src = tmp.path().join("tools");
    write(&src, "run.sh", b"#!/bin/sh\necho hi\n");
    write(&src, "data.txt", b"plain");
    fs::set_permissions(src.join("run.sh"), fs::Permissions::from_mode(0o755)).unwrap();
    fs::set_permissions(src.join("data.txt"), fs::Permissions::from_mode(0o600)).unwrap();

    let archive = tmp.path().join("tools.zip");
    zipit(&src, &archive).unwrap();

    let out = tmp.path().join("out");
    unzip(&archive, &out).unwrap();

    let mode = |rel: &str| fs::metadata(out.join(rel)).unwrap().permissions().mode() & 0o777;
    assert_eq!(mode("tools/run.sh"), 0o755);
    assert_eq!(mode("tools/data.txt"), 0o600);
}

#[test]
fn test_unzip_missing_archive() {
    let tmp = TempDir::new().unwrap();
    let err = unzip(tmp.path().join("none.zip"), tmp.path().join("out")).unwrap_err();
    assert!(matches!(err, FsError::NotFound { .. }));
}

#[test]
fn test_remove_duplicates_on_listing() {
    let listed = vec![
        "index".to_string(),
        "blog/post".to_string(),
        "index".to_string(),
    ];
    assert_eq!(remove_duplicates(listed), vec!["index", "blog/post"]);
}
