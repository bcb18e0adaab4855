//! JSON and YAML file helpers.

use std::fs;
use std::path::Path;

use serde::Serialize;
use serde::de::DeserializeOwned;

use filekit_core::{DataFormat, FsError};

/// Read `path` and deserialize it as JSON.
pub fn load_json<T: DeserializeOwned>(path: impl AsRef<Path>) -> Result<T, FsError> {
    let path = path.as_ref();
    let bytes = fs::read(path).map_err(|e| FsError::io(path, e))?;
    serde_json::from_slice(&bytes).map_err(|e| FsError::Decode {
        path: path.to_path_buf(),
        format: DataFormat::Json,
        source: Box::new(e),
    })
}

/// Serialize `value` as pretty JSON (two-space indent) and write it to `path`.
pub fn save_json<T: Serialize + ?Sized>(path: impl AsRef<Path>, value: &T) -> Result<(), FsError> {
    let path = path.as_ref();
    let bytes = serde_json::to_vec_pretty(value).map_err(|e| FsError::Encode {
        path: path.to_path_buf(),
        format: DataFormat::Json,
        source: Box::new(e),
    })?;
    fs::write(path, bytes).map_err(|e| FsError::io(path, e))
}

/// Read `path` and deserialize it as YAML.
pub fn load_yaml<T: DeserializeOwned>(path: impl AsRef<Path>) -> Result<T, FsError> {
    let path = path.as_ref();
    let bytes = fs::read(path).map_err(|e| FsError::io(path, e))?;
    serde_yaml::from_slice(&bytes).map_err(|e| FsError::Decode {
        path: path.to_path_buf(),
        format: DataFormat::Yaml,
        source: Box::new(e),
    })
}

/// Serialize `value` as YAML and write it to `path`.
pub fn save_yaml<T: Serialize + ?Sized>(path: impl AsRef<Path>, value: &T) -> Result<(), FsError> {
    let path = path.as_ref();
    let text = serde_yaml::to_string(value).map_err(|e| FsError::Encode {
        path: path.to_path_buf(),
        format: DataFormat::Yaml,
        source: Box::new(e),
    })?;
    fs::write(path, text).map_err(|e| FsError::io(path, e))
}

/// Load a structured file, picking the format from its extension.
pub fn load_data<T: DeserializeOwned>(path: impl AsRef<Path>) -> Result<T, FsError> {
    let path = path.as_ref();
    match format_of(path)? {
        DataFormat::Json => load_json(path),
        DataFormat::Yaml => load_yaml(path),
    }
}

/// Save a structured file, picking the format from its extension.
pub fn save_data<T: Serialize + ?Sized>(path: impl AsRef<Path>, value: &T) -> Result<(), FsError> {
    let path = path.as_ref();
    match format_of(path)? {
        DataFormat::Json => save_json(path, value),
        DataFormat::Yaml => save_yaml(path, value),
    }
}

fn format_of(path: &Path) -> Result<DataFormat, FsError> {
    DataFormat::from_path(path).ok_or_else(|| FsError::InvalidConfig {
        message: format!("unknown data format for {}", path.display()),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;
    use tempfile::TempDir;

    #[test]
    fn test_save_json_uses_two_space_indent() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("out.json");

        let mut map = BTreeMap::new();
        map.insert("key", vec![1, 2]);
        save_json(&path, &map).unwrap();

        let text = fs::read_to_string(&path).unwrap();
        assert_eq!(text, "{\n  \"key\": [\n    1,\n    2\n  ]\n}");
    }

    #[test]
    fn test_load_json_malformed() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("bad.json");
        fs::write(&path, b"{ not json").unwrap();

        let err = load_json::<serde_json::Value>(&path).unwrap_err();
        assert!(matches!(err, FsError::Decode { format: DataFormat::Json, .. }));
    }

    #[test]
    fn test_load_yaml_missing_file() {
        let tmp = TempDir::new().unwrap();
        let err = load_yaml::<serde_yaml::Value>(tmp.path().join("nope.yaml")).unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn test_load_yaml_wrong_shape() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("list.yaml");
        fs::write(&path, "- a\n- b\n").unwrap();

        let err = load_yaml::<BTreeMap<String, String>>(&path).unwrap_err();
        assert!(matches!(err, FsError::Decode { format: DataFormat::Yaml, .. }));
    }

    #[test]
    fn test_data_dispatch_by_extension() {
        let tmp = TempDir::new().unwrap();
        let value = vec!["x".to_string(), "y".to_string()];

        save_data(tmp.path().join("v.yml"), &value).unwrap();
        let loaded: Vec<String> = load_data(tmp.path().join("v.yml")).unwrap();
        assert_eq!(loaded, value);

        let err = save_data(tmp.path().join("v.toml"), &value).unwrap_err();
        assert!(matches!(err, FsError::InvalidConfig { .. }));
    }
}
