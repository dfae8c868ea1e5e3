//! JSON persistence helpers for files under ~/.galaxy-trader/.
//!
//! Used by the arcade config and the file-backed document store.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

const APP_DIR: &str = ".galaxy-trader";

/// Get the ~/.galaxy-trader/ directory path, creating it if needed.
pub fn app_dir() -> io::Result<PathBuf> {
    let home_dir = dirs::home_dir().ok_or_else(|| {
        io::Error::new(
            io::ErrorKind::NotFound,
            "Could not determine home directory",
        )
    })?;
    let dir = home_dir.join(APP_DIR);
    fs::create_dir_all(&dir)?;
    Ok(dir)
}

/// Get the full path for a file in ~/.galaxy-trader/.
pub fn app_path(filename: &str) -> io::Result<PathBuf> {
    Ok(app_dir()?.join(filename))
}

/// Load a JSON file from ~/.galaxy-trader/, returning `T::default()` if missing or invalid.
pub fn load_json_or_default<T: Default + serde::de::DeserializeOwned>(filename: &str) -> T {
    let path = match app_path(filename) {
        Ok(p) => p,
        Err(_) => return T::default(),
    };
    match read_json(&path) {
        Ok(Some(value)) => value,
        Ok(None) => T::default(),
        Err(e) => {
            log::warn!("ignoring unreadable {}: {}", path.display(), e);
            T::default()
        }
    }
}

/// Read JSON from an arbitrary path. A missing file is `Ok(None)`; a file that
/// does not parse is an `InvalidData` error.
pub fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> io::Result<Option<T>> {
    let json = match fs::read_to_string(path) {
        Ok(json) => json,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(e),
    };
    serde_json::from_str(&json)
        .map(Some)
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
}

/// Write JSON to an arbitrary path through a temp file and rename, so a crash
/// mid-write never leaves a truncated file behind.
pub fn write_json<T: serde::Serialize>(path: &Path, data: &T) -> io::Result<()> {
    let json = serde_json::to_string_pretty(data)
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let tmp = path.with_extension("json.tmp");
    fs::write(&tmp, json)?;
    fs::rename(&tmp, path)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_file(name: &str) -> PathBuf {
        std::env::temp_dir()
            .join(format!("galaxy-trader-test-{}", uuid::Uuid::new_v4()))
            .join(name)
    }

    #[test]
    fn test_app_dir_exists() {
        let dir = app_dir().expect("app_dir should succeed");
        assert!(dir.exists());
        assert!(dir.ends_with(".galaxy-trader"));
    }

    #[test]
    fn test_app_path_format() {
        let path = app_path("test.json").expect("app_path should succeed");
        assert!(path.to_string_lossy().ends_with(".galaxy-trader/test.json"));
    }

    #[test]
    fn test_load_missing_returns_default() {
        let val: Vec<String> = load_json_or_default("nonexistent_test_file_12345.json");
        assert!(val.is_empty());
    }

    #[test]
    fn test_write_and_read_roundtrip() {
        let path = temp_file("store.json");
        let data = vec!["hello".to_string(), "world".to_string()];
        write_json(&path, &data).expect("write should succeed");

        let loaded: Option<Vec<String>> = read_json(&path).expect("read should succeed");
        assert_eq!(loaded, Some(data));
        assert!(!path.with_extension("json.tmp").exists());

        if let Some(dir) = path.parent() {
            fs::remove_dir_all(dir).ok();
        }
    }

    #[test]
    fn test_read_missing_is_none() {
        let loaded: Option<Vec<String>> = read_json(&temp_file("absent.json")).unwrap();
        assert!(loaded.is_none());
    }

    #[test]
    fn test_read_garbage_is_invalid_data() {
        let path = temp_file("garbage.json");
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, "{not json").unwrap();
        let err = read_json::<Vec<String>>(&path).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::InvalidData);
        fs::remove_dir_all(path.parent().unwrap()).ok();
    }
}
