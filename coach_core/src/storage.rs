//! Locked JSON file storage shared by the plan store and the workout log.
//!
//! Readers take a shared lock and treat damaged files as absent. Writers
//! go through a temp file in the same directory and rename it into place.
//! Read-modify-write sequences additionally hold an exclusive lock on a
//! sibling `.lock` file for their whole duration.

use crate::{Error, Result};
use fs2::FileExt;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs::{File, OpenOptions};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// Read and parse `path` under a shared lock
///
/// Returns `None` if the file doesn't exist. If it is unreadable or
/// corrupted, logs a warning and returns `None`.
pub(crate) fn load_json<T: DeserializeOwned>(path: &Path, what: &str) -> Result<Option<T>> {
    if !path.exists() {
        tracing::info!("No {} at {:?}", what, path);
        return Ok(None);
    }

    let file = match File::open(path) {
        Ok(f) => f,
        Err(e) => {
            tracing::warn!("Unable to open {} {:?}: {}. Ignoring it.", what, path, e);
            return Ok(None);
        }
    };

    // Acquire shared lock for reading
    if let Err(e) = file.lock_shared() {
        tracing::warn!("Unable to lock {} {:?}: {}. Ignoring it.", what, path, e);
        return Ok(None);
    }

    let mut contents = String::new();
    let mut reader = std::io::BufReader::new(&file);
    if let Err(e) = reader.read_to_string(&mut contents) {
        let _ = file.unlock();
        tracing::warn!("Failed to read {} {:?}: {}. Ignoring it.", what, path, e);
        return Ok(None);
    }

    file.unlock()?;

    match serde_json::from_str::<T>(&contents) {
        Ok(value) => Ok(Some(value)),
        Err(e) => {
            tracing::warn!("Failed to parse {} {:?}: {}. Ignoring it.", what, path, e);
            Ok(None)
        }
    }
}

/// Atomically replace `path` with the compact JSON form of `value`
///
/// Writes to a temp file in the same directory, syncs it, then renames it
/// over the original.
pub(crate) fn save_json<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    let parent = path
        .parent()
        .ok_or_else(|| Error::State(format!("state path {:?} has no parent", path)))?;
    std::fs::create_dir_all(parent)?;

    let temp = NamedTempFile::new_in(parent)?;

    // Serialize concurrent writers
    temp.as_file().lock_exclusive()?;

    {
        let mut writer = std::io::BufWriter::new(temp.as_file());
        let contents = serde_json::to_string(value)?;
        writer.write_all(contents.as_bytes())?;
        writer.flush()?;
    }

    temp.as_file().sync_all()?;
    temp.as_file().unlock()?;

    temp.persist(path).map_err(|e| Error::Io(e.error))?;
    Ok(())
}

fn lock_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().unwrap_or_default().to_os_string();
    name.push(".lock");
    path.with_file_name(name)
}

/// Run `f` while holding the exclusive update lock for `path`
///
/// Only one read-modify-write of a given file runs at a time across
/// processes. Plain loads and saves don't take this lock.
pub(crate) fn with_update_lock<R>(path: &Path, f: impl FnOnce() -> Result<R>) -> Result<R> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let lock = OpenOptions::new()
        .create(true)
        .truncate(false)
        .write(true)
        .open(lock_path(path))?;
    lock.lock_exclusive()?;

    let result = f();

    lock.unlock()?;
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Barrier};

    #[test]
    fn test_lock_path_is_sibling() {
        let path = Path::new("/data/state/coach_plan.json");
        assert_eq!(lock_path(path), Path::new("/data/state/coach_plan.json.lock"));
    }

    #[test]
    fn test_save_and_load_value() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("nested/value.json");

        save_json(&path, &vec![1, 2, 3]).unwrap();
        let loaded: Option<Vec<u32>> = load_json(&path, "test value").unwrap();
        assert_eq!(loaded, Some(vec![1, 2, 3]));
    }

    #[test]
    fn test_wrong_shape_is_treated_as_absent() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("value.json");
        std::fs::write(&path, r#"{"not":"a list"}"#).unwrap();

        let loaded: Option<Vec<u32>> = load_json(&path, "test value").unwrap();
        assert!(loaded.is_none());
    }

    #[test]
    fn test_update_lock_serializes_read_modify_write() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = Arc::new(temp_dir.path().join("counter.json"));
        save_json(path.as_ref(), &0u32).unwrap();

        let barrier = Arc::new(Barrier::new(8));
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let path = Arc::clone(&path);
                let barrier = Arc::clone(&barrier);
                std::thread::spawn(move || {
                    barrier.wait();
                    with_update_lock(&path, || {
                        let current: u32 = load_json(&path, "counter")?.unwrap_or(0);
                        std::thread::sleep(std::time::Duration::from_millis(5));
                        save_json(&path, &(current + 1))
                    })
                    .unwrap();
                })
            })
            .collect();

        for handle in handles {
            handle.join().unwrap();
        }

        let total: Option<u32> = load_json(&path, "counter").unwrap();
        assert_eq!(total, Some(8));
    }
}
