// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Filesystem-backed key-value store.
//!
//! Each key maps to one file, `<root>/<key>.json`, holding the raw string
//! value. Writes go to a temp file first and are renamed into place, so a
//! crash never leaves a half-written record behind.

use std::fs::{self, File};
use std::io::{self, BufWriter, Write};

use super::{KeyValueStore, StoragePaths, StorageError, StorageResult};

/// Key-value store writing one file per key under a data directory.
#[derive(Debug, Clone)]
pub struct FileStore {
    paths: StoragePaths,
}

impl FileStore {
    /// Create a store rooted at `paths`. Directories are created lazily.
    pub fn new(paths: StoragePaths) -> Self {
        Self { paths }
    }

    /// Get the storage paths.
    pub fn paths(&self) -> &StoragePaths {
        &self.paths
    }

    /// Create the data directory if it does not exist.
    ///
    /// Safe to call multiple times (idempotent).
    pub fn initialize(&self) -> StorageResult<()> {
        fs::create_dir_all(self.paths.root())?;
        Ok(())
    }

    /// Check that the data directory is writable.
    ///
    /// Performs a write-read-delete round trip on a scratch file.
    pub fn health_check(&self) -> StorageResult<()> {
        let probe = self.paths.health_probe();
        let payload = b"health_check_data";

        fs::write(&probe, payload)?;
        let read_back = fs::read(&probe)?;
        fs::remove_file(&probe)?;

        if read_back != payload {
            return Err(StorageError::Integrity(
                "Health check data mismatch".to_string(),
            ));
        }

        Ok(())
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> StorageResult<Option<String>> {
        match fs::read_to_string(self.paths.entry(key)) {
            Ok(value) => Ok(Some(value)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn set(&self, key: &str, value: &str) -> StorageResult<()> {
        let path = self.paths.entry(key);

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let temp_path = path.with_extension("tmp");
        {
            let file = File::create(&temp_path)?;
            let mut writer = BufWriter::new(file);
            writer.write_all(value.as_bytes())?;
            writer.flush()?;
        }

        fs::rename(&temp_path, &path)?;
        Ok(())
    }

    fn remove(&self, key: &str) -> StorageResult<()> {
        match fs::remove_file(self.paths.entry(key)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn setup() -> (TempDir, FileStore) {
        let temp = TempDir::new().unwrap();
        let store = FileStore::new(StoragePaths::new(temp.path()));
        store.initialize().unwrap();
        (temp, store)
    }

    #[test]
    fn missing_key_reads_as_none() {
        let (_temp, store) = setup();
        assert_eq!(store.get("absent").unwrap(), None);
    }

    #[test]
    fn set_then_get_returns_value() {
        let (_temp, store) = setup();
        store.set("record", r#"{"a":1}"#).unwrap();
        assert_eq!(store.get("record").unwrap().as_deref(), Some(r#"{"a":1}"#));
        assert!(store.paths().entry("record").exists());
        assert!(!store.paths().entry("record").with_extension("tmp").exists());
    }

    #[test]
    fn set_overwrites_previous_value() {
        let (_temp, store) = setup();
        store.set("record", "first").unwrap();
        store.set("record", "second").unwrap();
        assert_eq!(store.get("record").unwrap().as_deref(), Some("second"));
    }

    #[test]
    fn remove_is_idempotent() {
        let (_temp, store) = setup();
        store.set("record", "value").unwrap();
        store.remove("record").unwrap();
        assert_eq!(store.get("record").unwrap(), None);
        store.remove("record").unwrap();
    }

    #[test]
    fn set_creates_missing_root() {
        let temp = TempDir::new().unwrap();
        let store = FileStore::new(StoragePaths::new(temp.path().join("nested/dir")));
        store.set("record", "value").unwrap();
        assert_eq!(store.get("record").unwrap().as_deref(), Some("value"));
    }

    #[test]
    fn health_check_works() {
        let (_temp, store) = setup();
        store.health_check().expect("Health check should pass");
        assert!(!store.paths().health_probe().exists());
    }
}
