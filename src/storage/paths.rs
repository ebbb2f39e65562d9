// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Path constants and utilities for the on-disk storage layout.

use std::path::{Path, PathBuf};

use crate::config::DEFAULT_DATA_DIR;

/// Storage path utilities for the data directory.
#[derive(Debug, Clone)]
pub struct StoragePaths {
    root: PathBuf,
}

impl Default for StoragePaths {
    fn default() -> Self {
        Self::new(DEFAULT_DATA_DIR)
    }
}

impl StoragePaths {
    /// Create a new StoragePaths with a custom root (useful for testing).
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    /// Root directory for all persisted data.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path to the document stored under `key`.
    ///
    /// Keys are used verbatim as file stems, so callers only pass fixed,
    /// filesystem-safe names.
    pub fn entry(&self, key: &str) -> PathBuf {
        self.root.join(format!("{key}.json"))
    }

    /// Scratch file used by the health check.
    pub fn health_probe(&self) -> PathBuf {
        self.root.join(".health_check")
    }
}
