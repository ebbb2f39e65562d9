// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Storage Module
//!
//! Persistence for the configuration record. The record is a single JSON
//! document stored under a fixed key in a small key-value backend.
//!
//! ## Storage Layout
//!
//! ```text
//! <DATA_DIR>/
//!   aegis_phantom_config.json   # The configuration record
//! ```
//!
//! ## Backends
//!
//! - [`FileStore`] writes one file per key, atomically (temp file + rename)
//! - [`MemoryStore`] keeps values in process memory
//!
//! Neither backend encrypts anything. The passphrase is stored in cleartext.

use std::io;

pub mod config_store;
pub mod file_store;
pub mod memory;
pub mod paths;

pub use config_store::{ConfigStore, LoadError, CONFIG_KEY};
pub use file_store::FileStore;
pub use memory::MemoryStore;
pub use paths::StoragePaths;

/// Error type for storage operations.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// I/O error during file operations
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Stored bytes did not read back as written
    #[error("Integrity violation: {0}")]
    Integrity(String),
}

/// Result type for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;

/// Minimal string key-value backend.
pub trait KeyValueStore: Send + Sync {
    /// Value stored under `key`, or `None` if absent.
    fn get(&self, key: &str) -> StorageResult<Option<String>>;

    /// Store `value` under `key`, replacing any previous value.
    fn set(&self, key: &str, value: &str) -> StorageResult<()>;

    /// Remove `key`. Removing an absent key succeeds.
    fn remove(&self, key: &str) -> StorageResult<()>;
}
