// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Configuration record persistence.
//!
//! [`ConfigStore`] owns the single configuration record. It loads the record
//! once at startup, merging whatever was persisted over the defaults, and
//! writes the full record back after every change.
//!
//! Loading never fails. A missing record yields the defaults. A blob that is
//! not a JSON object is logged and replaced by the defaults. Inside an
//! object, each key is merged on its own: a key whose value has the wrong
//! type keeps its default and the rest of the record is kept.

use std::sync::Arc;

use serde_json::{Map, Value};
use tracing::{debug, info, warn};

use super::{KeyValueStore, StorageError, StorageResult};
use crate::models::{AegisConfig, ConfigPatch};

/// Storage key of the configuration record.
pub const CONFIG_KEY: &str = "aegis_phantom_config";

/// Why a persisted record could not be used.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("persisted configuration is corrupt: {0}")]
    PersistenceCorrupt(#[from] serde_json::Error),

    #[error("persisted configuration is not a JSON object")]
    NotAnObject,

    #[error("persisted configuration is unreadable: {0}")]
    Backend(#[from] StorageError),
}

/// Owner of the persisted configuration record.
pub struct ConfigStore {
    backend: Arc<dyn KeyValueStore>,
    record: AegisConfig,
}

impl ConfigStore {
    /// Load the record from `backend`, degrading to defaults on any failure.
    pub fn load(backend: Arc<dyn KeyValueStore>) -> Self {
        let record = load_record(backend.as_ref());
        Self { backend, record }
    }

    /// Current record.
    pub fn record(&self) -> &AegisConfig {
        &self.record
    }

    /// Discard the in-memory record and read it again from the backend.
    pub fn reload(&mut self) -> &AegisConfig {
        self.record = load_record(self.backend.as_ref());
        &self.record
    }

    /// Persist the full record.
    pub fn save(&self) -> StorageResult<()> {
        let raw = serde_json::to_string(&self.record)?;
        self.backend.set(CONFIG_KEY, &raw)
    }

    /// Replace the given fields and persist the result.
    ///
    /// The in-memory record only changes once the write succeeds.
    pub fn update(&mut self, patch: ConfigPatch) -> StorageResult<AegisConfig> {
        let updated = patch.apply(&self.record);
        let raw = serde_json::to_string(&updated)?;
        self.backend.set(CONFIG_KEY, &raw)?;
        self.record = updated;
        Ok(self.record.clone())
    }

    /// Erase the persisted record and fall back to defaults.
    pub fn wipe(&mut self) -> StorageResult<()> {
        self.backend.remove(CONFIG_KEY)?;
        self.record = AegisConfig::default();
        info!("Configuration record erased");
        Ok(())
    }
}

/// Parse a persisted record, merging its keys over the defaults.
///
/// Fails only when `raw` is not a JSON object. Unknown keys are ignored and
/// recognized keys with an unusable value keep their default.
pub fn decode(raw: &str) -> Result<AegisConfig, LoadError> {
    let Value::Object(stored) = serde_json::from_str::<Value>(raw)? else {
        return Err(LoadError::NotAnObject);
    };

    let Value::Object(mut merged) = serde_json::to_value(AegisConfig::default())? else {
        return Err(LoadError::NotAnObject);
    };

    for (key, value) in stored {
        if !merged.contains_key(&key) {
            continue;
        }
        let mut candidate: Map<String, Value> = merged.clone();
        candidate.insert(key.clone(), value);
        if serde_json::from_value::<AegisConfig>(Value::Object(candidate.clone())).is_ok() {
            merged = candidate;
        } else {
            warn!(key = %key, "Ignoring unusable value in persisted configuration");
        }
    }

    Ok(serde_json::from_value(Value::Object(merged))?)
}

fn try_load(backend: &dyn KeyValueStore) -> Result<Option<AegisConfig>, LoadError> {
    match backend.get(CONFIG_KEY)? {
        Some(raw) => decode(&raw).map(Some),
        None => Ok(None),
    }
}

fn load_record(backend: &dyn KeyValueStore) -> AegisConfig {
    match try_load(backend) {
        Ok(Some(record)) => record,
        Ok(None) => {
            debug!("No persisted configuration, using defaults");
            AegisConfig::default()
        }
        Err(e) => {
            warn!(error = %e, "Falling back to default configuration");
            AegisConfig::default()
        }
    }
}
