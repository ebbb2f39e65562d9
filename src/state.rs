// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use std::sync::Arc;

use chrono::Utc;
use tokio::sync::Mutex;

use crate::gate::Gate;
use crate::models::UsageStats;
use crate::storage::{ConfigStore, FileStore, KeyValueStore, MemoryStore};

#[derive(Clone)]
pub struct AppState {
    /// Every gate operation runs under this lock, one at a time.
    pub gate: Arc<Mutex<Gate>>,
    pub stats: Arc<UsageStats>,
    /// Present when the record lives on disk; used by the health check.
    pub file_store: Option<Arc<FileStore>>,
}

impl AppState {
    pub fn new(gate: Gate) -> Self {
        Self {
            gate: Arc::new(Mutex::new(gate)),
            stats: Arc::new(UsageStats::initial(Utc::now())),
            file_store: None,
        }
    }

    /// State backed by an on-disk store.
    pub fn with_file_store(store: Arc<FileStore>) -> Self {
        let backend: Arc<dyn KeyValueStore> = store.clone();
        let mut state = Self::new(Gate::new(ConfigStore::load(backend)));
        state.file_store = Some(store);
        state
    }

    /// State backed by process memory.
    pub fn in_memory() -> Self {
        let backend: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());
        Self::new(Gate::new(ConfigStore::load(backend)))
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::in_memory()
    }
}
