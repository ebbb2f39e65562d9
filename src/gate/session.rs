// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Runtime-only session flag.

use chrono::{DateTime, Utc};

/// Tracks whether the protected interface is open for this run.
///
/// Starts locked on every process start and is never persisted.
#[derive(Debug, Clone, Default)]
pub struct SessionController {
    opened_at: Option<DateTime<Utc>>,
}

impl SessionController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_unlocked(&self) -> bool {
        self.opened_at.is_some()
    }

    /// When the current session was opened.
    pub fn opened_at(&self) -> Option<DateTime<Utc>> {
        self.opened_at
    }

    pub fn open(&mut self) {
        self.opened_at = Some(Utc::now());
    }

    pub fn close(&mut self) {
        self.opened_at = None;
    }
}
