// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Phantom Aegis - Gate Service
//!
//! Owns the access-control flow of a content-blocking interface that hides
//! behind a fake "system diagnostic" screen: first-run passphrase setup, the
//! triple-tap reveal gesture, unlock, lock and factory reset. The persisted
//! configuration record lives in a key-value store.
//!
//! ## Modules
//!
//! - `api` - HTTP API handlers (Axum)
//! - `gate` - Lock / setup state machine and its runtime
//! - `storage` - Key-value backends and the configuration record
//! - `shell` - Read models for the dashboard, guide and decoy screen
//! - `transient` - Self-clearing error indicators

pub mod api;
pub mod config;
pub mod error;
pub mod gate;
pub mod models;
pub mod monitor;
pub mod shell;
pub mod state;
pub mod storage;
pub mod transient;
