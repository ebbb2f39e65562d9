// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Self-Clearing Indicators
//!
//! A [`TransientFlag`] is raised by an event and lowers itself after a fixed
//! hold time. Raising it again before the hold elapses cancels the pending
//! clear and starts a fresh one, so overlapping raises never race.
//!
//! The clear runs as a spawned tokio task guarded by a
//! `tokio_util::sync::CancellationToken`. Raising therefore requires a
//! running tokio runtime.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio_util::sync::CancellationToken;

/// Boolean indicator that clears itself `hold` after the last raise.
#[derive(Debug)]
pub struct TransientFlag {
    raised: Arc<AtomicBool>,
    pending: Option<CancellationToken>,
    hold: Duration,
}

impl TransientFlag {
    pub fn new(hold: Duration) -> Self {
        Self {
            raised: Arc::new(AtomicBool::new(false)),
            pending: None,
            hold,
        }
    }

    pub fn is_raised(&self) -> bool {
        self.raised.load(Ordering::SeqCst)
    }

    /// Raise the flag and (re)schedule its clear.
    pub fn raise(&mut self) {
        self.cancel_pending();
        self.raised.store(true, Ordering::SeqCst);

        let token = CancellationToken::new();
        let guard = token.clone();
        let raised = Arc::clone(&self.raised);
        let hold = self.hold;

        tokio::spawn(async move {
            tokio::select! {
                _ = tokio::time::sleep(hold) => raised.store(false, Ordering::SeqCst),
                _ = guard.cancelled() => {}
            }
        });

        self.pending = Some(token);
    }

    /// Lower the flag immediately and drop any scheduled clear.
    pub fn clear(&mut self) {
        self.cancel_pending();
        self.raised.store(false, Ordering::SeqCst);
    }

    fn cancel_pending(&mut self) {
        if let Some(token) = self.pending.take() {
            token.cancel();
        }
    }
}

impl Drop for TransientFlag {
    fn drop(&mut self) {
        self.cancel_pending();
    }
}
