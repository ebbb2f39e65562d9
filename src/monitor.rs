// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Restart Monitor
//!
//! Background task that follows the gate's restart generation. A wipe
//! reloads the gate in place and bumps the generation; the monitor logs each
//! bump so operators can see factory resets in the service log.
//!
//! ## Shutdown
//!
//! Uses `tokio_util::sync::CancellationToken`, shared with the HTTP server's
//! graceful shutdown.

use tokio::sync::watch;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

pub struct RestartMonitor {
    restarts: watch::Receiver<u64>,
}

impl RestartMonitor {
    pub fn new(restarts: watch::Receiver<u64>) -> Self {
        Self { restarts }
    }

    /// Run until the token is cancelled or the gate is dropped.
    ///
    /// Returns the last generation observed.
    pub async fn run(mut self, shutdown: CancellationToken) -> u64 {
        let mut seen = *self.restarts.borrow_and_update();
        info!(generation = seen, "Restart monitor starting");

        loop {
            tokio::select! {
                changed = self.restarts.changed() => {
                    if changed.is_err() {
                        warn!("Gate dropped; restart monitor stopping");
                        return seen;
                    }
                    seen = *self.restarts.borrow_and_update();
                    info!(generation = seen, "Gate restarted into first-run setup");
                }
                _ = shutdown.cancelled() => {
                    info!("Restart monitor shutting down");
                    return seen;
                }
            }
        }
    }
}
