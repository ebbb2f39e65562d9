// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Decoy reveal gesture.
//!
//! Counts rapid taps on the decoy screen header. Every tap restarts the
//! window, so a sequence only has to keep each gap within the window, not
//! the whole sequence. A gap longer than the window starts a new sequence.

use std::time::Duration;

use tokio::time::Instant;

/// Taps needed to reveal the prompt.
pub const REVEAL_TAPS: u32 = 3;

/// Maximum gap between consecutive taps of one sequence.
pub const REVEAL_WINDOW: Duration = Duration::from_millis(1500);

/// Emitted when a tap completes the reveal sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RevealSignal;

#[derive(Debug, Clone)]
pub struct DecoyRevealGesture {
    threshold: u32,
    window: Duration,
    count: u32,
    last_tap: Option<Instant>,
}

impl Default for DecoyRevealGesture {
    fn default() -> Self {
        Self::new(REVEAL_TAPS, REVEAL_WINDOW)
    }
}

impl DecoyRevealGesture {
    pub fn new(threshold: u32, window: Duration) -> Self {
        Self {
            threshold: threshold.max(1),
            window,
            count: 0,
            last_tap: None,
        }
    }

    pub fn register_tap(&mut self) -> Option<RevealSignal> {
        self.register_tap_at(Instant::now())
    }

    /// Record a tap that happened at `now`.
    pub fn register_tap_at(&mut self, now: Instant) -> Option<RevealSignal> {
        if self.window_expired(now) {
            self.count = 0;
        }

        self.count += 1;
        self.last_tap = Some(now);

        if self.count >= self.threshold {
            self.reset();
            return Some(RevealSignal);
        }

        None
    }

    /// Taps counted towards the current sequence as of `now`.
    pub fn count_at(&self, now: Instant) -> u32 {
        if self.window_expired(now) {
            0
        } else {
            self.count
        }
    }

    pub fn reset(&mut self) {
        self.count = 0;
        self.last_tap = None;
    }

    fn window_expired(&self, now: Instant) -> bool {
        match self.last_tap {
            Some(last) => now.saturating_duration_since(last) > self.window,
            None => false,
        }
    }
}
