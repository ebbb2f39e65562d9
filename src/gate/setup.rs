// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! First-run passphrase setup.
//!
//! Two sequential entries, create then confirm. Both must be at least
//! [`MIN_PASSPHRASE_LEN`] characters and the confirmation must equal the
//! first entry. A mismatch discards both values and starts over.

use serde::Serialize;
use utoipa::ToSchema;

use super::GateError;

/// Minimum passphrase length, in characters.
pub const MIN_PASSPHRASE_LEN: usize = 15;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SetupStep {
    Create,
    Confirm,
}

/// Result of an accepted setup entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SetupProgress {
    /// The first entry was accepted; the confirmation is next.
    AwaitingConfirmation,
    /// Both entries matched.
    Complete(String),
}

#[derive(Debug, Clone, Default)]
pub struct SetupFlow {
    pending: Option<String>,
}

impl SetupFlow {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn step(&self) -> SetupStep {
        if self.pending.is_some() {
            SetupStep::Confirm
        } else {
            SetupStep::Create
        }
    }

    /// Submit the entry for the current step.
    ///
    /// A too-short entry leaves the flow where it was. A mismatched
    /// confirmation resets the flow to [`SetupStep::Create`].
    pub fn submit(&mut self, input: &str) -> Result<SetupProgress, GateError> {
        if input.chars().count() < MIN_PASSPHRASE_LEN {
            return Err(GateError::PassphraseTooShort {
                min: MIN_PASSPHRASE_LEN,
            });
        }

        match self.pending.take() {
            None => {
                self.pending = Some(input.to_string());
                Ok(SetupProgress::AwaitingConfirmation)
            }
            Some(first) if first == input => Ok(SetupProgress::Complete(first)),
            Some(_) => Err(GateError::PassphraseMismatch),
        }
    }

    pub fn reset(&mut self) {
        self.pending = None;
    }

    /// Put a matched first entry back so the confirmation can be retried.
    pub fn resume(&mut self, first: String) {
        self.pending = Some(first);
    }
}
