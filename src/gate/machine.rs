// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Gate State Machine
//!
//! Pure transition function for the lock / unlock / setup flow. It decides
//! the next state and lists the side effects to apply; it never touches
//! storage, the session, or timers itself. [`super::Gate`] applies the
//! effects.
//!
//! ```text
//!   NEEDS_SETUP ──setup completed──▶ UNLOCKED
//!        ▲                            │   ▲
//!        │ wipe (match)          lock │   │ passphrase (match)
//!        └────────────────────────────┤   │
//!                                     ▼   │
//!   LOCKED_DECOY ◀──dismiss──── LOCKED_PROMPT ◀─┐
//!        │                        │  passphrase │
//!        └─────reveal gesture────▶└─ (mismatch) ┘
//! ```

use serde::Serialize;
use utoipa::ToSchema;

use super::GateError;
use crate::models::AegisConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GateState {
    /// No passphrase stored; first-run setup is shown.
    NeedsSetup,
    /// The decoy diagnostics screen is shown.
    LockedDecoy,
    /// The hidden passphrase prompt is open over the decoy screen.
    LockedPrompt,
    /// The protected interface is open.
    Unlocked,
}

impl GateState {
    /// State a freshly started process begins in.
    pub fn initial(config: &AegisConfig) -> Self {
        if config.has_passphrase() {
            GateState::LockedDecoy
        } else {
            GateState::NeedsSetup
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            GateState::NeedsSetup => "NEEDS_SETUP",
            GateState::LockedDecoy => "LOCKED_DECOY",
            GateState::LockedPrompt => "LOCKED_PROMPT",
            GateState::Unlocked => "UNLOCKED",
        }
    }
}

impl std::fmt::Display for GateState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Input to the state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateEvent<'a> {
    /// The setup protocol produced a confirmed passphrase.
    SetupCompleted(&'a str),
    /// The reveal gesture reached its threshold.
    RevealGesture,
    /// The prompt was closed without submitting.
    DismissPrompt,
    /// A passphrase was submitted at the prompt.
    SubmitPassphrase(&'a str),
    /// "Terminate session".
    Lock,
    /// Critical wipe with the given confirmation passphrase.
    Wipe(&'a str),
}

impl GateEvent<'_> {
    pub fn name(&self) -> &'static str {
        match self {
            GateEvent::SetupCompleted(_) => "setup",
            GateEvent::RevealGesture => "reveal",
            GateEvent::DismissPrompt => "dismiss",
            GateEvent::SubmitPassphrase(_) => "unlock",
            GateEvent::Lock => "lock",
            GateEvent::Wipe(_) => "wipe",
        }
    }
}

/// Side effect requested by a transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Write the master passphrase into the configuration record.
    PersistPassphrase(String),
    OpenSession,
    CloseSession,
    /// Raise the prompt's auth-failure indicator.
    RaiseUnlockError,
    /// Raise the wipe dialog's auth-failure indicator.
    RaiseWipeError,
    /// Erase the persisted configuration record.
    EraseStore,
    /// Reload everything from scratch and notify the host.
    Restart,
}

/// Outcome of a permitted event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transition {
    pub next: GateState,
    pub effects: Vec<Effect>,
}

impl Transition {
    fn to(next: GateState, effects: Vec<Effect>) -> Self {
        Self { next, effects }
    }
}

/// Compute the transition for `event` in `state`.
///
/// `stored` is the current configuration record, consulted for passphrase
/// comparisons. Events that make no sense in `state` are rejected with
/// [`GateError::NotPermitted`].
pub fn transition(
    state: GateState,
    event: &GateEvent<'_>,
    stored: &AegisConfig,
) -> Result<Transition, GateError> {
    use GateState::*;

    let transition = match (state, *event) {
        (NeedsSetup, GateEvent::SetupCompleted(passphrase)) => Transition::to(
            Unlocked,
            vec![
                Effect::PersistPassphrase(passphrase.to_string()),
                Effect::OpenSession,
            ],
        ),

        (LockedDecoy, GateEvent::RevealGesture) => Transition::to(LockedPrompt, vec![]),

        (LockedPrompt, GateEvent::DismissPrompt) => Transition::to(LockedDecoy, vec![]),

        (LockedPrompt, GateEvent::SubmitPassphrase(candidate)) => {
            if stored.passphrase_matches(candidate) {
                Transition::to(Unlocked, vec![Effect::OpenSession])
            } else {
                Transition::to(LockedPrompt, vec![Effect::RaiseUnlockError])
            }
        }

        (Unlocked, GateEvent::Lock) => Transition::to(LockedDecoy, vec![Effect::CloseSession]),

        (Unlocked, GateEvent::Wipe(candidate)) => {
            if stored.passphrase_matches(candidate) {
                Transition::to(
                    NeedsSetup,
                    vec![Effect::EraseStore, Effect::CloseSession, Effect::Restart],
                )
            } else {
                Transition::to(Unlocked, vec![Effect::RaiseWipeError])
            }
        }

        (state, event) => {
            return Err(GateError::NotPermitted {
                state,
                action: event.name(),
            })
        }
    };

    Ok(transition)
}
