// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Gate Module
//!
//! The lock / unlock / setup flow in front of the protected interface.
//!
//! ## Flow
//!
//! 1. The configuration record is loaded. Without a stored passphrase the
//!    gate starts in first-run setup, otherwise on the decoy screen.
//! 2. Setup takes the passphrase twice; a confirmed passphrase is persisted
//!    and the session opens.
//! 3. On the decoy screen, three rapid taps on the header reveal the prompt.
//!    A matching passphrase opens the session. Wrong attempts are unlimited.
//! 4. "Terminate session" closes the session and returns to the decoy.
//! 5. A critical wipe with the passphrase erases the record and restarts
//!    the gate into first-run setup.
//!
//! [`machine`] holds the pure transition function; [`Gate`] owns the state
//! and applies the resulting effects.

use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::watch;
use tracing::{info, warn};
use utoipa::ToSchema;

use crate::models::{AegisConfig, ConfigPatch, YOUTUBE_LIMIT_MAX};
use crate::storage::{ConfigStore, StorageError};
use crate::transient::TransientFlag;

pub mod gesture;
pub mod machine;
pub mod session;
pub mod setup;

pub use gesture::{DecoyRevealGesture, RevealSignal};
pub use machine::{Effect, GateEvent, GateState, Transition};
pub use session::SessionController;
pub use setup::{SetupFlow, SetupProgress, SetupStep, MIN_PASSPHRASE_LEN};

/// How long a rejected unlock attempt stays flagged.
pub const UNLOCK_ERROR_HOLD: Duration = Duration::from_millis(1000);

/// How long a rejected wipe attempt stays flagged.
pub const WIPE_ERROR_HOLD: Duration = Duration::from_millis(2000);

/// How long the setup mismatch notice stays visible.
pub const SETUP_MISMATCH_HOLD: Duration = Duration::from_millis(1000);

/// Gate error type.
#[derive(Debug, thiserror::Error)]
pub enum GateError {
    /// Setup entry shorter than the minimum length
    #[error("Minimum {min} characters required.")]
    PassphraseTooShort { min: usize },

    /// Setup confirmation differs from the first entry
    #[error("Passwords mismatch.")]
    PassphraseMismatch,

    /// Submitted passphrase does not match the stored one
    #[error("Authentication failed")]
    AuthFailure,

    /// Protected interface accessed without an open session
    #[error("Interface is locked")]
    Locked,

    /// Action makes no sense in the current state
    #[error("Cannot {action} while {state}")]
    NotPermitted {
        state: GateState,
        action: &'static str,
    },

    /// Daily limit outside the accepted range
    #[error("Daily limit must be between 0 and {max} minutes")]
    LimitOutOfRange { max: u32 },

    /// Backend write or remove failed
    #[error("Storage failure: {0}")]
    Storage(#[from] StorageError),
}

/// Snapshot of everything the display layer needs to pick a screen.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct GateStatus {
    pub state: GateState,
    /// Present only while in first-run setup.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub setup_step: Option<SetupStep>,
    /// Inline validation message for the setup form.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub setup_error: Option<String>,
    /// Prompt shows the auth-failure style.
    pub unlock_error: bool,
    /// Wipe dialog shows the auth-failure style.
    pub wipe_error: bool,
    pub stealth_mode: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub session_opened_at: Option<DateTime<Utc>>,
    /// Incremented on every restart; a change means "reload from scratch".
    pub generation: u64,
}

/// Runtime owner of the gate.
pub struct Gate {
    store: ConfigStore,
    state: GateState,
    session: SessionController,
    gesture: DecoyRevealGesture,
    setup: SetupFlow,
    setup_notice: Option<String>,
    setup_mismatch: TransientFlag,
    unlock_error: TransientFlag,
    wipe_error: TransientFlag,
    restarts: watch::Sender<u64>,
}

impl Gate {
    /// Build the gate around an already loaded store.
    pub fn new(store: ConfigStore) -> Self {
        let state = GateState::initial(store.record());
        let (restarts, _) = watch::channel(0);

        info!(state = %state, "Gate initialised");

        Self {
            store,
            state,
            session: SessionController::new(),
            gesture: DecoyRevealGesture::default(),
            setup: SetupFlow::new(),
            setup_notice: None,
            setup_mismatch: TransientFlag::new(SETUP_MISMATCH_HOLD),
            unlock_error: TransientFlag::new(UNLOCK_ERROR_HOLD),
            wipe_error: TransientFlag::new(WIPE_ERROR_HOLD),
            restarts,
        }
    }

    pub fn state(&self) -> GateState {
        self.state
    }

    pub fn config(&self) -> &AegisConfig {
        self.store.record()
    }

    pub fn is_unlocked(&self) -> bool {
        self.session.is_unlocked()
    }

    pub fn setup_step(&self) -> SetupStep {
        self.setup.step()
    }

    pub fn unlock_error(&self) -> bool {
        self.unlock_error.is_raised()
    }

    pub fn wipe_error(&self) -> bool {
        self.wipe_error.is_raised()
    }

    /// Receiver that changes whenever the gate restarts after a wipe.
    pub fn subscribe_restarts(&self) -> watch::Receiver<u64> {
        self.restarts.subscribe()
    }

    pub fn status(&self) -> GateStatus {
        let in_setup = self.state == GateState::NeedsSetup;
        let setup_error = if self.setup_mismatch.is_raised() {
            Some(GateError::PassphraseMismatch.to_string())
        } else {
            self.setup_notice.clone()
        };

        GateStatus {
            state: self.state,
            setup_step: in_setup.then(|| self.setup.step()),
            setup_error: setup_error.filter(|_| in_setup),
            unlock_error: self.unlock_error.is_raised(),
            wipe_error: self.wipe_error.is_raised(),
            stealth_mode: self.store.record().is_stealth_mode,
            session_opened_at: self.session.opened_at(),
            generation: *self.restarts.borrow(),
        }
    }

    // ========== Setup ==========

    /// Submit one entry of the two-step setup protocol.
    ///
    /// Returns the state after the entry: still `NeedsSetup` after the first
    /// entry, `Unlocked` once the confirmation matches.
    pub fn submit_setup(&mut self, input: &str) -> Result<GateState, GateError> {
        if self.state != GateState::NeedsSetup {
            return Err(GateError::NotPermitted {
                state: self.state,
                action: "setup",
            });
        }

        match self.setup.submit(input) {
            Ok(SetupProgress::AwaitingConfirmation) => {
                self.setup_notice = None;
                self.setup_mismatch.clear();
                Ok(self.state)
            }
            Ok(SetupProgress::Complete(passphrase)) => {
                let next = match self.dispatch(GateEvent::SetupCompleted(&passphrase)) {
                    Ok(next) => next,
                    Err(e) => {
                        // Stay on the confirmation step so it can be retried.
                        self.setup.resume(passphrase);
                        return Err(e);
                    }
                };
                self.setup.reset();
                self.setup_notice = None;
                self.setup_mismatch.clear();
                Ok(next)
            }
            Err(GateError::PassphraseMismatch) => {
                self.setup_notice = None;
                self.setup_mismatch.raise();
                info!("Setup confirmation mismatch, restarting setup");
                Err(GateError::PassphraseMismatch)
            }
            Err(e) => {
                self.setup_notice = Some(e.to_string());
                Err(e)
            }
        }
    }

    // ========== Lock Screen ==========

    /// Register a tap on the decoy header.
    ///
    /// Returns `true` when the tap revealed the prompt. Taps outside the
    /// decoy screen are ignored.
    pub fn tap(&mut self) -> Result<bool, GateError> {
        if self.state != GateState::LockedDecoy {
            return Ok(false);
        }

        match self.gesture.register_tap() {
            Some(RevealSignal) => {
                self.dispatch(GateEvent::RevealGesture)?;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Close the prompt and go back to the decoy screen.
    pub fn dismiss_prompt(&mut self) -> Result<GateState, GateError> {
        self.dispatch(GateEvent::DismissPrompt)
    }

    /// Submit a passphrase at the prompt.
    ///
    /// `Ok(true)` iff it equals the stored passphrase. A mismatch raises the
    /// unlock indicator and changes nothing else.
    pub fn unlock(&mut self, passphrase: &str) -> Result<bool, GateError> {
        let next = self.dispatch(GateEvent::SubmitPassphrase(passphrase))?;
        let unlocked = next == GateState::Unlocked;
        if !unlocked {
            warn!("Unlock attempt rejected");
        }
        Ok(unlocked)
    }

    /// Terminate the session.
    pub fn lock(&mut self) -> Result<GateState, GateError> {
        self.dispatch(GateEvent::Lock)
    }

    // ========== Protected Interface ==========

    pub fn require_unlocked(&self) -> Result<(), GateError> {
        if self.state == GateState::Unlocked && self.session.is_unlocked() {
            Ok(())
        } else {
            Err(GateError::Locked)
        }
    }

    /// Current record, only while unlocked.
    pub fn settings(&self) -> Result<&AegisConfig, GateError> {
        self.require_unlocked()?;
        Ok(self.store.record())
    }

    /// Apply a settings change and persist it.
    ///
    /// Only first-run setup may write the passphrase.
    pub fn update_settings(&mut self, patch: ConfigPatch) -> Result<AegisConfig, GateError> {
        self.require_unlocked()?;

        if patch.master_password.is_some() {
            return Err(GateError::NotPermitted {
                state: self.state,
                action: "change the passphrase",
            });
        }
        if patch
            .youtube_daily_limit
            .is_some_and(|limit| limit > YOUTUBE_LIMIT_MAX)
        {
            return Err(GateError::LimitOutOfRange {
                max: YOUTUBE_LIMIT_MAX,
            });
        }
        if patch.is_empty() {
            return Ok(self.store.record().clone());
        }

        let updated = self.store.update(patch)?;
        info!(
            block_adult_content = updated.block_adult_content,
            block_escort_sites = updated.block_escort_sites,
            block_short_videos = updated.block_short_videos,
            youtube_daily_limit = updated.youtube_daily_limit,
            "Settings updated"
        );
        Ok(updated)
    }

    /// Critical wipe.
    ///
    /// With the matching passphrase the record is erased and the gate
    /// restarts into first-run setup; otherwise nothing changes and the wipe
    /// indicator is raised.
    pub fn wipe(&mut self, passphrase: &str) -> Result<bool, GateError> {
        let next = self.dispatch(GateEvent::Wipe(passphrase))?;
        let wiped = next == GateState::NeedsSetup;
        if !wiped {
            warn!("Wipe attempt rejected");
        }
        Ok(wiped)
    }

    // ========== Internals ==========

    fn dispatch(&mut self, event: GateEvent<'_>) -> Result<GateState, GateError> {
        let from = self.state;
        let Transition { next, effects } =
            machine::transition(from, &event, self.store.record())?;

        for effect in effects {
            self.apply(effect)?;
        }
        self.state = next;

        if from != next {
            info!(from = %from, to = %next, action = event.name(), "Gate transition");
        }
        Ok(next)
    }

    fn apply(&mut self, effect: Effect) -> Result<(), GateError> {
        match effect {
            Effect::PersistPassphrase(passphrase) => {
                self.store
                    .update(ConfigPatch::master_password(passphrase))?;
            }
            Effect::OpenSession => self.session.open(),
            Effect::CloseSession => {
                self.session.close();
                self.gesture.reset();
            }
            Effect::RaiseUnlockError => self.unlock_error.raise(),
            Effect::RaiseWipeError => self.wipe_error.raise(),
            Effect::EraseStore => self.store.wipe()?,
            Effect::Restart => self.restart(),
        }
        Ok(())
    }

    /// Return to the state of a freshly started process.
    fn restart(&mut self) {
        self.store.reload();
        self.state = GateState::initial(self.store.record());
        self.session = SessionController::new();
        self.gesture.reset();
        self.setup.reset();
        self.setup_notice = None;
        self.setup_mismatch.clear();
        self.unlock_error.clear();
        self.wipe_error.clear();
        self.restarts.send_modify(|generation| *generation += 1);

        info!(
            generation = *self.restarts.borrow(),
            state = %self.state,
            "Gate restarted"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{KeyValueStore, MemoryStore, CONFIG_KEY};
    use std::sync::Arc;

    const PASSPHRASE: &str = "correct-horse-battery15";

    fn fresh() -> (Arc<dyn KeyValueStore>, Gate) {
        let backend: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());
        let gate = Gate::new(ConfigStore::load(Arc::clone(&backend)));
        (backend, gate)
    }

    fn provisioned() -> (Arc<dyn KeyValueStore>, Gate) {
        let backend: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());
        let mut store = ConfigStore::load(Arc::clone(&backend));
        store
            .update(ConfigPatch::master_password(PASSPHRASE))
            .unwrap();
        let gate = Gate::new(ConfigStore::load(Arc::clone(&backend)));
        (backend, gate)
    }

    fn reveal(gate: &mut Gate) {
        assert!(!gate.tap().unwrap());
        assert!(!gate.tap().unwrap());
        assert!(gate.tap().unwrap());
        assert_eq!(gate.state(), GateState::LockedPrompt);
    }

    fn unlocked() -> (Arc<dyn KeyValueStore>, Gate) {
        let (backend, mut gate) = provisioned();
        reveal(&mut gate);
        assert!(gate.unlock(PASSPHRASE).unwrap());
        (backend, gate)
    }

    #[tokio::test]
    async fn first_run_setup_unlocks_and_persists() {
        let (backend, mut gate) = fresh();
        assert_eq!(gate.state(), GateState::NeedsSetup);
        assert_eq!(gate.config().master_password, "");

        assert_eq!(
            gate.submit_setup("aaaaaaaaaaaaaaa").unwrap(),
            GateState::NeedsSetup
        );
        assert_eq!(gate.setup_step(), SetupStep::Confirm);

        assert_eq!(
            gate.submit_setup("aaaaaaaaaaaaaaa").unwrap(),
            GateState::Unlocked
        );
        assert!(gate.is_unlocked());

        let reloaded = ConfigStore::load(backend);
        assert_eq!(reloaded.record().master_password, "aaaaaaaaaaaaaaa");
    }

    #[tokio::test]
    async fn short_setup_entry_shows_inline_error() {
        let (_backend, mut gate) = fresh();
        let err = gate.submit_setup("too-short").unwrap_err();
        assert!(matches!(err, GateError::PassphraseTooShort { min: 15 }));

        let status = gate.status();
        assert_eq!(status.state, GateState::NeedsSetup);
        assert_eq!(status.setup_step, Some(SetupStep::Create));
        assert_eq!(
            status.setup_error.as_deref(),
            Some("Minimum 15 characters required.")
        );

        gate.submit_setup("long-enough-passphrase").unwrap();
        assert_eq!(gate.status().setup_error, None);
    }

    #[tokio::test(start_paused = true)]
    async fn setup_mismatch_restarts_protocol() {
        let (backend, mut gate) = fresh();
        gate.submit_setup("first-passphrase-value").unwrap();
        let err = gate.submit_setup("other-passphrase-value").unwrap_err();
        assert!(matches!(err, GateError::PassphraseMismatch));

        let status = gate.status();
        assert_eq!(status.setup_step, Some(SetupStep::Create));
        assert_eq!(status.setup_error.as_deref(), Some("Passwords mismatch."));
        assert_eq!(backend.get(CONFIG_KEY).unwrap(), None);

        tokio::time::sleep(SETUP_MISMATCH_HOLD + Duration::from_millis(1)).await;
        assert_eq!(gate.status().setup_error, None);
    }

    #[tokio::test(start_paused = true)]
    async fn wrong_then_right_passphrase() {
        let (backend, mut gate) = provisioned();
        assert_eq!(gate.state(), GateState::LockedDecoy);
        reveal(&mut gate);

        let before = backend.get(CONFIG_KEY).unwrap();
        assert!(!gate.unlock("wrong").unwrap());
        assert_eq!(gate.state(), GateState::LockedPrompt);
        assert!(gate.unlock_error());
        assert_eq!(backend.get(CONFIG_KEY).unwrap(), before);

        tokio::time::sleep(UNLOCK_ERROR_HOLD + Duration::from_millis(1)).await;
        assert!(!gate.unlock_error());

        assert!(gate.unlock(PASSPHRASE).unwrap());
        assert_eq!(gate.state(), GateState::Unlocked);
        assert!(gate.is_unlocked());
    }

    #[tokio::test]
    async fn unlimited_attempts() {
        let (_backend, mut gate) = provisioned();
        reveal(&mut gate);
        for _ in 0..50 {
            assert!(!gate.unlock("guess-guess-guess").unwrap());
        }
        assert!(gate.unlock(PASSPHRASE).unwrap());
    }

    #[tokio::test]
    async fn dismiss_returns_to_decoy() {
        let (_backend, mut gate) = provisioned();
        reveal(&mut gate);
        assert_eq!(gate.dismiss_prompt().unwrap(), GateState::LockedDecoy);
        assert!(!gate.is_unlocked());
    }

    #[tokio::test]
    async fn taps_outside_decoy_are_ignored() {
        let (_backend, mut gate) = fresh();
        for _ in 0..5 {
            assert!(!gate.tap().unwrap());
        }
        assert_eq!(gate.state(), GateState::NeedsSetup);
    }

    #[tokio::test]
    async fn lock_keeps_configuration() {
        let (backend, mut gate) = unlocked();
        let before = backend.get(CONFIG_KEY).unwrap();

        assert_eq!(gate.lock().unwrap(), GateState::LockedDecoy);
        assert!(!gate.is_unlocked());
        assert_eq!(backend.get(CONFIG_KEY).unwrap(), before);
        assert!(matches!(gate.settings(), Err(GateError::Locked)));
    }

    #[tokio::test]
    async fn settings_require_session() {
        let (_backend, mut gate) = provisioned();
        let err = gate
            .update_settings(ConfigPatch {
                block_adult_content: Some(false),
                ..ConfigPatch::default()
            })
            .unwrap_err();
        assert!(matches!(err, GateError::Locked));
    }

    #[tokio::test]
    async fn settings_update_persists() {
        let (backend, mut gate) = unlocked();
        let updated = gate
            .update_settings(ConfigPatch {
                youtube_daily_limit: Some(120),
                block_escort_sites: Some(false),
                ..ConfigPatch::default()
            })
            .unwrap();

        assert_eq!(updated.youtube_daily_limit, 120);
        assert_eq!(ConfigStore::load(backend).record(), &updated);
    }

    #[tokio::test]
    async fn settings_reject_bad_limit_and_passphrase() {
        let (_backend, mut gate) = unlocked();

        let err = gate
            .update_settings(ConfigPatch {
                youtube_daily_limit: Some(121),
                ..ConfigPatch::default()
            })
            .unwrap_err();
        assert!(matches!(err, GateError::LimitOutOfRange { max: 120 }));

        let err = gate
            .update_settings(ConfigPatch::master_password("replacement-passphrase"))
            .unwrap_err();
        assert!(matches!(err, GateError::NotPermitted { .. }));
        assert_eq!(gate.config().master_password, PASSPHRASE);
    }

    #[tokio::test(start_paused = true)]
    async fn wrong_wipe_leaves_record_untouched() {
        let (backend, mut gate) = unlocked();
        let before = ConfigStore::load(Arc::clone(&backend)).record().clone();

        assert!(!gate.wipe("not-the-passphrase").unwrap());
        assert_eq!(gate.state(), GateState::Unlocked);
        assert!(gate.wipe_error());
        assert_eq!(ConfigStore::load(Arc::clone(&backend)).record(), &before);

        tokio::time::sleep(Duration::from_millis(1999)).await;
        assert!(gate.wipe_error());
        tokio::time::sleep(Duration::from_millis(2)).await;
        assert!(!gate.wipe_error());
    }

    #[tokio::test]
    async fn wipe_restarts_into_setup() {
        let (backend, mut gate) = unlocked();
        let restarts = gate.subscribe_restarts();
        assert_eq!(*restarts.borrow(), 0);

        assert!(gate.wipe(PASSPHRASE).unwrap());

        assert_eq!(gate.state(), GateState::NeedsSetup);
        assert!(!gate.is_unlocked());
        assert_eq!(gate.config(), &AegisConfig::default());
        assert_eq!(backend.get(CONFIG_KEY).unwrap(), None);
        assert!(restarts.has_changed().unwrap());
        assert_eq!(gate.status().generation, 1);
        assert_eq!(gate.status().setup_step, Some(SetupStep::Create));
    }

    #[tokio::test]
    async fn actions_in_wrong_state_are_rejected() {
        let (_backend, mut gate) = provisioned();
        assert!(matches!(
            gate.unlock(PASSPHRASE),
            Err(GateError::NotPermitted {
                state: GateState::LockedDecoy,
                action: "unlock"
            })
        ));
        assert!(matches!(
            gate.submit_setup("another-passphrase-1"),
            Err(GateError::NotPermitted { .. })
        ));
        assert!(matches!(gate.lock(), Err(GateError::NotPermitted { .. })));
        assert!(matches!(
            gate.wipe(PASSPHRASE),
            Err(GateError::NotPermitted { .. })
        ));
    }

    struct ReadOnlyStore;

    impl KeyValueStore for ReadOnlyStore {
        fn get(&self, _key: &str) -> crate::storage::StorageResult<Option<String>> {
            Ok(None)
        }

        fn set(&self, _key: &str, _value: &str) -> crate::storage::StorageResult<()> {
            Err(StorageError::Integrity("read-only".into()))
        }

        fn remove(&self, _key: &str) -> crate::storage::StorageResult<()> {
            Ok(())
        }
    }

    #[tokio::test]
    async fn failed_setup_write_keeps_confirmation_step() {
        let mut gate = Gate::new(ConfigStore::load(Arc::new(ReadOnlyStore)));
        gate.submit_setup(PASSPHRASE).unwrap();

        assert!(matches!(
            gate.submit_setup(PASSPHRASE),
            Err(GateError::Storage(_))
        ));
        assert_eq!(gate.state(), GateState::NeedsSetup);
        assert_eq!(gate.setup_step(), SetupStep::Confirm);
        assert!(!gate.is_unlocked());
    }

    #[tokio::test]
    async fn mistyped_field_keeps_stored_passphrase() {
        let backend: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());
        backend
            .set(
                CONFIG_KEY,
                &serde_json::json!({
                    "masterPassword": PASSPHRASE,
                    "youtubeDailyLimit": -5,
                    "blockAdultContent": false
                })
                .to_string(),
            )
            .unwrap();

        let mut gate = Gate::new(ConfigStore::load(backend));
        assert_eq!(gate.state(), GateState::LockedDecoy);
        assert!(!gate.config().block_adult_content);

        reveal(&mut gate);
        assert!(gate.unlock(PASSPHRASE).unwrap());
    }
}
