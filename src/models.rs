// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Data Models
//!
//! This module defines the persisted configuration record and the request
//! and response structures used by the REST API. API types derive
//! `Serialize`, `Deserialize`, and `ToSchema` for automatic JSON handling
//! and OpenAPI documentation.
//!
//! ## Model Categories
//!
//! - **Configuration**: the single persisted record and partial updates to it
//! - **Usage statistics**: fabricated figures shown on the dashboard
//! - **Requests**: passphrase submissions and settings patches

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Upper bound for the YouTube daily limit, in minutes.
pub const YOUTUBE_LIMIT_MAX: u32 = 120;

// =============================================================================
// Configuration Record
// =============================================================================

/// The persisted configuration record.
///
/// Stored as a single JSON object with camelCase keys. Missing keys are
/// backfilled from [`AegisConfig::default`] when a record is loaded, so a
/// blob written by an older build always deserializes into a full record.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase", default)]
pub struct AegisConfig {
    pub block_adult_content: bool,
    pub block_escort_sites: bool,
    pub block_short_videos: bool,
    /// Daily quota in minutes, `0..=120`.
    pub youtube_daily_limit: u32,
    /// Advisory only. Access is gated by the runtime session, not this flag.
    pub is_locked: bool,
    /// Cleartext master passphrase. Empty until first-run setup completes.
    pub master_password: String,
    pub is_stealth_mode: bool,
    /// Declared but never consulted.
    pub deep_freeze_active: bool,
}

impl Default for AegisConfig {
    fn default() -> Self {
        Self {
            block_adult_content: true,
            block_escort_sites: true,
            block_short_videos: true,
            youtube_daily_limit: 45,
            is_locked: true,
            master_password: String::new(),
            is_stealth_mode: true,
            deep_freeze_active: true,
        }
    }
}

impl AegisConfig {
    /// Whether first-run setup has stored a passphrase.
    pub fn has_passphrase(&self) -> bool {
        !self.master_password.is_empty()
    }

    /// Exact comparison against the stored passphrase.
    pub fn passphrase_matches(&self, candidate: &str) -> bool {
        self.master_password == candidate
    }
}

/// Partial update to the configuration record.
///
/// Every `Some` field replaces the corresponding field; `None` keeps it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigPatch {
    pub block_adult_content: Option<bool>,
    pub block_escort_sites: Option<bool>,
    pub block_short_videos: Option<bool>,
    pub youtube_daily_limit: Option<u32>,
    pub is_locked: Option<bool>,
    pub master_password: Option<String>,
    pub is_stealth_mode: Option<bool>,
    pub deep_freeze_active: Option<bool>,
}

impl ConfigPatch {
    /// Patch that only sets the master passphrase.
    pub fn master_password(passphrase: impl Into<String>) -> Self {
        Self {
            master_password: Some(passphrase.into()),
            ..Self::default()
        }
    }

    /// Returns `base` with the fields of this patch applied.
    pub fn apply(self, base: &AegisConfig) -> AegisConfig {
        AegisConfig {
            block_adult_content: self.block_adult_content.unwrap_or(base.block_adult_content),
            block_escort_sites: self.block_escort_sites.unwrap_or(base.block_escort_sites),
            block_short_videos: self.block_short_videos.unwrap_or(base.block_short_videos),
            youtube_daily_limit: self.youtube_daily_limit.unwrap_or(base.youtube_daily_limit),
            is_locked: self.is_locked.unwrap_or(base.is_locked),
            master_password: self
                .master_password
                .unwrap_or_else(|| base.master_password.clone()),
            is_stealth_mode: self.is_stealth_mode.unwrap_or(base.is_stealth_mode),
            deep_freeze_active: self.deep_freeze_active.unwrap_or(base.deep_freeze_active),
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

// =============================================================================
// Settings API Models
// =============================================================================

/// Configuration record as exposed to the display layer.
///
/// Never carries the master passphrase.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SettingsView {
    pub block_adult_content: bool,
    pub block_escort_sites: bool,
    pub block_short_videos: bool,
    pub youtube_daily_limit: u32,
    pub is_locked: bool,
    pub is_stealth_mode: bool,
    pub deep_freeze_active: bool,
}

impl From<&AegisConfig> for SettingsView {
    fn from(config: &AegisConfig) -> Self {
        Self {
            block_adult_content: config.block_adult_content,
            block_escort_sites: config.block_escort_sites,
            block_short_videos: config.block_short_videos,
            youtube_daily_limit: config.youtube_daily_limit,
            is_locked: config.is_locked,
            is_stealth_mode: config.is_stealth_mode,
            deep_freeze_active: config.deep_freeze_active,
        }
    }
}

/// Request body for `PATCH /v1/settings`.
///
/// The master passphrase is deliberately absent: only first-run setup
/// writes it. Unknown keys (including `masterPassword`) are rejected.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct SettingsPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub block_adult_content: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub block_escort_sites: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub block_short_videos: Option<bool>,
    /// Minutes, `0..=120`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub youtube_daily_limit: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_locked: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_stealth_mode: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deep_freeze_active: Option<bool>,
}

impl From<SettingsPatch> for ConfigPatch {
    fn from(patch: SettingsPatch) -> Self {
        Self {
            block_adult_content: patch.block_adult_content,
            block_escort_sites: patch.block_escort_sites,
            block_short_videos: patch.block_short_videos,
            youtube_daily_limit: patch.youtube_daily_limit,
            is_locked: patch.is_locked,
            master_password: None,
            is_stealth_mode: patch.is_stealth_mode,
            deep_freeze_active: patch.deep_freeze_active,
        }
    }
}

/// Request carrying a passphrase (setup, unlock, wipe).
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct PassphraseRequest {
    pub passphrase: String,
}

// =============================================================================
// Usage Statistics
// =============================================================================

/// Threat level badge shown on the dashboard.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
#[serde(rename_all = "UPPERCASE")]
pub enum ThreatLevel {
    Low,
    Medium,
    Critical,
}

/// Fabricated usage figures. Nothing measures these.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct UsageStats {
    /// Minutes of YouTube watched today.
    pub today_youtube: f64,
    pub blocked_attempts: u64,
    pub threat_level: ThreatLevel,
    pub last_sync: DateTime<Utc>,
}

impl UsageStats {
    /// The figures the dashboard starts with.
    pub fn initial(last_sync: DateTime<Utc>) -> Self {
        Self {
            today_youtube: 15.0,
            blocked_attempts: 892,
            threat_level: ThreatLevel::Critical,
            last_sync,
        }
    }
}
