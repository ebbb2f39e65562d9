// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Display Read Models
//!
//! Figures the display layer renders around the gate: the dashboard and
//! guide of the protected interface, and the decoy diagnostics shown on the
//! lock screen. All of it is decoration. Nothing here filters, measures or
//! enforces anything.

use rand::Rng;
use serde::Serialize;
use utoipa::ToSchema;

use crate::models::{AegisConfig, UsageStats};

/// Status line shown above the dashboard.
pub const STATUS_INSIGHT: &str = "PHANTOM PROTOCOL ACTIVE.";

/// Private DNS host the guide recommends.
pub const RECOMMENDED_DNS: &str = "adult-filter-dns.cleanbrowsing.org";

/// Banner of the decoy screen.
pub const DECOY_BANNER: &str = "System Hardware Diagnostic v4.2.0";

/// How often the decoy screen should ask for fresh figures.
pub const DECOY_REFRESH_MS: u64 = 2000;

const DECOY_BOOT_LOG: [&str; 4] = [
    "> initializing hardware link...",
    "> kernel verified: 5.15.0-generic",
    "> checking sector integrity... 100% OK",
    "> background sync active",
];

// =============================================================================
// Dashboard
// =============================================================================

/// One tile of the protection matrix.
#[derive(Debug, Clone, Serialize, ToSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ProtectionTile {
    pub label: String,
    pub active: bool,
    /// `Enabled` or `Bypassed`.
    pub state_label: String,
}

impl ProtectionTile {
    fn new(label: &str, active: bool) -> Self {
        Self {
            label: label.to_string(),
            active,
            state_label: if active { "Enabled" } else { "Bypassed" }.to_string(),
        }
    }
}

/// One row of the neutralization log: a category and its purge badge.
#[derive(Debug, Clone, Serialize, ToSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct NeutralizationEntry {
    pub category: String,
    pub badge: String,
}

const NEUTRALIZATION_LOG: [(&str, &str); 2] = [
    ("Escort Sites", "ACTIVE PURGE"),
    ("Shorts/Reels", "FILTERED"),
];

#[derive(Debug, Clone, Serialize, ToSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSummary {
    pub stats: UsageStats,
    pub status_insight: String,
    pub youtube_daily_limit: u32,
    /// `max(limit - watched, 0)`, rounded up.
    pub remaining_minutes: u32,
    /// Watched minutes, rounded down.
    pub spent_minutes: u32,
    pub neutralization_log: Vec<NeutralizationEntry>,
    pub protection_matrix: Vec<ProtectionTile>,
}

impl DashboardSummary {
    pub fn build(config: &AegisConfig, stats: &UsageStats) -> Self {
        let limit = f64::from(config.youtube_daily_limit);
        let remaining = (limit - stats.today_youtube).max(0.0).ceil() as u32;
        let spent = stats.today_youtube.max(0.0).floor() as u32;

        Self {
            stats: stats.clone(),
            status_insight: STATUS_INSIGHT.to_string(),
            youtube_daily_limit: config.youtube_daily_limit,
            remaining_minutes: remaining,
            spent_minutes: spent,
            neutralization_log: NEUTRALIZATION_LOG
                .iter()
                .map(|(category, badge)| NeutralizationEntry {
                    category: category.to_string(),
                    badge: badge.to_string(),
                })
                .collect(),
            protection_matrix: vec![
                ProtectionTile::new("Adult Gate", config.block_adult_content),
                ProtectionTile::new("Escort Purge", config.block_escort_sites),
                ProtectionTile::new("YouTube Curfew", config.youtube_daily_limit > 0),
            ],
        }
    }
}

// =============================================================================
// Guide
// =============================================================================

#[derive(Debug, Clone, Serialize, ToSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SystemGuide {
    /// Name the app is disguised as.
    pub disguise_name: String,
    pub disguise_icon: String,
    pub private_dns: String,
    pub private_dns_note: String,
}

impl Default for SystemGuide {
    fn default() -> Self {
        Self {
            disguise_name: "System Diagnostics".into(),
            disguise_icon: "Standard Gear".into(),
            private_dns: RECOMMENDED_DNS.into(),
            private_dns_note: "This must be set in your phone's Private DNS settings for 100% effectiveness.".into(),
        }
    }
}

// =============================================================================
// Decoy Diagnostics
// =============================================================================

/// Inert hardware figures for the decoy screen.
#[derive(Debug, Clone, Serialize, ToSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DecoyDiagnostics {
    pub banner: String,
    pub cpu_percent: u32,
    pub ram_percent: u32,
    pub network_mbps: f64,
    pub boot_log: Vec<String>,
    pub refresh_ms: u64,
}

impl DecoyDiagnostics {
    /// Fresh random figures: CPU 10..=29 %, RAM 40..=44 %, network
    /// 0.0..=5.0 MB/s with one decimal.
    pub fn sample<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let network_tenths: u32 = rng.gen_range(0..=50);

        Self {
            banner: DECOY_BANNER.to_string(),
            cpu_percent: rng.gen_range(10..30),
            ram_percent: rng.gen_range(40..45),
            network_mbps: f64::from(network_tenths) / 10.0,
            boot_log: DECOY_BOOT_LOG.iter().map(|line| line.to_string()).collect(),
            refresh_ms: DECOY_REFRESH_MS,
        }
    }
}
