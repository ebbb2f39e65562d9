// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Dashboard, guide and decoy screen figures.

use axum::{extract::State, Json};

use crate::{
    error::ApiError,
    shell::{DashboardSummary, DecoyDiagnostics, SystemGuide},
    state::AppState,
};

#[utoipa::path(
    get,
    path = "/v1/dashboard",
    tag = "Shell",
    responses(
        (status = 200, body = DashboardSummary),
        (status = 403, description = "Interface is locked")
    )
)]
pub async fn dashboard(State(state): State<AppState>) -> Result<Json<DashboardSummary>, ApiError> {
    let gate = state.gate.lock().await;
    let config = gate.settings()?;
    Ok(Json(DashboardSummary::build(config, &state.stats)))
}

#[utoipa::path(
    get,
    path = "/v1/guide",
    tag = "Shell",
    responses(
        (status = 200, body = SystemGuide),
        (status = 403, description = "Interface is locked")
    )
)]
pub async fn guide(State(state): State<AppState>) -> Result<Json<SystemGuide>, ApiError> {
    state.gate.lock().await.require_unlocked()?;
    Ok(Json(SystemGuide::default()))
}

/// Random figures for the decoy lock screen. Always available.
#[utoipa::path(
    get,
    path = "/v1/decoy/diagnostics",
    tag = "Shell",
    responses((status = 200, body = DecoyDiagnostics))
)]
pub async fn decoy_diagnostics() -> Json<DecoyDiagnostics> {
    Json(DecoyDiagnostics::sample(&mut rand::thread_rng()))
}
