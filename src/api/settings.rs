// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Settings endpoints. All of them require an open session.

use axum::{extract::State, Json};

use crate::{
    error::ApiError,
    gate::{GateError, GateStatus},
    models::{PassphraseRequest, SettingsPatch, SettingsView},
    state::AppState,
};

#[utoipa::path(
    get,
    path = "/v1/settings",
    tag = "Settings",
    responses(
        (status = 200, body = SettingsView),
        (status = 403, description = "Interface is locked")
    )
)]
pub async fn get_settings(State(state): State<AppState>) -> Result<Json<SettingsView>, ApiError> {
    let gate = state.gate.lock().await;
    let config = gate.settings()?;
    Ok(Json(SettingsView::from(config)))
}

/// Toggle blocking flags or change the daily limit.
#[utoipa::path(
    patch,
    path = "/v1/settings",
    request_body = SettingsPatch,
    tag = "Settings",
    responses(
        (status = 200, body = SettingsView),
        (status = 403, description = "Interface is locked"),
        (status = 422, description = "Daily limit out of range")
    )
)]
pub async fn update_settings(
    State(state): State<AppState>,
    Json(patch): Json<SettingsPatch>,
) -> Result<Json<SettingsView>, ApiError> {
    let mut gate = state.gate.lock().await;
    let updated = gate.update_settings(patch.into())?;
    Ok(Json(SettingsView::from(&updated)))
}

/// Erase the configuration and restart into first-run setup.
#[utoipa::path(
    post,
    path = "/v1/settings/wipe",
    request_body = PassphraseRequest,
    tag = "Settings",
    responses(
        (status = 200, description = "Wiped; gate restarted", body = GateStatus),
        (status = 401, description = "Passphrase does not match"),
        (status = 409, description = "No open session")
    )
)]
pub async fn wipe(
    State(state): State<AppState>,
    Json(request): Json<PassphraseRequest>,
) -> Result<Json<GateStatus>, ApiError> {
    let mut gate = state.gate.lock().await;
    if gate.wipe(&request.passphrase)? {
        Ok(Json(gate.status()))
    } else {
        Err(GateError::AuthFailure.into())
    }
}
