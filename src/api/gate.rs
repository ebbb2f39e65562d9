// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Gate endpoints: setup, reveal gesture, unlock and lock.

use axum::{extract::State, Json};
use serde::Serialize;
use utoipa::ToSchema;

use crate::{
    error::ApiError,
    gate::{GateError, GateStatus},
    models::PassphraseRequest,
    state::AppState,
};

/// Response for `POST /v1/gate/tap`.
#[derive(Debug, Serialize, ToSchema)]
pub struct TapResponse {
    /// Whether this tap completed the reveal gesture.
    pub revealed: bool,
    pub status: GateStatus,
}

#[utoipa::path(
    get,
    path = "/v1/gate",
    tag = "Gate",
    responses((status = 200, body = GateStatus))
)]
pub async fn get_status(State(state): State<AppState>) -> Json<GateStatus> {
    let gate = state.gate.lock().await;
    Json(gate.status())
}

/// Submit one entry of first-run setup (create, then confirm).
#[utoipa::path(
    post,
    path = "/v1/gate/setup",
    request_body = PassphraseRequest,
    tag = "Gate",
    responses(
        (status = 200, description = "Entry accepted", body = GateStatus),
        (status = 409, description = "Setup already completed"),
        (status = 422, description = "Too short, or confirmation mismatch")
    )
)]
pub async fn submit_setup(
    State(state): State<AppState>,
    Json(request): Json<PassphraseRequest>,
) -> Result<Json<GateStatus>, ApiError> {
    let mut gate = state.gate.lock().await;
    gate.submit_setup(&request.passphrase)?;
    Ok(Json(gate.status()))
}

/// Register a tap on the decoy screen header.
#[utoipa::path(
    post,
    path = "/v1/gate/tap",
    tag = "Gate",
    responses((status = 200, body = TapResponse))
)]
pub async fn tap(State(state): State<AppState>) -> Result<Json<TapResponse>, ApiError> {
    let mut gate = state.gate.lock().await;
    let revealed = gate.tap()?;
    Ok(Json(TapResponse {
        revealed,
        status: gate.status(),
    }))
}

#[utoipa::path(
    post,
    path = "/v1/gate/prompt/dismiss",
    tag = "Gate",
    responses(
        (status = 200, body = GateStatus),
        (status = 409, description = "Prompt is not open")
    )
)]
pub async fn dismiss_prompt(State(state): State<AppState>) -> Result<Json<GateStatus>, ApiError> {
    let mut gate = state.gate.lock().await;
    gate.dismiss_prompt()?;
    Ok(Json(gate.status()))
}

#[utoipa::path(
    post,
    path = "/v1/gate/unlock",
    request_body = PassphraseRequest,
    tag = "Gate",
    responses(
        (status = 200, description = "Unlocked", body = GateStatus),
        (status = 401, description = "Passphrase does not match"),
        (status = 409, description = "Prompt is not open")
    )
)]
pub async fn unlock(
    State(state): State<AppState>,
    Json(request): Json<PassphraseRequest>,
) -> Result<Json<GateStatus>, ApiError> {
    let mut gate = state.gate.lock().await;
    if gate.unlock(&request.passphrase)? {
        Ok(Json(gate.status()))
    } else {
        Err(GateError::AuthFailure.into())
    }
}

/// Terminate the session and return to the decoy screen.
#[utoipa::path(
    post,
    path = "/v1/gate/lock",
    tag = "Gate",
    responses(
        (status = 200, body = GateStatus),
        (status = 409, description = "No open session")
    )
)]
pub async fn lock(State(state): State<AppState>) -> Result<Json<GateStatus>, ApiError> {
    let mut gate = state.gate.lock().await;
    gate.lock()?;
    Ok(Json(gate.status()))
}
