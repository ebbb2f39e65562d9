// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::{
    gate::{GateState, GateStatus, SetupStep},
    models::{PassphraseRequest, SettingsPatch, SettingsView, ThreatLevel, UsageStats},
    shell::{
        DashboardSummary, DecoyDiagnostics, NeutralizationEntry, ProtectionTile, SystemGuide,
    },
    state::AppState,
};

pub mod gate;
pub mod health;
pub mod settings;
pub mod shell;

pub fn router(state: AppState) -> Router {
    let v1_routes = Router::new()
        // Gate
        .route("/gate", get(gate::get_status))
        .route("/gate/setup", post(gate::submit_setup))
        .route("/gate/tap", post(gate::tap))
        .route("/gate/prompt/dismiss", post(gate::dismiss_prompt))
        .route("/gate/unlock", post(gate::unlock))
        .route("/gate/lock", post(gate::lock))
        // Settings
        .route(
            "/settings",
            get(settings::get_settings).patch(settings::update_settings),
        )
        .route("/settings/wipe", post(settings::wipe))
        // Shell
        .route("/dashboard", get(shell::dashboard))
        .route("/guide", get(shell::guide))
        .route("/decoy/diagnostics", get(shell::decoy_diagnostics))
        .with_state(state.clone());

    let health_routes = Router::new()
        .route("/health", get(health::health))
        .route("/health/live", get(health::liveness))
        .route("/health/ready", get(health::readiness))
        .with_state(state);

    Router::new()
        .nest("/v1", v1_routes)
        .merge(health_routes)
        .merge(SwaggerUi::new("/docs").url("/api-doc/openapi.json", ApiDoc::openapi()))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}

#[derive(OpenApi)]
#[openapi(
    paths(
        gate::get_status,
        gate::submit_setup,
        gate::tap,
        gate::dismiss_prompt,
        gate::unlock,
        gate::lock,
        settings::get_settings,
        settings::update_settings,
        settings::wipe,
        shell::dashboard,
        shell::guide,
        shell::decoy_diagnostics,
        health::health,
        health::liveness,
        health::readiness
    ),
    components(
        schemas(
            GateState,
            GateStatus,
            SetupStep,
            gate::TapResponse,
            PassphraseRequest,
            SettingsView,
            SettingsPatch,
            UsageStats,
            ThreatLevel,
            DashboardSummary,
            ProtectionTile,
            NeutralizationEntry,
            SystemGuide,
            DecoyDiagnostics,
            health::ReadyResponse,
            health::HealthChecks,
            health::HealthResponse
        )
    ),
    tags(
        (name = "Gate", description = "Decoy screen, reveal gesture and unlock"),
        (name = "Settings", description = "Blocking configuration and factory reset"),
        (name = "Shell", description = "Dashboard, guide and decoy figures"),
        (name = "Health", description = "Liveness and readiness probes")
    )
)]
struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::{to_bytes, Body},
        http::{Request, StatusCode},
    };
    use serde_json::{json, Value};
    use tower::ServiceExt;

    const PASSPHRASE: &str = "router-passphrase-xyz";

    async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let builder = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(body) => builder
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, value)
    }

    #[tokio::test]
    async fn router_builds_with_all_routes() {
        let app = router(AppState::default());
        let _ = app.into_make_service();
    }

    #[test]
    fn openapi_lists_every_path() {
        let doc = ApiDoc::openapi();
        for path in [
            "/v1/gate",
            "/v1/gate/setup",
            "/v1/gate/tap",
            "/v1/gate/prompt/dismiss",
            "/v1/gate/unlock",
            "/v1/gate/lock",
            "/v1/settings",
            "/v1/settings/wipe",
            "/v1/dashboard",
            "/v1/guide",
            "/v1/decoy/diagnostics",
            "/health",
            "/health/live",
            "/health/ready",
        ] {
            assert!(doc.paths.paths.contains_key(path), "missing {path}");
        }
    }

    #[tokio::test]
    async fn full_lifecycle_over_http() {
        let app = router(AppState::default());

        let (status, body) = send(&app, "GET", "/v1/gate", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["state"], "NEEDS_SETUP");
        assert_eq!(body["setupStep"], "CREATE");

        let entry = json!({ "passphrase": PASSPHRASE });
        let (status, body) = send(&app, "POST", "/v1/gate/setup", Some(entry.clone())).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["setupStep"], "CONFIRM");

        let (status, body) = send(&app, "POST", "/v1/gate/setup", Some(entry.clone())).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["state"], "UNLOCKED");

        let (status, body) = send(&app, "GET", "/v1/settings", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["youtubeDailyLimit"], 45);
        assert!(body.get("masterPassword").is_none());

        let (status, _) = send(&app, "POST", "/v1/gate/lock", None).await;
        assert_eq!(status, StatusCode::OK);

        let (status, body) = send(&app, "GET", "/v1/dashboard", None).await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(body["error"], "Interface is locked");

        for _ in 0..2 {
            let (_, body) = send(&app, "POST", "/v1/gate/tap", None).await;
            assert_eq!(body["revealed"], false);
        }
        let (_, body) = send(&app, "POST", "/v1/gate/tap", None).await;
        assert_eq!(body["revealed"], true);
        assert_eq!(body["status"]["state"], "LOCKED_PROMPT");

        let (status, body) = send(&app, "POST", "/v1/gate/unlock", Some(entry.clone())).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["state"], "UNLOCKED");

        let (status, body) = send(&app, "POST", "/v1/settings/wipe", Some(entry)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["state"], "NEEDS_SETUP");
        assert_eq!(body["generation"], 1);
    }

    #[tokio::test]
    async fn settings_patch_rejects_master_password() {
        let app = router(AppState::default());
        let entry = json!({ "passphrase": PASSPHRASE });
        send(&app, "POST", "/v1/gate/setup", Some(entry.clone())).await;
        send(&app, "POST", "/v1/gate/setup", Some(entry)).await;

        let (status, _) = send(
            &app,
            "PATCH",
            "/v1/settings",
            Some(json!({ "masterPassword": "another-long-passphrase" })),
        )
        .await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

        let (status, body) = send(
            &app,
            "PATCH",
            "/v1/settings",
            Some(json!({ "blockEscortSites": false })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["blockEscortSites"], false);
    }

    #[tokio::test]
    async fn decoy_and_health_are_public() {
        let app = router(AppState::default());

        let (status, body) = send(&app, "GET", "/v1/decoy/diagnostics", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["banner"], "System Hardware Diagnostic v4.2.0");

        let (status, body) = send(&app, "GET", "/health/live", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
    }
}
