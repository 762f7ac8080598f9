//! Integration tests for idle session eviction.

mod common;

use std::time::Duration;

use axum::http::StatusCode;
use common::{body_json, get, post, post_json};
use juniordream_api::state::AppState;
use juniordream_api::sweeper::sweep_idle_sessions;
use juniordream_core::backend::SimulatedBackend;
use serde_json::json;

const MAX_IDLE: Duration = Duration::from_secs(30 * 60);

fn test_state() -> AppState {
    AppState::new(common::test_config(), std::sync::Arc::new(SimulatedBackend::instant()))
}

async fn create(app: &axum::Router, uri: &str, body: Option<serde_json::Value>) -> String {
    let response = match body {
        Some(body) => post_json(app.clone(), uri, body).await,
        None => post(app.clone(), uri).await,
    };
    assert_eq!(response.status(), StatusCode::CREATED);
    body_json(response).await["data"]["id"]
        .as_str()
        .unwrap()
        .to_string()
}

fn plan() -> serde_json::Value {
    json!({
        "name": "Pro",
        "class_range": "Class 9-10",
        "monthly_fee": "₹2,999",
        "annual_fee": "₹29,999"
    })
}

// ---------------------------------------------------------------------------
// Test: abandoned checkouts and onboarding sessions are evicted
// ---------------------------------------------------------------------------

#[tokio::test(start_paused = true)]
async fn abandoned_sessions_are_evicted() {
    let state = test_state();
    let app = common::build_app(state.clone());

    let checkout = create(&app, "/api/v1/checkouts", Some(json!({ "plan": plan() }))).await;
    let onboarding = create(&app, "/api/v1/onboarding-sessions", None).await;
    assert_eq!(state.checkouts.len().await, 1);
    assert_eq!(state.onboarding.len().await, 1);

    tokio::time::advance(MAX_IDLE + Duration::from_secs(1)).await;
    assert_eq!(sweep_idle_sessions(&state, MAX_IDLE).await, 2);

    let response = get(app.clone(), &format!("/api/v1/checkouts/{checkout}")).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let response = get(app, &format!("/api/v1/onboarding-sessions/{onboarding}")).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

// ---------------------------------------------------------------------------
// Test: any request keeps a session alive
// ---------------------------------------------------------------------------

#[tokio::test(start_paused = true)]
async fn active_sessions_survive_the_sweep() {
    let state = test_state();
    let app = common::build_app(state.clone());

    let active = create(&app, "/api/v1/onboarding-sessions", None).await;
    let idle = create(&app, "/api/v1/onboarding-sessions", None).await;

    tokio::time::advance(MAX_IDLE - Duration::from_secs(60)).await;
    let response = get(app.clone(), &format!("/api/v1/onboarding-sessions/{active}")).await;
    assert_eq!(response.status(), StatusCode::OK);
    tokio::time::advance(Duration::from_secs(120)).await;

    assert_eq!(sweep_idle_sessions(&state, MAX_IDLE).await, 1);
    let response = get(app.clone(), &format!("/api/v1/onboarding-sessions/{active}")).await;
    assert_eq!(response.status(), StatusCode::OK);
    let response = get(app, &format!("/api/v1/onboarding-sessions/{idle}")).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
