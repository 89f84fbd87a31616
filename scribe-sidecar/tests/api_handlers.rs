//! Handler-level tests: the HTTP surface driven without a socket.

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde_json::json;
use std::sync::Arc;
use tokio_test::{assert_err, assert_ok};

use scribe_sidecar::api::handlers::{generate, health, recording};
use scribe_sidecar::api::state::AppState;
use scribe_sidecar::config::Config;
use scribe_sidecar::models::{
    Action, ActionType, GenerateRequest, Language, RawEventBatch, StartRecordingRequest,
};

fn state() -> Arc<AppState> {
    Arc::new(AppState::new(Config::default()))
}

fn start_request(file_name: &str) -> StartRecordingRequest {
    serde_json::from_value(json!({
        "fileName": file_name,
        "language": "python",
        "startUrl": "https://shop.test/"
    }))
    .unwrap()
}

// ============================================================================
// Test 1: Start / events / stop round trip
// ============================================================================

#[tokio::test]
async fn test_recording_lifecycle() {
    let state = state();

    let Json(started) = assert_ok!(
        recording::start_recording(State(state.clone()), Json(start_request("checkout"))).await
    );
    assert!(started.accepted);
    assert!(started.session_id.is_some());

    let now = chrono::Utc::now().timestamp_millis() as u64;
    let batch: RawEventBatch = serde_json::from_value(json!([
        {
            "type": "click",
            "timestamp": now + 10,
            "detail": 1,
            "target": {
                "tagName": "button",
                "attributes": { "data-testid": "add-to-cart" },
                "textContent": "Add"
            }
        },
        {
            "type": "mouseover",
            "timestamp": now + 60,
            "target": { "tagName": "div" }
        }
    ]))
    .unwrap();
    let Json(queued) = assert_ok!(recording::submit_events(State(state.clone()), Json(batch)).await);
    assert_eq!(queued.queued, 2);

    let Json(stopped) = assert_ok!(recording::stop_recording(State(state.clone())).await);
    assert_eq!(stopped.file_name, "checkout");
    assert_eq!(stopped.language, Language::Python);
    let kinds: Vec<&str> = stopped.actions.iter().map(|a| a.action_type.as_str()).collect();
    assert_eq!(kinds, vec!["navigate", "click"]);

    let Json(status) = recording::get_recording_status(State(state)).await;
    assert!(!status.is_recording);
    assert_eq!(status.action_count, 2);
    assert_eq!(status.file_name.as_deref(), Some("checkout"));
}

// ============================================================================
// Test 2: Single session
// ============================================================================

#[tokio::test]
async fn test_second_start_is_not_accepted() {
    let state = state();
    let Json(first) = assert_ok!(
        recording::start_recording(State(state.clone()), Json(start_request("a"))).await
    );
    let Json(second) = assert_ok!(
        recording::start_recording(State(state.clone()), Json(start_request("b"))).await
    );

    assert!(first.accepted);
    assert!(!second.accepted);
    assert_eq!(second.session_id, first.session_id);
}

#[tokio::test]
async fn test_stop_without_session_is_not_found() {
    let error = assert_err!(recording::stop_recording(State(state())).await);
    assert_eq!(error.into_response().status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_blank_file_name_is_rejected() {
    let error = assert_err!(
        recording::start_recording(State(state()), Json(start_request("  "))).await
    );
    assert_eq!(error.into_response().status(), StatusCode::BAD_REQUEST);
}

// ============================================================================
// Test 3: Append command
// ============================================================================

#[tokio::test]
async fn test_append_action_requires_active_session() {
    let state = state();
    let unload = Action::navigate("https://shop.test/thanks", None, 10);

    let Json(ignored) = recording::append_action(State(state.clone()), Json(unload.clone())).await;
    assert!(!ignored.appended);

    assert_ok!(recording::start_recording(State(state.clone()), Json(start_request("t"))).await);
    let Json(appended) = recording::append_action(State(state.clone()), Json(unload)).await;
    assert!(appended.appended);

    let Json(status) = recording::get_recording_status(State(state)).await;
    assert!(status.is_recording);
    assert_eq!(status.action_count, 2);
}

// ============================================================================
// Test 4: Generate command
// ============================================================================

#[tokio::test]
async fn test_generate_returns_file() {
    let request: GenerateRequest = serde_json::from_value(json!({
        "fileName": "add-to-cart",
        "language": "ts",
        "actions": [
            { "type": "navigate", "url": "https://shop.test/", "timestamp": 1 },
            {
                "type": "click",
                "selector": { "kind": "TestId", "value": "add-to-cart" },
                "timestamp": 2
            },
            { "type": "teleport", "timestamp": 3 }
        ]
    }))
    .unwrap();

    let Json(response) = assert_ok!(generate::generate_test(State(state()), Json(request)).await);
    assert_eq!(response.file_name, "add-to-cart.spec.ts");
    assert_eq!(response.content_type, "application/typescript");
    assert!(response
        .code
        .starts_with("import { test, expect } from '@playwright/test';"));
    assert!(response.code.contains("await page.getByTestId('add-to-cart').click();"));
    assert!(response.code.contains("// Skipped: unsupported action type 'teleport'"));
}

#[tokio::test]
async fn test_generate_requires_file_name() {
    let request = GenerateRequest {
        actions: vec![Action::new(ActionType::Click, 1)],
        file_name: String::new(),
        language: Language::Java,
        start_url: None,
    };
    let error = assert_err!(generate::generate_test(State(state()), Json(request)).await);
    assert_eq!(error.into_response().status(), StatusCode::BAD_REQUEST);
}

// ============================================================================
// Test 5: Health
// ============================================================================

#[tokio::test]
async fn test_health_reports_recording_state() {
    let state = state();
    let Json(idle) = health::health_check(State(state.clone())).await;
    assert_eq!(idle.status, "healthy");
    assert!(!idle.recording);

    assert_ok!(recording::start_recording(State(state.clone()), Json(start_request("h"))).await);
    let Json(busy) = health::health_check(State(state)).await;
    assert!(busy.recording);
    assert_eq!(busy.connected_clients, 0);
}
