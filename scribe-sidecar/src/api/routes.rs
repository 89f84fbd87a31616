use axum::{
    http::{request::Parts, HeaderValue, Method},
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;

use super::handlers::{generate, health, recording};
use super::state::AppState;
use super::websocket::ws_handler;

pub fn create_router(state: Arc<AppState>) -> Router {
    // Only the extension and local tooling may call the sidecar
    let cors = CorsLayer::new()
        .allow_origin(AllowOrigin::predicate(is_allowed_origin))
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers(tower_http::cors::Any);

    Router::new()
        // Health check
        .route("/health", get(health::health_check))
        // Recording endpoints
        .route("/recording/start", post(recording::start_recording))
        .route("/recording/stop", post(recording::stop_recording))
        .route("/recording/events", post(recording::submit_events))
        .route("/recording/actions", post(recording::append_action))
        .route("/recording/status", get(recording::get_recording_status))
        // Code generation
        .route("/generate", post(generate::generate_test))
        // WebSocket
        .route("/ws/:client_id", get(ws_handler))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

fn is_allowed_origin(origin: &HeaderValue, _parts: &Parts) -> bool {
    let Ok(origin) = origin.to_str() else {
        return false;
    };
    if origin.starts_with("chrome-extension://") {
        return true;
    }
    ["http://localhost", "http://127.0.0.1"].iter().any(|host| {
        origin
            .strip_prefix(host)
            .is_some_and(|rest| rest.is_empty() || rest.starts_with(':'))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Request;

    fn allowed(origin: &'static str) -> bool {
        let (parts, _) = Request::new(()).into_parts();
        is_allowed_origin(&HeaderValue::from_static(origin), &parts)
    }

    #[test]
    fn test_cors_origins() {
        assert!(allowed("chrome-extension://abcdefghijklmnop"));
        assert!(allowed("http://localhost:5173"));
        assert!(allowed("http://127.0.0.1"));
        assert!(!allowed("http://localhost.evil.test"));
        assert!(!allowed("https://example.com"));
    }
}
