use axum::{extract::State, Json};
use std::sync::Arc;

use crate::api::state::AppState;
use crate::error::{AppError, Result};
use crate::models::{
    Action, AppendActionResponse, EventsAcceptedResponse, RawEventBatch, RecordingStatusResponse,
    StartRecordingRequest, StartRecordingResponse, StopRecordingResponse,
};

/// Start the recording session.
///
/// A second start while one is active is refused with `accepted: false`
/// rather than an error so the extension can simply keep its current session.
pub async fn start_recording(
    State(state): State<Arc<AppState>>,
    Json(request): Json<StartRecordingRequest>,
) -> Result<Json<StartRecordingResponse>> {
    match state
        .controller
        .start(&request.file_name, request.language, request.start_url)
        .await
    {
        Ok(session) => {
            tracing::info!(
                "Recording started: {} ({})",
                session.file_name,
                session.language
            );
            Ok(Json(StartRecordingResponse {
                accepted: true,
                session_id: Some(session.id),
            }))
        }
        Err(AppError::SessionAlreadyActive(id)) => {
            tracing::warn!("Start refused, session {} is still recording", id);
            Ok(Json(StartRecordingResponse {
                accepted: false,
                session_id: Some(id),
            }))
        }
        Err(e) => Err(e),
    }
}

pub async fn stop_recording(
    State(state): State<Arc<AppState>>,
) -> Result<Json<StopRecordingResponse>> {
    let session = state.controller.stop().await?;
    Ok(Json(StopRecordingResponse {
        actions: session.actions,
        file_name: session.file_name,
        language: session.language,
    }))
}

/// Raw DOM events from the content script, one or a batch.
pub async fn submit_events(
    State(state): State<Arc<AppState>>,
    Json(batch): Json<RawEventBatch>,
) -> Result<Json<EventsAcceptedResponse>> {
    let queued = state.controller.submit_events(batch.into_events())?;
    tracing::debug!("Queued {} raw events", queued);
    Ok(Json(EventsAcceptedResponse { queued }))
}

/// An already-built action, e.g. the navigate sent when a page unloads.
pub async fn append_action(
    State(state): State<Arc<AppState>>,
    Json(action): Json<Action>,
) -> Json<AppendActionResponse> {
    let appended = state.controller.append(action).await;
    Json(AppendActionResponse { appended })
}

pub async fn get_recording_status(
    State(state): State<Arc<AppState>>,
) -> Json<RecordingStatusResponse> {
    let response = match state.controller.session().await {
        Some(session) => RecordingStatusResponse {
            is_recording: session.is_active,
            action_count: session.action_count(),
            session_id: Some(session.id),
            file_name: Some(session.file_name),
            language: Some(session.language),
        },
        None => RecordingStatusResponse {
            is_recording: false,
            action_count: 0,
            session_id: None,
            file_name: None,
            language: None,
        },
    };
    Json(response)
}
