use async_trait::async_trait;
use tokio::sync::{mpsc, Mutex};

use crate::error::{AppError, Result, SinkError};
use crate::models::{Action, Language, RecordingSession};

/// Where the recorder delivers finished actions.
#[async_trait]
pub trait ActionSink: Send + Sync {
    async fn deliver(&self, action: Action) -> std::result::Result<(), SinkError>;
}

/// Holds the one recording session. A stopped session stays readable until the
/// next start replaces it.
#[derive(Default)]
pub struct SessionStore {
    session: Mutex<Option<RecordingSession>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn start(
        &self,
        file_name: String,
        language: Language,
        start_url: Option<String>,
    ) -> Result<RecordingSession> {
        let mut guard = self.session.lock().await;
        if let Some(active) = guard.as_ref().filter(|s| s.is_active) {
            return Err(AppError::SessionAlreadyActive(active.id.clone()));
        }

        let session = RecordingSession::new(file_name, language, start_url);
        tracing::info!(
            "Recording session {} created ({}, {})",
            session.id,
            session.file_name,
            session.language
        );
        *guard = Some(session.clone());
        Ok(session)
    }

    /// Freezes the active session and returns it.
    pub async fn stop(&self) -> Result<RecordingSession> {
        let mut guard = self.session.lock().await;
        let session = guard
            .as_mut()
            .filter(|s| s.is_active)
            .ok_or(AppError::NoActiveSession)?;
        session.stop();
        tracing::info!(
            "Recording session {} stopped ({} actions)",
            session.id,
            session.action_count()
        );
        Ok(session.clone())
    }

    /// Appends when a session is active; otherwise the action is ignored.
    pub async fn append(&self, action: Action) -> bool {
        let mut guard = self.session.lock().await;
        match guard.as_mut() {
            Some(session) => session.append(action),
            None => false,
        }
    }

    pub async fn snapshot(&self) -> Option<RecordingSession> {
        self.session.lock().await.clone()
    }

    pub async fn is_active(&self) -> bool {
        self.session
            .lock()
            .await
            .as_ref()
            .map(|s| s.is_active)
            .unwrap_or(false)
    }
}

#[async_trait]
impl ActionSink for SessionStore {
    async fn deliver(&self, action: Action) -> std::result::Result<(), SinkError> {
        if self.append(action).await {
            Ok(())
        } else {
            Err(SinkError::Inactive)
        }
    }
}

/// Forwards actions to a channel; used to observe the recorder directly.
#[async_trait]
impl ActionSink for mpsc::UnboundedSender<Action> {
    async fn deliver(&self, action: Action) -> std::result::Result<(), SinkError> {
        self.send(action).map_err(|_| SinkError::Closed)
    }
}
