use std::sync::Arc;

use tokio::sync::broadcast;

use super::events::RawEvent;
use super::recorder::{Clock, Recorder, SystemClock};
use super::store::{ActionSink, SessionStore};
use crate::codegen::{CodeGenerator, GeneratedFile};
use crate::config::{GeneratorConfig, RecorderConfig};
use crate::error::{AppError, Result};
use crate::models::{Action, Language, RecordingSession};

/// Owns the single recording session and everything that feeds it.
///
/// The session store is the recorder's sink, so every action the classifier
/// settles on lands in the session without the API layer touching it.
pub struct RecordingController {
    store: Arc<SessionStore>,
    recorder: Recorder,
    generator: CodeGenerator,
}

impl RecordingController {
    /// Must be called inside a Tokio runtime.
    pub fn new(recorder_config: RecorderConfig, generator_config: GeneratorConfig) -> Self {
        Self::with_clock(recorder_config, generator_config, Arc::new(SystemClock))
    }

    pub fn with_clock(
        recorder_config: RecorderConfig,
        generator_config: GeneratorConfig,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let store = Arc::new(SessionStore::new());
        let sink: Arc<dyn ActionSink> = store.clone();
        Self {
            recorder: Recorder::spawn(recorder_config, sink, clock),
            store,
            generator: CodeGenerator::new(generator_config),
        }
    }

    pub async fn start(
        &self,
        file_name: &str,
        language: Language,
        start_url: Option<String>,
    ) -> Result<RecordingSession> {
        let file_name = file_name.trim();
        if file_name.is_empty() {
            return Err(AppError::ValidationError("fileName is required".to_string()));
        }
        let start_url = start_url.filter(|u| !u.trim().is_empty());

        let session = self
            .store
            .start(file_name.to_string(), language, start_url.clone())
            .await?;

        if let Err(e) = self.recorder.start(start_url).await {
            tracing::error!("Failed to start recorder for session {}: {}", session.id, e);
            let _ = self.store.stop().await;
            return Err(AppError::RecordingError(e.to_string()));
        }

        Ok(session)
    }

    /// Stops capture, then freezes the session. Events queued before the call
    /// are still classified into it.
    pub async fn stop(&self) -> Result<RecordingSession> {
        if !self.store.is_active().await {
            return Err(AppError::NoActiveSession);
        }
        if let Err(e) = self.recorder.stop().await {
            tracing::warn!("Recorder did not acknowledge stop: {}", e);
        }
        self.store.stop().await
    }

    /// Queues raw events for classification; returns how many were queued.
    pub fn submit_events(&self, events: Vec<RawEvent>) -> Result<usize> {
        let count = events.len();
        for event in events {
            self.recorder
                .submit(event)
                .map_err(|e| AppError::RecordingError(e.to_string()))?;
        }
        Ok(count)
    }

    /// Appends a ready-made action behind any events already submitted;
    /// ignored unless a session is active.
    pub async fn append(&self, action: Action) -> bool {
        let action_type = action.action_type.clone();
        if !self.store.is_active().await {
            tracing::debug!("Ignoring {} action: no active session", action_type);
            return false;
        }
        match self.recorder.append(action).await {
            Ok(accepted) => accepted,
            Err(e) => {
                tracing::warn!("Failed to append {} action: {}", action_type, e);
                false
            }
        }
    }

    pub async fn session(&self) -> Option<RecordingSession> {
        self.store.snapshot().await
    }

    pub async fn is_recording(&self) -> bool {
        self.store.is_active().await
    }

    pub fn generate(
        &self,
        actions: &[Action],
        file_name: &str,
        language: Language,
        start_url: Option<&str>,
    ) -> GeneratedFile {
        self.generator
            .generate_file(actions, file_name, language, start_url)
    }

    pub fn subscribe(&self) -> broadcast::Receiver<Action> {
        self.recorder.subscribe()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ActionType;

    fn controller() -> RecordingController {
        RecordingController::new(RecorderConfig::default(), GeneratorConfig::default())
    }

    #[tokio::test]
    async fn test_start_requires_file_name() {
        let controller = controller();
        let result = controller.start("   ", Language::JavaScript, None).await;
        assert!(matches!(result, Err(AppError::ValidationError(_))));
        assert!(!controller.is_recording().await);
    }

    #[tokio::test]
    async fn test_start_records_initial_navigation() {
        let controller = controller();
        controller
            .start("login", Language::TypeScript, Some("https://app.test/".into()))
            .await
            .unwrap();

        let session = controller.stop().await.unwrap();
        assert_eq!(session.file_name, "login");
        assert_eq!(session.actions.len(), 1);
        assert_eq!(session.actions[0].action_type, ActionType::Navigate);
        assert_eq!(session.actions[0].url.as_deref(), Some("https://app.test/"));
    }

    #[tokio::test]
    async fn test_stop_without_session() {
        let controller = controller();
        assert!(matches!(controller.stop().await, Err(AppError::NoActiveSession)));
    }

    #[tokio::test]
    async fn test_append_only_while_active() {
        let controller = controller();
        let unload = Action::navigate("https://app.test/next", None, 5);
        assert!(!controller.append(unload.clone()).await);

        controller.start("t", Language::Python, None).await.unwrap();
        assert!(controller.append(unload).await);
        assert_eq!(controller.session().await.unwrap().action_count(), 1);
    }

    #[tokio::test]
    async fn test_appended_navigate_lands_after_submitted_click() {
        let controller = controller();
        controller
            .start("order", Language::JavaScript, Some("https://a.test/".into()))
            .await
            .unwrap();

        let mut go = crate::dom::ElementSnapshot {
            tag_name: "button".into(),
            id_match_count: 1,
            ..Default::default()
        };
        go.attributes.insert("id".into(), "go".into());
        let now = chrono::Utc::now().timestamp_millis() as u64;
        controller
            .submit_events(vec![RawEvent::Click {
                target: go,
                detail: 1,
                button: 0,
                timestamp: now,
            }])
            .unwrap();
        assert!(
            controller
                .append(Action::navigate("https://a.test/next", None, now + 5))
                .await
        );

        let session = controller.stop().await.unwrap();
        let order: Vec<(&str, Option<&str>)> = session
            .actions
            .iter()
            .map(|a| (a.action_type.as_str(), a.url.as_deref()))
            .collect();
        assert_eq!(
            order,
            vec![
                ("navigate", Some("https://a.test/")),
                ("click", None),
                ("navigate", Some("https://a.test/next")),
            ]
        );
        assert_eq!(session.actions[2].timestamp, now + 5);
    }
}
