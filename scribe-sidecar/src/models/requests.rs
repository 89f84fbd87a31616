use serde::Deserialize;

use super::action::Action;
use super::session::Language;
use crate::recording::RawEvent;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StartRecordingRequest {
    pub file_name: String,
    #[serde(default)]
    pub language: Language,
    /// URL of the tab being recorded; becomes the initial navigate action
    pub start_url: Option<String>,
}

/// The capture layer posts either one event or a batch
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum RawEventBatch {
    Many(Vec<RawEvent>),
    One(Box<RawEvent>),
}

impl RawEventBatch {
    pub fn into_events(self) -> Vec<RawEvent> {
        match self {
            RawEventBatch::Many(events) => events,
            RawEventBatch::One(event) => vec![*event],
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateRequest {
    #[serde(default)]
    pub actions: Vec<Action>,
    pub file_name: String,
    #[serde(default)]
    pub language: Language,
    pub start_url: Option<String>,
}
