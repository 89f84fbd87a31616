use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::action::Action;

/// Target language of the generated test file.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    #[serde(alias = "js")]
    JavaScript,
    #[serde(alias = "ts")]
    TypeScript,
    #[serde(alias = "py")]
    Python,
    Java,
}

impl Language {
    pub const ALL: [Language; 4] = [
        Language::JavaScript,
        Language::TypeScript,
        Language::Python,
        Language::Java,
    ];

    pub fn extension(&self) -> &'static str {
        match self {
            Language::JavaScript => "js",
            Language::TypeScript => "ts",
            Language::Python => "py",
            Language::Java => "java",
        }
    }

    /// `<fileName>.spec.<ext>`
    pub fn suggested_file_name(&self, file_name: &str) -> String {
        let stem = file_name.trim();
        let stem = if stem.is_empty() { "recorded-test" } else { stem };
        format!("{}.spec.{}", stem, self.extension())
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Language::JavaScript => "javascript",
            Language::TypeScript => "typescript",
            Language::Python => "python",
            Language::Java => "java",
        };
        f.write_str(name)
    }
}

impl FromStr for Language {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "javascript" | "js" => Ok(Language::JavaScript),
            "typescript" | "ts" => Ok(Language::TypeScript),
            "python" | "py" => Ok(Language::Python),
            "java" => Ok(Language::Java),
            other => Err(format!("unsupported language: {}", other)),
        }
    }
}

/// The single process-wide recording.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordingSession {
    pub id: String,
    pub file_name: String,
    pub language: Language,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_url: Option<String>,
    #[serde(default)]
    pub actions: Vec<Action>,
    pub is_active: bool,
    pub started_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stopped_at: Option<DateTime<Utc>>,
}

impl RecordingSession {
    pub fn new(file_name: String, language: Language, start_url: Option<String>) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            file_name,
            language,
            start_url,
            actions: Vec::new(),
            is_active: true,
            started_at: Utc::now(),
            stopped_at: None,
        }
    }

    /// Append while active. Timestamps are kept strictly increasing: an action
    /// stamped at or before its predecessor is moved to one past it.
    pub fn append(&mut self, mut action: Action) -> bool {
        if !self.is_active {
            return false;
        }

        if let Some(last) = self.actions.last() {
            if action.timestamp <= last.timestamp {
                action.timestamp = last.timestamp + 1;
            }
        }

        self.actions.push(action);
        true
    }

    pub fn stop(&mut self) {
        self.is_active = false;
        self.stopped_at = Some(Utc::now());
    }

    pub fn action_count(&self) -> usize {
        self.actions.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::action::ActionType;

    #[test]
    fn test_language_parsing_and_extensions() {
        assert_eq!("TS".parse::<Language>().unwrap(), Language::TypeScript);
        assert_eq!("python".parse::<Language>().unwrap(), Language::Python);
        assert!("ruby".parse::<Language>().is_err());
        assert_eq!(Language::Java.suggested_file_name("checkout"), "checkout.spec.java");
        assert_eq!(Language::Python.suggested_file_name("  "), "recorded-test.spec.py");
    }

    #[test]
    fn test_append_keeps_timestamps_strictly_increasing() {
        let mut session = RecordingSession::new("login".into(), Language::JavaScript, None);
        assert!(session.append(Action::new(ActionType::Click, 100)));
        assert!(session.append(Action::new(ActionType::Click, 100)));
        assert!(session.append(Action::new(ActionType::Click, 50)));

        let stamps: Vec<u64> = session.actions.iter().map(|a| a.timestamp).collect();
        assert_eq!(stamps, vec![100, 101, 102]);
    }

    #[test]
    fn test_append_ignored_after_stop() {
        let mut session = RecordingSession::new("login".into(), Language::Java, None);
        session.stop();
        assert!(!session.append(Action::new(ActionType::Click, 1)));
        assert_eq!(session.action_count(), 0);
        assert!(session.stopped_at.is_some());
    }
}
