use serde::{Deserialize, Serialize};
use std::fmt;

use super::selector::{FramePath, Selector};

/// Semantic action kinds. Unknown wire names survive as `Other` so a log written
/// by a newer capture layer still generates (with a comment marker).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ActionType {
    Click,
    DoubleClick,
    RightClick,
    Type,
    Check,
    Select,
    Upload,
    Navigate,
    Hover,
    Focus,
    Blur,
    Wait,
    Keypress,
    Scroll,
    DragStart,
    Drop,
    Submit,
    Other(String),
}

impl ActionType {
    pub fn as_str(&self) -> &str {
        match self {
            ActionType::Click => "click",
            ActionType::DoubleClick => "doubleClick",
            ActionType::RightClick => "rightClick",
            ActionType::Type => "type",
            ActionType::Check => "check",
            ActionType::Select => "select",
            ActionType::Upload => "upload",
            ActionType::Navigate => "navigate",
            ActionType::Hover => "hover",
            ActionType::Focus => "focus",
            ActionType::Blur => "blur",
            ActionType::Wait => "wait",
            ActionType::Keypress => "keypress",
            ActionType::Scroll => "scroll",
            ActionType::DragStart => "dragStart",
            ActionType::Drop => "drop",
            ActionType::Submit => "submit",
            ActionType::Other(name) => name,
        }
    }
}

impl From<String> for ActionType {
    fn from(name: String) -> Self {
        match name.as_str() {
            "click" => ActionType::Click,
            "doubleClick" => ActionType::DoubleClick,
            "rightClick" => ActionType::RightClick,
            "type" => ActionType::Type,
            "check" => ActionType::Check,
            "select" => ActionType::Select,
            "upload" => ActionType::Upload,
            "navigate" => ActionType::Navigate,
            "hover" => ActionType::Hover,
            "focus" => ActionType::Focus,
            "blur" => ActionType::Blur,
            "wait" => ActionType::Wait,
            "keypress" => ActionType::Keypress,
            "scroll" => ActionType::Scroll,
            "dragStart" => ActionType::DragStart,
            "drop" => ActionType::Drop,
            "submit" => ActionType::Submit,
            _ => ActionType::Other(name),
        }
    }
}

impl From<ActionType> for String {
    fn from(action_type: ActionType) -> Self {
        action_type.as_str().to_string()
    }
}

impl fmt::Display for ActionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Recorded value: text for most fields, a list for multi-selects, a flag for
/// checkbox state reported by older capture layers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ActionValue {
    Text(String),
    List(Vec<String>),
    Flag(bool),
}

impl ActionValue {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            ActionValue::Text(text) => Some(text),
            _ => None,
        }
    }

    /// Values as a list, for select rendering.
    pub fn to_list(&self) -> Vec<String> {
        match self {
            ActionValue::Text(text) => vec![text.clone()],
            ActionValue::List(values) => values.clone(),
            ActionValue::Flag(flag) => vec![flag.to_string()],
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Modifiers {
    pub ctrl: bool,
    pub shift: bool,
    pub alt: bool,
    pub meta: bool,
}

impl Modifiers {
    pub fn any(&self) -> bool {
        self.ctrl || self.shift || self.alt || self.meta
    }
}

/// One normalized user interaction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Action {
    #[serde(rename = "type")]
    pub action_type: ActionType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selector: Option<Selector>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub frame_path: FramePath,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<ActionValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub previous_url: Option<String>,
    #[serde(default)]
    pub timestamp: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub checked: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub input_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub multiple: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub modifiers: Option<Modifiers>,
    #[serde(default, rename = "scrollX", skip_serializing_if = "Option::is_none")]
    pub scroll_x: Option<i64>,
    #[serde(default, rename = "scrollY", skip_serializing_if = "Option::is_none")]
    pub scroll_y: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tag_name: Option<String>,
    /// Visible text of the element (or the selected option text), for step names
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    /// Set only when the element's id was unique at capture time
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub element_id: Option<String>,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub has_tooltip: bool,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub is_important: bool,
}

impl Action {
    pub fn new(action_type: ActionType, timestamp: u64) -> Self {
        Self {
            action_type,
            selector: None,
            frame_path: Vec::new(),
            value: None,
            url: None,
            previous_url: None,
            timestamp,
            checked: None,
            input_type: None,
            multiple: None,
            key: None,
            modifiers: None,
            scroll_x: None,
            scroll_y: None,
            tag_name: None,
            text: None,
            element_id: None,
            has_tooltip: false,
            is_important: false,
        }
    }

    /// Create a navigate action
    pub fn navigate(url: &str, previous_url: Option<&str>, timestamp: u64) -> Self {
        Self {
            url: Some(url.to_string()),
            previous_url: previous_url
                .filter(|p| !p.is_empty())
                .map(|p| p.to_string()),
            ..Self::new(ActionType::Navigate, timestamp)
        }
    }

    /// Create an element-targeted action
    pub fn on(
        action_type: ActionType,
        selector: Selector,
        frame_path: FramePath,
        timestamp: u64,
    ) -> Self {
        Self {
            selector: Some(selector),
            frame_path,
            ..Self::new(action_type, timestamp)
        }
    }

    pub fn with_value(mut self, value: impl Into<String>) -> Self {
        self.value = Some(ActionValue::Text(value.into()));
        self
    }

    pub fn is_navigation(&self) -> bool {
        self.action_type == ActionType::Navigate
    }

    pub fn value_text(&self) -> Option<&str> {
        self.value.as_ref().and_then(ActionValue::as_text)
    }

    /// Same kind of action (and key) on the same element in the same frame.
    pub fn same_target(&self, other: &Action) -> bool {
        self.action_type == other.action_type
            && self.selector == other.selector
            && self.frame_path == other.frame_path
            && self.key == other.key
    }
}
