use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::models::{ActionValue, FrameKind};

/// Serialized facts about one DOM element, captured by the content script at
/// event time. Everything the resolver and classifier need is here, so both run
/// without a live document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ElementSnapshot {
    pub tag_name: String,
    pub attributes: BTreeMap<String, String>,
    pub text_content: Option<String>,
    /// Text of the first associated `<label>`
    pub label_text: Option<String>,
    /// How many document elements share this element's id
    pub id_match_count: u32,
    pub style: ComputedStyle,
    pub rect: Option<Rect>,
    pub has_layout_box: bool,
    pub viewport: Viewport,
    pub disabled: bool,
    pub form: FormState,
    pub has_click_handler: bool,
    pub in_recorder_overlay: bool,
    /// Self first, then ancestors up to `<body>`
    pub path: Vec<PathNode>,
    /// Iframe and shadow-root hosts, outermost first
    pub boundaries: Vec<BoundaryHost>,
}

impl Default for ElementSnapshot {
    fn default() -> Self {
        Self {
            tag_name: String::new(),
            attributes: BTreeMap::new(),
            text_content: None,
            label_text: None,
            id_match_count: 0,
            style: ComputedStyle::default(),
            rect: None,
            has_layout_box: true,
            viewport: Viewport::default(),
            disabled: false,
            form: FormState::default(),
            has_click_handler: false,
            in_recorder_overlay: false,
            path: Vec::new(),
            boundaries: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ComputedStyle {
    pub cursor: Option<String>,
    pub display: Option<String>,
    pub visibility: Option<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Rect {
    pub top: f64,
    pub left: f64,
    pub bottom: f64,
    pub right: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            width: 1280.0,
            height: 720.0,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FormState {
    pub value: Option<String>,
    pub checked: Option<bool>,
    pub multiple: bool,
    pub selected_values: Vec<String>,
    /// Text of the selected option(s), joined
    pub selected_text: Option<String>,
    pub file_names: Vec<String>,
}

/// One level of the structural path.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PathNode {
    pub tag_name: String,
    pub id: Option<String>,
    pub classes: Vec<String>,
    /// Element siblings (self included) sharing this tag
    pub same_tag_count: u32,
    /// 1-based position among all element siblings
    pub child_index: u32,
}

/// An iframe element or shadow-root host that encloses the target.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BoundaryHost {
    pub kind: FrameKind,
    pub tag_name: String,
    pub id: Option<String>,
    pub name: Option<String>,
    pub src: Option<String>,
    pub classes: Vec<String>,
    /// Host's own structural path inside its document, self first
    pub path: Vec<PathNode>,
}

impl Default for BoundaryHost {
    fn default() -> Self {
        Self {
            kind: FrameKind::Iframe,
            tag_name: "iframe".to_string(),
            id: None,
            name: None,
            src: None,
            classes: Vec::new(),
            path: Vec::new(),
        }
    }
}

const TEXT_ENTRY_EXCLUDED_TYPES: [&str; 10] = [
    "checkbox", "radio", "file", "submit", "button", "reset", "image", "range", "color",
    "hidden",
];

const INTERACTIVE_TAGS: [&str; 5] = ["a", "button", "input", "select", "textarea"];

impl ElementSnapshot {
    /// Lowercase tag, trimmed attribute values, empty attributes and blank
    /// strings removed. Applied once when an event enters the classifier.
    pub fn normalize(&mut self) {
        self.tag_name = self.tag_name.trim().to_ascii_lowercase();
        self.attributes = std::mem::take(&mut self.attributes)
            .into_iter()
            .map(|(k, v)| (k.trim().to_ascii_lowercase(), v.trim().to_string()))
            .filter(|(k, v)| !k.is_empty() && !v.is_empty())
            .collect();
        self.text_content = non_blank(self.text_content.take());
        self.label_text = non_blank(self.label_text.take());
        for node in self.path.iter_mut().chain(
            self.boundaries
                .iter_mut()
                .flat_map(|host| host.path.iter_mut()),
        ) {
            node.tag_name = node.tag_name.trim().to_ascii_lowercase();
            node.id = non_blank(node.id.take());
            node.classes.retain(|c| !c.trim().is_empty());
        }
        for host in &mut self.boundaries {
            host.tag_name = host.tag_name.trim().to_ascii_lowercase();
            host.id = non_blank(host.id.take());
            host.name = non_blank(host.name.take());
            host.src = non_blank(host.src.take());
        }
    }

    /// A non-empty attribute value.
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes
            .get(name)
            .map(|v| v.as_str())
            .filter(|v| !v.trim().is_empty())
    }

    pub fn has_attr(&self, name: &str) -> bool {
        self.attributes.contains_key(name)
    }

    pub fn is_tag(&self, tag: &str) -> bool {
        self.tag_name == tag
    }

    /// Lowercased `type` attribute of an `<input>`, `text` when absent.
    pub fn input_type(&self) -> Option<String> {
        if !self.is_tag("input") {
            return None;
        }
        Some(
            self.attr("type")
                .map(|t| t.to_ascii_lowercase())
                .unwrap_or_else(|| "text".to_string()),
        )
    }

    fn has_input_type(&self, wanted: &[&str]) -> bool {
        self.input_type()
            .map(|t| wanted.contains(&t.as_str()))
            .unwrap_or(false)
    }

    pub fn is_checkable(&self) -> bool {
        self.has_input_type(&["checkbox", "radio"])
    }

    pub fn is_file_input(&self) -> bool {
        self.has_input_type(&["file"])
    }

    pub fn is_password(&self) -> bool {
        self.has_input_type(&["password"])
    }

    pub fn is_select(&self) -> bool {
        self.is_tag("select")
    }

    /// Text-like inputs and textareas; these produce debounced `type` actions.
    pub fn is_text_entry(&self) -> bool {
        if self.is_tag("textarea") {
            return true;
        }
        match self.input_type() {
            Some(t) => !TEXT_ENTRY_EXCLUDED_TYPES.contains(&t.as_str()),
            None => false,
        }
    }

    pub fn is_form_field(&self) -> bool {
        matches!(self.tag_name.as_str(), "input" | "textarea" | "select")
    }

    pub fn is_submit_control(&self) -> bool {
        (self.is_tag("button") || self.is_tag("input"))
            && self.attr("type").map(|t| t.eq_ignore_ascii_case("submit")) == Some(true)
    }

    /// `<body>`/`<html>` targets, i.e. document-level events.
    pub fn is_document_root(&self) -> bool {
        matches!(self.tag_name.as_str(), "body" | "html" | "")
    }

    pub fn role(&self) -> Option<&str> {
        self.attr("role")
    }

    pub fn trimmed_text(&self) -> Option<&str> {
        self.text_content
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty())
    }

    pub fn has_pointer_cursor(&self) -> bool {
        self.style.cursor.as_deref() == Some("pointer")
    }

    pub fn is_interactive(&self) -> bool {
        INTERACTIVE_TAGS.contains(&self.tag_name.as_str())
            || self.role().is_some()
            || self.has_attr("tabindex")
            || self.has_pointer_cursor()
            || self.has_click_handler
    }

    pub fn is_hidden(&self) -> bool {
        !self.has_layout_box
            || self.style.visibility.as_deref() == Some("hidden")
            || self.style.display.as_deref() == Some("none")
    }

    pub fn is_disabled(&self) -> bool {
        self.disabled || self.attr("aria-disabled") == Some("true")
    }

    /// Intersects the viewport. Snapshots without a rect are treated as visible.
    pub fn in_viewport(&self) -> bool {
        match self.rect {
            Some(rect) => {
                rect.bottom > 0.0
                    && rect.right > 0.0
                    && rect.top < self.viewport.height
                    && rect.left < self.viewport.width
            }
            None => true,
        }
    }

    pub fn has_tooltip(&self) -> bool {
        self.attr("title").is_some() || self.attr("aria-label").is_some()
    }

    /// Buttons, links and submit controls: the elements whose hover or click
    /// usually matters to the UI layer.
    pub fn is_important(&self) -> bool {
        self.is_tag("button")
            || self.is_tag("a")
            || self.is_submit_control()
            || self.role() == Some("button")
    }

    /// The element's id, but only when unique in its document.
    pub fn unique_id(&self) -> Option<&str> {
        self.attr("id").filter(|_| self.id_match_count == 1)
    }

    /// Current value as the capture layer reports it for this kind of element.
    pub fn current_value(&self) -> Option<ActionValue> {
        if self.is_select() {
            return if self.form.multiple {
                Some(ActionValue::List(self.form.selected_values.clone()))
            } else {
                self.form.value.clone().map(ActionValue::Text)
            };
        }

        match self.input_type().as_deref() {
            Some("checkbox") => self.form.checked.map(ActionValue::Flag),
            Some("radio") => {
                if self.form.checked == Some(true) {
                    self.form.value.clone().map(ActionValue::Text)
                } else {
                    None
                }
            }
            Some("file") => {
                if self.form.file_names.is_empty() {
                    self.form.value.clone().map(ActionValue::Text)
                } else {
                    Some(ActionValue::Text(self.form.file_names.join(", ")))
                }
            }
            Some(_) => self.form.value.clone().map(ActionValue::Text),
            None if self.is_tag("textarea") => self.form.value.clone().map(ActionValue::Text),
            None => None,
        }
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input(kind: &str) -> ElementSnapshot {
        let mut el = ElementSnapshot {
            tag_name: "INPUT".into(),
            ..Default::default()
        };
        el.attributes.insert("type".into(), kind.into());
        el.normalize();
        el
    }

    #[test]
    fn test_normalize_lowercases_and_drops_empty_attributes() {
        let mut el = ElementSnapshot {
            tag_name: " BUTTON ".into(),
            text_content: Some("   ".into()),
            ..Default::default()
        };
        el.attributes.insert("Title".into(), "  Save  ".into());
        el.attributes.insert("class".into(), "   ".into());
        el.normalize();

        assert_eq!(el.tag_name, "button");
        assert_eq!(el.attr("title"), Some("Save"));
        assert!(!el.has_attr("class"));
        assert!(el.text_content.is_none());
    }

    #[test]
    fn test_text_entry_classification() {
        assert!(input("text").is_text_entry());
        assert!(input("email").is_text_entry());
        assert!(input("password").is_text_entry());
        assert!(!input("checkbox").is_text_entry());
        assert!(!input("file").is_text_entry());
        assert!(input("radio").is_checkable());
        assert!(input("submit").is_submit_control());
    }

    #[test]
    fn test_visibility_filters() {
        let mut el = input("text");
        assert!(!el.is_hidden());
        el.style.display = Some("none".into());
        assert!(el.is_hidden());

        el.style.display = None;
        el.rect = Some(Rect {
            top: 900.0,
            left: 10.0,
            bottom: 940.0,
            right: 200.0,
        });
        assert!(!el.in_viewport());
    }

    #[test]
    fn test_current_value_by_element_kind() {
        let mut checkbox = input("checkbox");
        checkbox.form.checked = Some(true);
        assert_eq!(checkbox.current_value(), Some(ActionValue::Flag(true)));

        let mut file = input("file");
        file.form.file_names = vec!["report.pdf".into()];
        assert_eq!(file.current_value(), Some(ActionValue::Text("report.pdf".into())));

        let mut select = ElementSnapshot {
            tag_name: "select".into(),
            ..Default::default()
        };
        select.form.multiple = true;
        select.form.selected_values = vec!["a".into(), "b".into()];
        assert_eq!(
            select.current_value(),
            Some(ActionValue::List(vec!["a".into(), "b".into()]))
        );
    }
}
