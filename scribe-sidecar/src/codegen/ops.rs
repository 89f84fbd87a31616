use crate::models::{Action, FramePath, Selector, SelectorKind};

/// An element to act on: frame/shadow hops plus the element's own selector.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Target {
    pub frames: FramePath,
    pub selector: Selector,
}

impl Target {
    /// Target of a recorded action, applying the generation-time id preference:
    /// a `TestId` selector on an element with a unique id renders as `UniqueId`.
    pub fn of(action: &Action) -> Option<Self> {
        let selector = action.selector.as_ref()?;
        let selector = match (&selector.kind, action.element_id.as_deref()) {
            (SelectorKind::TestId, Some(id)) if !id.is_empty() => Selector::unique_id(id),
            _ => selector.clone(),
        };
        Some(Self {
            frames: action.frame_path.clone(),
            selector,
        })
    }

    /// The document element of the innermost frame on `frames`.
    pub fn document_of(frames: &FramePath) -> Self {
        Self {
            frames: frames.clone(),
            selector: Selector::css_path("html"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MouseButton {
    Left,
    Right,
}

/// Language-neutral test operations. Every back end renders exactly one call
/// per operation (or one comment line for `Note`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Operation {
    Goto { url: String },
    Click { target: Target, button: MouseButton },
    DoubleClick { target: Target },
    Fill { target: Target, value: String },
    Check { target: Target },
    Uncheck { target: Target },
    SelectOption { target: Target, values: Vec<String>, multiple: bool },
    SetInputFiles { target: Target, files: Vec<String> },
    Hover { target: Target },
    Focus { target: Target },
    Blur { target: Target },
    WaitFor { target: Target },
    /// `target: None` presses on the page keyboard
    Press { target: Option<Target>, key: String },
    ScrollElement { target: Target, x: i64, y: i64 },
    /// Scrolls the window of the innermost frame (or the page)
    ScrollWindow { frames: FramePath, x: i64, y: i64 },
    MouseDown,
    MouseUp,
    RequestSubmit { target: Target },
    SettleWait { ms: u64 },
    Note { text: String },
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ActionType;

    #[test]
    fn test_unique_id_overrides_test_id_at_generation() {
        let mut action = Action::on(
            ActionType::Click,
            Selector::test_id("save", "data-testid"),
            Vec::new(),
            1,
        );
        assert_eq!(Target::of(&action).unwrap().selector.kind, SelectorKind::TestId);

        action.element_id = Some("save-btn".into());
        let target = Target::of(&action).unwrap();
        assert_eq!(target.selector.kind, SelectorKind::UniqueId);
        assert_eq!(target.selector.value, "#save-btn");
    }

    #[test]
    fn test_other_kinds_ignore_element_id() {
        let mut action = Action::on(ActionType::Click, Selector::name("q"), Vec::new(), 1);
        action.element_id = Some("search".into());
        assert_eq!(Target::of(&action).unwrap().selector.kind, SelectorKind::Name);
        assert!(Target::of(&Action::new(ActionType::Click, 1)).is_none());
    }
}
