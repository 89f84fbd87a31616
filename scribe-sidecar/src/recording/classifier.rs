//! Raw DOM events → semantic actions.
//!
//! `EventClassifier` is a synchronous state machine driven entirely by event
//! timestamps, so a recorded event log replays to the same actions every time.
//! The async `Recorder` feeds it from a channel and wakes it for timers.

use std::collections::HashMap;

use super::debounce::DebounceTable;
use super::events::RawEvent;
use crate::config::RecorderConfig;
use crate::dom::{self, ElementSnapshot};
use crate::models::{Action, ActionType, ActionValue, FramePath, Modifiers, Selector};

/// Max chars of element text kept on an action for step naming
const TEXT_LIMIT_CHARS: usize = 50;

const SHORTCUT_KEYS: [&str; 4] = ["c", "v", "x", "a"];
const NAVIGATION_KEYS: [&str; 6] = [
    "Escape",
    "Tab",
    "ArrowUp",
    "ArrowDown",
    "ArrowLeft",
    "ArrowRight",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecorderState {
    Idle,
    Recording,
}

/// Identity of a form field across events.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct FieldKey {
    selector: Selector,
    frame_path: FramePath,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
enum TimerKey {
    Type(FieldKey),
    Hover,
    Scroll,
}

enum Classified {
    Immediate(Action),
    Debounced(TimerKey, u64, Action),
    Discard(&'static str),
}

pub struct EventClassifier {
    config: RecorderConfig,
    state: RecorderState,
    current_url: Option<String>,
    timers: DebounceTable<TimerKey, Action>,
    last_recorded: Option<Action>,
    last_navigation_url: Option<String>,
    last_values: HashMap<FieldKey, String>,
    last_scroll: (i64, i64),
}

impl EventClassifier {
    pub fn new(config: RecorderConfig) -> Self {
        Self {
            config,
            state: RecorderState::Idle,
            current_url: None,
            timers: DebounceTable::new(),
            last_recorded: None,
            last_navigation_url: None,
            last_values: HashMap::new(),
            last_scroll: (0, 0),
        }
    }

    pub fn state(&self) -> RecorderState {
        self.state
    }

    pub fn is_recording(&self) -> bool {
        self.state == RecorderState::Recording
    }

    /// Earliest pending debounce deadline, if any.
    pub fn next_deadline(&self) -> Option<u64> {
        self.timers.next_deadline()
    }

    pub fn pending_timers(&self) -> usize {
        self.timers.len()
    }

    /// Idle → Recording. Records the initial navigate for `url` when one is known.
    pub fn start(&mut self, url: Option<&str>, now: u64) -> Vec<Action> {
        self.timers.clear();
        self.last_recorded = None;
        self.last_navigation_url = None;
        self.last_values.clear();
        self.last_scroll = (0, 0);
        self.current_url = url.map(|u| u.to_string());
        self.state = RecorderState::Recording;

        tracing::info!("Classifier recording (start url: {})", url.unwrap_or("<none>"));

        url.and_then(|u| self.record(Action::navigate(u, None, now)))
            .into_iter()
            .collect()
    }

    /// Recording → Idle. Timers already scheduled stay in the table and are
    /// discarded when they come due.
    pub fn stop(&mut self) {
        if self.state == RecorderState::Recording {
            tracing::info!(
                "Classifier idle ({} debounce timers left to expire)",
                self.timers.len()
            );
        }
        self.state = RecorderState::Idle;
    }

    /// Fires every timer due at `now`.
    pub fn poll(&mut self, now: u64) -> Vec<Action> {
        let due = self.timers.take_due(now);
        self.finalize_all(due)
    }

    /// Fires every pending timer immediately, in scheduling order.
    pub fn flush(&mut self) -> Vec<Action> {
        let pending = self.timers.drain();
        self.finalize_all(pending)
    }

    /// Takes a ready-made action (an unload navigate) in capture order: pending
    /// timers fire first, then the action goes through the same checks as a
    /// classified one. Returns `None` when idle.
    pub fn append(&mut self, action: Action) -> Option<Vec<Action>> {
        if self.state == RecorderState::Idle {
            return None;
        }
        let mut recorded = self.flush();
        recorded.extend(self.record(action));
        Some(recorded)
    }

    pub fn handle(&mut self, mut event: RawEvent) -> Vec<Action> {
        let mut recorded = self.poll(event.timestamp());
        if self.state == RecorderState::Idle {
            return recorded;
        }

        event.normalize();
        let kind = event.kind();

        match self.classify(event) {
            Classified::Immediate(action) => {
                recorded.extend(self.flush());
                recorded.extend(self.record(action));
            }
            Classified::Debounced(key, deadline, action) => {
                if self.timers.schedule(key, deadline, action) {
                    tracing::trace!("Restarted {} debounce timer", kind);
                }
            }
            Classified::Discard(reason) => {
                tracing::trace!("Discarded {} event: {}", kind, reason);
            }
        }

        recorded
    }

    fn classify(&mut self, event: RawEvent) -> Classified {
        match event {
            RawEvent::Click {
                target,
                detail,
                button,
                timestamp,
            } => self.classify_click(&target, detail, button, timestamp),
            RawEvent::ContextMenu { target, timestamp } => {
                self.classify_click(&target, 1, 2, timestamp)
            }
            RawEvent::Input { target, timestamp } | RawEvent::Change { target, timestamp } => {
                self.classify_value_change(&target, timestamp)
            }
            RawEvent::Focus { target, timestamp } => {
                if target.is_form_field()
                    || target.has_attr("tabindex")
                    || target.role() == Some("button")
                {
                    Classified::Immediate(element_action(ActionType::Focus, &target, timestamp))
                } else {
                    Classified::Discard("focus on non-form element")
                }
            }
            RawEvent::Blur { target, timestamp } => {
                if target.is_form_field() {
                    Classified::Immediate(element_action(ActionType::Blur, &target, timestamp))
                } else {
                    Classified::Discard("blur on non-form element")
                }
            }
            RawEvent::MouseOver { target, timestamp } => {
                if target.in_recorder_overlay || !target.has_tooltip() {
                    return Classified::Discard("hover without title or aria-label");
                }
                Classified::Debounced(
                    TimerKey::Hover,
                    timestamp + self.config.hover_debounce_ms,
                    element_action(ActionType::Hover, &target, timestamp),
                )
            }
            RawEvent::KeyDown {
                target,
                key,
                ctrl,
                meta,
                shift,
                alt,
                timestamp,
            } => {
                let modifiers = Modifiers {
                    ctrl,
                    shift,
                    alt,
                    meta,
                };
                if !is_recordable_key(&key, &modifiers, &target) {
                    return Classified::Discard("key not in allow-list");
                }
                let mut action = element_action(ActionType::Keypress, &target, timestamp);
                if target.is_document_root() {
                    action.selector = None;
                }
                action.value = None;
                action.key = Some(key);
                action.modifiers = Some(modifiers);
                Classified::Immediate(action)
            }
            RawEvent::Scroll {
                target,
                scroll_x,
                scroll_y,
                timestamp,
            } => {
                let mut action = match target.as_ref().filter(|t| !t.is_document_root()) {
                    Some(element) => {
                        let mut action = element_action(ActionType::Scroll, element, timestamp);
                        action.value = None;
                        action
                    }
                    None => {
                        let mut action = Action::new(ActionType::Scroll, timestamp);
                        if let Some(root) = target.as_ref() {
                            action.frame_path = dom::frame_path(root);
                        }
                        action
                    }
                };
                action.scroll_x = Some(scroll_x);
                action.scroll_y = Some(scroll_y);
                Classified::Debounced(
                    TimerKey::Scroll,
                    timestamp + self.config.scroll_debounce_ms,
                    action,
                )
            }
            RawEvent::Submit { target, timestamp } => {
                let mut action = element_action(ActionType::Submit, &target, timestamp);
                action.value = None;
                Classified::Immediate(action)
            }
            RawEvent::DragStart { target, timestamp } => {
                Classified::Immediate(selector_only(ActionType::DragStart, &target, timestamp))
            }
            RawEvent::Drop { target, timestamp } => {
                Classified::Immediate(selector_only(ActionType::Drop, &target, timestamp))
            }
            RawEvent::Mutation { href, timestamp } => {
                if self.current_url.as_deref() == Some(href.as_str()) {
                    return Classified::Discard("location unchanged");
                }
                let previous = self.current_url.replace(href.clone());
                tracing::debug!(
                    "SPA navigation: {} -> {}",
                    previous.as_deref().unwrap_or("<none>"),
                    href
                );
                Classified::Immediate(Action::navigate(&href, previous.as_deref(), timestamp))
            }
            RawEvent::Unload { url, timestamp } => {
                Classified::Immediate(Action::navigate(&url, None, timestamp))
            }
        }
    }

    fn classify_click(
        &self,
        target: &ElementSnapshot,
        detail: u32,
        button: u8,
        timestamp: u64,
    ) -> Classified {
        if target.in_recorder_overlay {
            return Classified::Discard("recorder overlay");
        }

        let action_type = if button == 2 {
            ActionType::RightClick
        } else if detail == 2 {
            ActionType::DoubleClick
        } else if target.is_tag("form") || target.is_submit_control() {
            ActionType::Submit
        } else if target.is_checkable() {
            ActionType::Check
        } else if target.is_file_input() {
            ActionType::Upload
        } else if target.is_select() {
            ActionType::Select
        } else {
            ActionType::Click
        };

        if matches!(
            action_type,
            ActionType::Click | ActionType::DoubleClick | ActionType::RightClick
        ) {
            if !target.is_interactive() {
                return Classified::Discard("non-interactive element");
            }
            if target.is_hidden() {
                return Classified::Discard("hidden element");
            }
            if target.is_disabled() {
                return Classified::Discard("disabled element");
            }
            if !target.in_viewport() {
                return Classified::Discard("outside viewport");
            }
        }

        Classified::Immediate(element_action(action_type, target, timestamp))
    }

    fn classify_value_change(&self, target: &ElementSnapshot, timestamp: u64) -> Classified {
        if target.in_recorder_overlay {
            return Classified::Discard("recorder overlay");
        }

        if target.is_select() {
            return Classified::Immediate(element_action(ActionType::Select, target, timestamp));
        }
        if target.is_checkable() {
            return Classified::Immediate(element_action(ActionType::Check, target, timestamp));
        }
        if target.is_file_input() {
            return Classified::Immediate(element_action(ActionType::Upload, target, timestamp));
        }
        if !target.is_text_entry() {
            return Classified::Discard("not a text field");
        }

        let mut action = element_action(ActionType::Type, target, timestamp);
        if action.value.is_none() {
            action.value = Some(ActionValue::Text(String::new()));
        }
        let key = field_key(&action);
        Classified::Debounced(
            TimerKey::Type(key),
            timestamp + self.config.type_debounce_ms,
            action,
        )
    }

    fn finalize_all(&mut self, fired: Vec<(TimerKey, Action)>) -> Vec<Action> {
        let mut recorded = Vec::new();
        for (key, action) in fired {
            if self.state == RecorderState::Idle {
                tracing::debug!(
                    "Discarding {} timer that fired after stop",
                    action.action_type
                );
                continue;
            }
            recorded.extend(self.finalize(key, action));
        }
        recorded
    }

    fn finalize(&mut self, key: TimerKey, action: Action) -> Option<Action> {
        match key {
            TimerKey::Type(field) => {
                let value = action.value_text().unwrap_or_default().to_string();
                if self.last_values.get(&field) == Some(&value) {
                    tracing::debug!("Dropped type on {}: value unchanged", field.selector);
                    return None;
                }
                let recorded = self.record(action)?;
                self.last_values.insert(field, value);
                Some(recorded)
            }
            TimerKey::Hover => self.record(action),
            TimerKey::Scroll => {
                let x = action.scroll_x.unwrap_or_default();
                let y = action.scroll_y.unwrap_or_default();
                let delta = (x - self.last_scroll.0)
                    .abs()
                    .max((y - self.last_scroll.1).abs());
                if delta <= self.config.scroll_threshold_px {
                    tracing::debug!("Dropped scroll: moved {}px", delta);
                    return None;
                }
                let recorded = self.record(action)?;
                self.last_scroll = (x, y);
                Some(recorded)
            }
        }
    }

    /// Duplicate and dead-navigation checks, then sanitizing. Returns the action
    /// as it leaves the recorder.
    fn record(&mut self, mut action: Action) -> Option<Action> {
        if action.is_navigation() {
            if action.url.is_some() && action.url == self.last_navigation_url {
                tracing::debug!(
                    "Dropped navigate to {}: already there",
                    action.url.as_deref().unwrap_or_default()
                );
                return None;
            }
            self.last_navigation_url = action.url.clone();
            if action.url.is_some() {
                self.current_url = action.url.clone();
            }
        } else if let Some(last) = &self.last_recorded {
            if self.is_duplicate(last, &action) {
                tracing::debug!(
                    "Dropped duplicate {} within {}ms",
                    action.action_type,
                    self.config.duplicate_window_ms
                );
                return None;
            }
        }

        sanitize(&mut action, &self.config);
        tracing::debug!(
            "Recorded {}{}",
            action.action_type,
            action
                .selector
                .as_ref()
                .map(|s| format!(" on {}", s))
                .unwrap_or_default()
        );
        self.last_recorded = Some(action.clone());
        Some(action)
    }

    /// Same type and target inside the window. A form `submit` right after a
    /// submit-button click is the same submission and counts as a duplicate.
    fn is_duplicate(&self, last: &Action, action: &Action) -> bool {
        let elapsed = action.timestamp.saturating_sub(last.timestamp);
        let both_submit = last.action_type == ActionType::Submit
            && action.action_type == ActionType::Submit;
        elapsed < self.config.duplicate_window_ms && (both_submit || last.same_target(action))
    }
}

fn field_key(action: &Action) -> FieldKey {
    FieldKey {
        selector: action
            .selector
            .clone()
            .unwrap_or_else(|| Selector::css_path("*")),
        frame_path: action.frame_path.clone(),
    }
}

/// Action on `target` with the element metadata downstream layers use.
fn element_action(action_type: ActionType, target: &ElementSnapshot, timestamp: u64) -> Action {
    let mut action = Action::on(
        action_type,
        dom::resolve(target),
        dom::frame_path(target),
        timestamp,
    );
    action.tag_name = Some(target.tag_name.clone()).filter(|t| !t.is_empty());
    action.text = match (&action.action_type, target.form.selected_text.as_deref()) {
        (ActionType::Select, Some(selected)) => Some(selected.to_string()),
        _ if target.is_text_entry() => None,
        _ => target.trimmed_text().map(|t| truncate_chars(t, TEXT_LIMIT_CHARS)),
    };
    action.element_id = target.unique_id().map(|id| id.to_string());
    action.has_tooltip = target.has_tooltip();
    action.is_important = target.is_important();
    action.input_type = target.input_type();
    action.value = target.current_value();
    if target.is_checkable() {
        action.checked = target.form.checked;
    }
    if target.is_select() {
        action.multiple = Some(target.form.multiple);
    }
    action
}

fn selector_only(action_type: ActionType, target: &ElementSnapshot, timestamp: u64) -> Action {
    let mut action = Action::on(
        action_type,
        dom::resolve(target),
        dom::frame_path(target),
        timestamp,
    );
    action.tag_name = Some(target.tag_name.clone()).filter(|t| !t.is_empty());
    action
}

fn is_recordable_key(key: &str, modifiers: &Modifiers, target: &ElementSnapshot) -> bool {
    if (modifiers.ctrl || modifiers.meta) && SHORTCUT_KEYS.contains(&key.to_ascii_lowercase().as_str()) {
        return true;
    }
    if key == "Enter" {
        return target.is_tag("input") || target.is_tag("textarea");
    }
    NAVIGATION_KEYS.contains(&key)
}

/// Password redaction, upload path stripping and length limiting.
fn sanitize(action: &mut Action, config: &RecorderConfig) {
    let is_password = action.input_type.as_deref() == Some("password");
    let is_upload = action.action_type == ActionType::Upload;
    let limit = config.value_limit_chars;

    action.value = action.value.take().map(|value| match value {
        ActionValue::Text(_) if is_password => ActionValue::Text(config.redaction_marker.clone()),
        ActionValue::Text(text) if is_upload => {
            let names: Vec<String> = text
                .split(", ")
                .map(|name| file_name_only(name).to_string())
                .collect();
            ActionValue::Text(limit_chars(&names.join(", "), limit))
        }
        ActionValue::Text(text) => ActionValue::Text(limit_chars(&text, limit)),
        ActionValue::List(values) => {
            ActionValue::List(values.iter().map(|v| limit_chars(v, limit)).collect())
        }
        flag @ ActionValue::Flag(_) => flag,
    });

    if is_password {
        action.text = None;
    }
    action.text = action.text.take().map(|t| limit_chars(&t, limit));
}

fn file_name_only(path: &str) -> &str {
    path.rsplit(['/', '\\']).next().unwrap_or(path)
}

/// Values over `limit` chars keep the first `limit` chars plus `...`.
fn limit_chars(text: &str, limit: usize) -> String {
    if text.chars().count() > limit {
        format!("{}...", truncate_chars(text, limit))
    } else {
        text.to_string()
    }
}

fn truncate_chars(text: &str, limit: usize) -> String {
    text.chars().take(limit).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::SelectorKind;

    fn el(tag: &str, attrs: &[(&str, &str)]) -> ElementSnapshot {
        let mut el = ElementSnapshot {
            tag_name: tag.to_string(),
            id_match_count: 1,
            ..Default::default()
        };
        for (k, v) in attrs {
            el.attributes.insert(k.to_string(), v.to_string());
        }
        el
    }

    fn field(id: &str, value: &str) -> ElementSnapshot {
        let mut input = el("input", &[("id", id), ("type", "text")]);
        input.form.value = Some(value.to_string());
        input
    }

    fn recording() -> EventClassifier {
        let mut classifier = EventClassifier::new(RecorderConfig::default());
        classifier.start(Some("https://app.test/"), 0);
        classifier
    }

    fn click(target: ElementSnapshot, timestamp: u64) -> RawEvent {
        RawEvent::Click {
            target,
            detail: 1,
            button: 0,
            timestamp,
        }
    }

    #[test]
    fn test_start_records_initial_navigate() {
        let mut classifier = EventClassifier::new(RecorderConfig::default());
        assert_eq!(classifier.state(), RecorderState::Idle);

        let actions = classifier.start(Some("https://app.test/"), 5);
        assert_eq!(actions.len(), 1);
        assert_eq!(actions[0].url.as_deref(), Some("https://app.test/"));
        assert!(classifier.is_recording());
    }

    #[test]
    fn test_idle_classifier_ignores_events() {
        let mut classifier = EventClassifier::new(RecorderConfig::default());
        assert!(classifier
            .handle(click(el("button", &[("id", "go")]), 10))
            .is_empty());
    }

    #[test]
    fn test_click_subtypes() {
        let mut classifier = recording();
        let button = el("button", &[("id", "go")]);

        let dbl = classifier.handle(RawEvent::Click {
            target: button.clone(),
            detail: 2,
            button: 0,
            timestamp: 1000,
        });
        assert_eq!(dbl[0].action_type, ActionType::DoubleClick);

        let right = classifier.handle(RawEvent::ContextMenu {
            target: button,
            timestamp: 2000,
        });
        assert_eq!(right[0].action_type, ActionType::RightClick);

        let submit = classifier.handle(click(el("input", &[("id", "send"), ("type", "submit")]), 3000));
        assert_eq!(submit[0].action_type, ActionType::Submit);

        let mut checkbox = el("input", &[("id", "tos"), ("type", "checkbox")]);
        checkbox.form.checked = Some(true);
        let check = classifier.handle(click(checkbox, 4000));
        assert_eq!(check[0].action_type, ActionType::Check);
        assert_eq!(check[0].checked, Some(true));
    }

    #[test]
    fn test_click_filters() {
        let mut classifier = recording();

        assert!(classifier.handle(click(el("div", &[("id", "plain")]), 1000)).is_empty());

        let mut pointer = el("div", &[("id", "card")]);
        pointer.style.cursor = Some("pointer".into());
        assert_eq!(classifier.handle(click(pointer, 2000)).len(), 1);

        assert!(classifier
            .handle(click(el("button", &[("id", "off"), ("disabled", "true"), ("aria-disabled", "true")]), 3000))
            .is_empty());

        let mut hidden = el("button", &[("id", "ghost")]);
        hidden.has_layout_box = false;
        assert!(classifier.handle(click(hidden, 4000)).is_empty());

        let mut overlay = el("button", &[("id", "rec-stop")]);
        overlay.in_recorder_overlay = true;
        assert!(classifier.handle(click(overlay, 5000)).is_empty());
    }

    #[test]
    fn test_duplicate_click_within_window_is_dropped() {
        let mut classifier = recording();
        let button = el("button", &[("id", "save")]);

        assert_eq!(classifier.handle(click(button.clone(), 1000)).len(), 1);
        assert!(classifier.handle(click(button.clone(), 1300)).is_empty());
        assert_eq!(classifier.handle(click(button, 1900)).len(), 1);
    }

    #[test]
    fn test_typing_burst_records_last_value_once() {
        let mut classifier = recording();

        for (i, value) in ["h", "hel", "hello"].iter().enumerate() {
            let out = classifier.handle(RawEvent::Input {
                target: field("q", value),
                timestamp: 1000 + i as u64 * 500,
            });
            assert!(out.is_empty());
        }
        assert_eq!(classifier.pending_timers(), 1);
        assert_eq!(classifier.next_deadline(), Some(4000));

        let fired = classifier.poll(4000);
        assert_eq!(fired.len(), 1);
        assert_eq!(fired[0].action_type, ActionType::Type);
        assert_eq!(fired[0].value_text(), Some("hello"));
    }

    #[test]
    fn test_unchanged_value_is_not_recorded_twice() {
        let mut classifier = recording();
        classifier.handle(RawEvent::Input {
            target: field("q", "same"),
            timestamp: 1000,
        });
        assert_eq!(classifier.poll(3000).len(), 1);

        classifier.handle(RawEvent::Change {
            target: field("q", "same"),
            timestamp: 9000,
        });
        assert!(classifier.poll(11000).is_empty());
    }

    #[test]
    fn test_immediate_action_flushes_pending_type_first() {
        let mut classifier = recording();
        classifier.handle(RawEvent::Input {
            target: field("q", "rust"),
            timestamp: 1000,
        });

        let out = classifier.handle(RawEvent::KeyDown {
            target: field("q", "rust"),
            key: "Enter".into(),
            ctrl: false,
            meta: false,
            shift: false,
            alt: false,
            timestamp: 1200,
        });
        let types: Vec<&ActionType> = out.iter().map(|a| &a.action_type).collect();
        assert_eq!(types, vec![&ActionType::Type, &ActionType::Keypress]);
        assert_eq!(classifier.pending_timers(), 0);
    }

    #[test]
    fn test_password_is_redacted_and_long_values_truncated() {
        let mut classifier = recording();
        let mut password = el("input", &[("id", "pw"), ("type", "password")]);
        password.form.value = Some("hunter2".into());
        classifier.handle(RawEvent::Input {
            target: password,
            timestamp: 1000,
        });
        classifier.handle(RawEvent::Input {
            target: field("bio", &"a".repeat(150)),
            timestamp: 1100,
        });

        let fired = classifier.poll(5000);
        assert_eq!(fired[0].value_text(), Some("***"));
        let bio = fired[1].value_text().unwrap();
        assert_eq!(bio.chars().count(), 103);
        assert!(bio.ends_with("..."));
    }

    #[test]
    fn test_upload_keeps_file_name_only() {
        let mut classifier = recording();
        let mut file = el("input", &[("id", "cv"), ("type", "file")]);
        file.form.value = Some("C:\\fakepath\\resume.pdf".into());
        let out = classifier.handle(RawEvent::Change {
            target: file,
            timestamp: 1000,
        });
        assert_eq!(out[0].action_type, ActionType::Upload);
        assert_eq!(out[0].value_text(), Some("resume.pdf"));
    }

    #[test]
    fn test_key_allow_list() {
        let mut classifier = recording();
        let body = el("body", &[]);
        let key = |key: &str, ctrl: bool, target: ElementSnapshot, timestamp: u64| RawEvent::KeyDown {
            target,
            key: key.into(),
            ctrl,
            meta: false,
            shift: false,
            alt: false,
            timestamp,
        };

        assert!(classifier.handle(key("a", false, body.clone(), 1000)).is_empty());
        assert!(classifier.handle(key("Enter", false, body.clone(), 2000)).is_empty());

        let copy = classifier.handle(key("c", true, body.clone(), 3000));
        assert_eq!(copy[0].key.as_deref(), Some("c"));
        assert!(copy[0].selector.is_none());

        assert_eq!(classifier.handle(key("Escape", false, body, 4000)).len(), 1);
    }

    #[test]
    fn test_hover_requires_tooltip_and_debounces() {
        let mut classifier = recording();
        let plain = el("span", &[("id", "s")]);
        let help = el("button", &[("id", "help"), ("title", "Help")]);

        classifier.handle(RawEvent::MouseOver {
            target: plain,
            timestamp: 1000,
        });
        assert_eq!(classifier.pending_timers(), 0);

        classifier.handle(RawEvent::MouseOver {
            target: help.clone(),
            timestamp: 1000,
        });
        classifier.handle(RawEvent::MouseOver {
            target: help,
            timestamp: 1200,
        });
        assert!(classifier.poll(1400).is_empty());
        let fired = classifier.poll(1500);
        assert_eq!(fired.len(), 1);
        assert_eq!(fired[0].action_type, ActionType::Hover);
        assert_eq!(fired[0].selector.as_ref().unwrap().kind, SelectorKind::Title);
    }

    #[test]
    fn test_scroll_threshold() {
        let mut classifier = recording();
        let scroll = |y: i64, timestamp: u64| RawEvent::Scroll {
            target: None,
            scroll_x: 0,
            scroll_y: y,
            timestamp,
        };

        classifier.handle(scroll(100, 1000));
        assert!(classifier.poll(1100).is_empty());

        classifier.handle(scroll(101, 2000));
        let kept = classifier.poll(2100);
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].scroll_y, Some(101));
        assert!(kept[0].selector.is_none());

        classifier.handle(scroll(150, 3000));
        assert!(classifier.poll(3100).is_empty());
    }

    #[test]
    fn test_spa_navigation_and_dead_navigation() {
        let mut classifier = recording();

        assert!(classifier
            .handle(RawEvent::Mutation {
                href: "https://app.test/".into(),
                timestamp: 1000,
            })
            .is_empty());

        let nav = classifier.handle(RawEvent::Mutation {
            href: "https://app.test/cart".into(),
            timestamp: 2000,
        });
        assert_eq!(nav[0].previous_url.as_deref(), Some("https://app.test/"));

        assert!(classifier
            .handle(RawEvent::Unload {
                url: "https://app.test/cart".into(),
                timestamp: 3000,
            })
            .is_empty());
    }

    #[test]
    fn test_timers_firing_after_stop_are_discarded() {
        let mut classifier = recording();
        classifier.handle(RawEvent::Input {
            target: field("q", "late"),
            timestamp: 1000,
        });
        classifier.stop();

        assert!(classifier.poll(5000).is_empty());
        assert_eq!(classifier.pending_timers(), 0);
    }

    #[test]
    fn test_appended_navigate_follows_pending_type() {
        let mut classifier = recording();
        classifier.handle(RawEvent::Input {
            target: field("q", "half typed"),
            timestamp: 1000,
        });

        let out = classifier
            .append(Action::navigate("https://app.test/next", None, 1200))
            .unwrap();
        let types: Vec<&ActionType> = out.iter().map(|a| &a.action_type).collect();
        assert_eq!(types, vec![&ActionType::Type, &ActionType::Navigate]);
        assert_eq!(classifier.pending_timers(), 0);

        // Already on that page
        let again = classifier
            .append(Action::navigate("https://app.test/next", None, 1300))
            .unwrap();
        assert!(again.is_empty());

        classifier.stop();
        assert!(classifier
            .append(Action::navigate("https://app.test/other", None, 1400))
            .is_none());
    }

    #[test]
    fn test_form_submit_after_submit_click_is_one_submission() {
        let mut classifier = recording();
        let button = el("button", &[("id", "send"), ("type", "submit")]);
        let form = el("form", &[("id", "signup")]);

        assert_eq!(classifier.handle(click(button, 1000)).len(), 1);
        assert!(classifier
            .handle(RawEvent::Submit {
                target: form,
                timestamp: 1010,
            })
            .is_empty());
    }

    #[test]
    fn test_frame_path_is_carried_on_actions() {
        let mut classifier = recording();
        let mut button = el("button", &[("id", "pay")]);
        button.boundaries = vec![crate::dom::BoundaryHost {
            id: Some("checkout".into()),
            ..Default::default()
        }];

        let out = classifier.handle(click(button, 1000));
        assert_eq!(out[0].frame_path.len(), 1);
        assert_eq!(out[0].frame_path[0].selector.value, "#checkout");
    }
}
