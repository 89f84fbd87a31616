use serde::{Deserialize, Serialize};

use crate::dom::ElementSnapshot;

/// One DOM event as pushed by the content script.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum RawEvent {
    #[serde(rename = "click")]
    Click {
        target: ElementSnapshot,
        /// `event.detail`: 2 for the second click of a double click
        #[serde(default)]
        detail: u32,
        /// `event.button`: 2 is the secondary button
        #[serde(default)]
        button: u8,
        timestamp: u64,
    },
    #[serde(rename = "contextmenu")]
    ContextMenu { target: ElementSnapshot, timestamp: u64 },
    #[serde(rename = "input")]
    Input { target: ElementSnapshot, timestamp: u64 },
    #[serde(rename = "change")]
    Change { target: ElementSnapshot, timestamp: u64 },
    #[serde(rename = "focus")]
    Focus { target: ElementSnapshot, timestamp: u64 },
    #[serde(rename = "blur")]
    Blur { target: ElementSnapshot, timestamp: u64 },
    #[serde(rename = "mouseover", alias = "mouseenter")]
    MouseOver { target: ElementSnapshot, timestamp: u64 },
    #[serde(rename = "keydown")]
    KeyDown {
        target: ElementSnapshot,
        key: String,
        #[serde(default)]
        ctrl: bool,
        #[serde(default)]
        meta: bool,
        #[serde(default)]
        shift: bool,
        #[serde(default)]
        alt: bool,
        timestamp: u64,
    },
    /// `target` is absent for document scrolls
    #[serde(rename = "scroll")]
    Scroll {
        #[serde(default)]
        target: Option<ElementSnapshot>,
        #[serde(rename = "scrollX", default)]
        scroll_x: i64,
        #[serde(rename = "scrollY", default)]
        scroll_y: i64,
        timestamp: u64,
    },
    #[serde(rename = "submit")]
    Submit { target: ElementSnapshot, timestamp: u64 },
    #[serde(rename = "dragstart")]
    DragStart { target: ElementSnapshot, timestamp: u64 },
    #[serde(rename = "drop")]
    Drop { target: ElementSnapshot, timestamp: u64 },
    /// A mutation batch was observed; `href` is `location.href` afterwards
    #[serde(rename = "mutation")]
    Mutation { href: String, timestamp: u64 },
    /// The page is unloading; `url` is the outgoing location
    #[serde(rename = "unload")]
    Unload { url: String, timestamp: u64 },
}

impl RawEvent {
    pub fn timestamp(&self) -> u64 {
        match self {
            RawEvent::Click { timestamp, .. }
            | RawEvent::ContextMenu { timestamp, .. }
            | RawEvent::Input { timestamp, .. }
            | RawEvent::Change { timestamp, .. }
            | RawEvent::Focus { timestamp, .. }
            | RawEvent::Blur { timestamp, .. }
            | RawEvent::MouseOver { timestamp, .. }
            | RawEvent::KeyDown { timestamp, .. }
            | RawEvent::Scroll { timestamp, .. }
            | RawEvent::Submit { timestamp, .. }
            | RawEvent::DragStart { timestamp, .. }
            | RawEvent::Drop { timestamp, .. }
            | RawEvent::Mutation { timestamp, .. }
            | RawEvent::Unload { timestamp, .. } => *timestamp,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            RawEvent::Click { .. } => "click",
            RawEvent::ContextMenu { .. } => "contextmenu",
            RawEvent::Input { .. } => "input",
            RawEvent::Change { .. } => "change",
            RawEvent::Focus { .. } => "focus",
            RawEvent::Blur { .. } => "blur",
            RawEvent::MouseOver { .. } => "mouseover",
            RawEvent::KeyDown { .. } => "keydown",
            RawEvent::Scroll { .. } => "scroll",
            RawEvent::Submit { .. } => "submit",
            RawEvent::DragStart { .. } => "dragstart",
            RawEvent::Drop { .. } => "drop",
            RawEvent::Mutation { .. } => "mutation",
            RawEvent::Unload { .. } => "unload",
        }
    }

    /// Normalizes every embedded element snapshot in place.
    pub fn normalize(&mut self) {
        match self {
            RawEvent::Click { target, .. }
            | RawEvent::ContextMenu { target, .. }
            | RawEvent::Input { target, .. }
            | RawEvent::Change { target, .. }
            | RawEvent::Focus { target, .. }
            | RawEvent::Blur { target, .. }
            | RawEvent::MouseOver { target, .. }
            | RawEvent::KeyDown { target, .. }
            | RawEvent::Submit { target, .. }
            | RawEvent::DragStart { target, .. }
            | RawEvent::Drop { target, .. } => target.normalize(),
            RawEvent::Scroll {
                target: Some(target),
                ..
            } => target.normalize(),
            RawEvent::Scroll { target: None, .. }
            | RawEvent::Mutation { .. }
            | RawEvent::Unload { .. } => {}
        }
    }
}
