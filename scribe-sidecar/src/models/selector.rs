use serde::{Deserialize, Serialize};
use std::fmt;

/// Locator strategy, in resolver priority order.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum SelectorKind {
    TestId,
    Role,
    Label,
    Placeholder,
    AltText,
    Title,
    UniqueId,
    Name,
    ClassAttr,
    CssPath,
}

/// How to find one element.
///
/// `value` holds the strategy's primary payload (the test id, the role, the label
/// text, a full CSS string for `UniqueId`/`ClassAttr`/`CssPath`, the raw attribute
/// value for `Name`). `aux_name` is strategy specific: the accessible name for
/// `Role`, the originating attribute for `TestId`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "camelCase")]
pub struct Selector {
    pub kind: SelectorKind,
    pub value: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aux_name: Option<String>,
}

impl Selector {
    fn new(kind: SelectorKind, value: impl Into<String>) -> Self {
        Self {
            kind,
            value: value.into(),
            aux_name: None,
        }
    }

    pub fn test_id(value: impl Into<String>, attribute: &str) -> Self {
        Self {
            aux_name: Some(attribute.to_string()),
            ..Self::new(SelectorKind::TestId, value)
        }
    }

    pub fn role(role: impl Into<String>, name: Option<String>) -> Self {
        Self {
            aux_name: name,
            ..Self::new(SelectorKind::Role, role)
        }
    }

    pub fn label(text: impl Into<String>) -> Self {
        Self::new(SelectorKind::Label, text)
    }

    pub fn placeholder(text: impl Into<String>) -> Self {
        Self::new(SelectorKind::Placeholder, text)
    }

    pub fn alt_text(text: impl Into<String>) -> Self {
        Self::new(SelectorKind::AltText, text)
    }

    pub fn title(text: impl Into<String>) -> Self {
        Self::new(SelectorKind::Title, text)
    }

    /// `#id` form, falling back to an attribute match for ids that are not
    /// plain CSS identifiers.
    pub fn unique_id(id: &str) -> Self {
        Self::new(SelectorKind::UniqueId, css_id(id))
    }

    pub fn name(name: impl Into<String>) -> Self {
        Self::new(SelectorKind::Name, name)
    }

    pub fn class_attr(class: &str) -> Self {
        Self::new(
            SelectorKind::ClassAttr,
            format!("[class=\"{}\"]", escape_attr(class)),
        )
    }

    pub fn css_path(path: impl Into<String>) -> Self {
        Self::new(SelectorKind::CssPath, path)
    }

    /// Whether generation should render this through `getByTestId`. Test ids taken
    /// from `data-test`, `data-qa` or `data-cy` render as attribute locators since
    /// Playwright's accessor only reads `data-testid` by default.
    pub fn is_default_test_id(&self) -> bool {
        self.kind == SelectorKind::TestId
            && matches!(self.aux_name.as_deref(), None | Some("data-testid"))
    }

    /// A CSS selector equivalent, for places that only accept CSS (frame hosts,
    /// generic locators).
    pub fn to_css(&self) -> String {
        match self.kind {
            SelectorKind::UniqueId | SelectorKind::ClassAttr | SelectorKind::CssPath => {
                self.value.clone()
            }
            SelectorKind::TestId => attr_match(
                self.aux_name.as_deref().unwrap_or("data-testid"),
                &self.value,
            ),
            SelectorKind::Role => match &self.aux_name {
                Some(name) => format!(
                    "{}{}",
                    attr_match("role", &self.value),
                    attr_match("aria-label", name)
                ),
                None => attr_match("role", &self.value),
            },
            SelectorKind::Label => attr_match("aria-label", &self.value),
            SelectorKind::Placeholder => attr_match("placeholder", &self.value),
            SelectorKind::AltText => attr_match("alt", &self.value),
            SelectorKind::Title => attr_match("title", &self.value),
            SelectorKind::Name => attr_match("name", &self.value),
        }
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            SelectorKind::TestId => write!(f, "test id \"{}\"", self.value),
            SelectorKind::Role => match &self.aux_name {
                Some(name) => write!(f, "{} \"{}\"", self.value, name),
                None => write!(f, "{}", self.value),
            },
            SelectorKind::Label => write!(f, "label \"{}\"", self.value),
            SelectorKind::Placeholder => write!(f, "placeholder \"{}\"", self.value),
            SelectorKind::AltText => write!(f, "image \"{}\"", self.value),
            SelectorKind::Title => write!(f, "title \"{}\"", self.value),
            SelectorKind::Name => write!(f, "{}", attr_match("name", &self.value)),
            SelectorKind::UniqueId | SelectorKind::ClassAttr | SelectorKind::CssPath => {
                write!(f, "{}", self.value)
            }
        }
    }
}

/// Which kind of boundary a frame step crosses.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum FrameKind {
    #[serde(rename = "iframe", alias = "Iframe")]
    Iframe,
    #[serde(rename = "shadow", alias = "ShadowHost", alias = "shadowHost")]
    ShadowHost,
}

/// One iframe or shadow-root boundary on the way to an element.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct FrameStep {
    pub kind: FrameKind,
    pub selector: Selector,
}

/// Outermost first; empty means the top document.
pub type FramePath = Vec<FrameStep>;

pub(crate) fn escape_attr(value: &str) -> String {
    value.replace('\\', "\\\\").replace('"', "\\\"")
}

pub(crate) fn attr_match(attribute: &str, value: &str) -> String {
    format!("[{}=\"{}\"]", attribute, escape_attr(value))
}

/// `.class` with the class escaped as a CSS identifier, so utility classes
/// such as `md:flex` or `w-1/2` stay valid.
pub(crate) fn css_class(class: &str) -> String {
    let mut out = String::with_capacity(class.len() + 1);
    out.push('.');
    let starts_with_dash = class.starts_with('-');
    for (i, c) in class.chars().enumerate() {
        let leading_digit = c.is_ascii_digit() && (i == 0 || (i == 1 && starts_with_dash));
        if c.is_control() || leading_digit {
            out.push_str(&format!("\\{:x} ", c as u32));
        } else if c == '-' && i == 0 && class.len() == 1 {
            out.push_str("\\-");
        } else if c.is_ascii_alphanumeric() || c == '-' || c == '_' || !c.is_ascii() {
            out.push(c);
        } else {
            out.push('\\');
            out.push(c);
        }
    }
    out
}

fn css_id(id: &str) -> String {
    let mut chars = id.chars();
    let plain_start = matches!(chars.next(), Some(c) if c.is_ascii_alphabetic() || c == '_');
    let plain_rest = id
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');

    if plain_start && plain_rest {
        format!("#{}", id)
    } else {
        attr_match("id", id)
    }
}
