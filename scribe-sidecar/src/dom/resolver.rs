//! Element → locator resolution.
//!
//! Each rule is tried in a fixed order and the first match wins, regardless of
//! element type. The structural path at the end always produces something, so
//! `resolve` never fails.

use super::element::{BoundaryHost, ElementSnapshot, PathNode};
use crate::models::selector::css_class;
use crate::models::{FrameKind, FramePath, FrameStep, Selector};

pub const TEST_ID_ATTRIBUTES: [&str; 4] = ["data-testid", "data-test", "data-qa", "data-cy"];

/// Accessible names at or above this length fall through to later rules
const ROLE_NAME_MAX_CHARS: usize = 50;

/// Ancestor levels walked by the structural fallback
const PATH_MAX_DEPTH: usize = 5;

/// Framework-generated class prefixes that make unstable selectors
const IGNORED_CLASS_PREFIXES: [&str; 2] = ["js-", "ng-"];

pub fn resolve(element: &ElementSnapshot) -> Selector {
    if let Some(selector) = test_id(element) {
        return selector;
    }

    if let Some(role) = element.role() {
        if let Some(name) = accessible_name(element) {
            return Selector::role(role, Some(name));
        }
    }

    if let Some(label) = element.label_text.as_deref().filter(|l| !l.is_empty()) {
        return Selector::label(label);
    }

    if let Some(placeholder) = element.attr("placeholder") {
        return Selector::placeholder(placeholder);
    }

    if element.is_tag("img") {
        if let Some(alt) = element.attr("alt") {
            return Selector::alt_text(alt);
        }
    }

    if let Some(title) = element.attr("title") {
        return Selector::title(title);
    }

    if let Some(id) = element.unique_id() {
        return Selector::unique_id(id);
    }

    if let Some(name) = element.attr("name") {
        return Selector::name(name);
    }

    if let Some(class) = element.attr("class") {
        return Selector::class_attr(class);
    }

    Selector::css_path(structural_path(element))
}

fn test_id(element: &ElementSnapshot) -> Option<Selector> {
    TEST_ID_ATTRIBUTES.iter().find_map(|attribute| {
        element
            .attr(attribute)
            .map(|value| Selector::test_id(value, attribute))
    })
}

/// `aria-label`, else short visible text.
fn accessible_name(element: &ElementSnapshot) -> Option<String> {
    if let Some(label) = element.attr("aria-label") {
        return Some(label.to_string());
    }
    element
        .trimmed_text()
        .filter(|text| text.chars().count() < ROLE_NAME_MAX_CHARS)
        .map(|text| text.to_string())
}

fn structural_path(element: &ElementSnapshot) -> String {
    let path = path_selector(&element.path, PATH_MAX_DEPTH, ClassFilter::Stable);
    if !path.is_empty() {
        return path;
    }
    if element.tag_name.is_empty() {
        "*".to_string()
    } else {
        element.tag_name.clone()
    }
}

#[derive(Clone, Copy)]
enum ClassFilter {
    /// At most two classes, skipping framework prefixes
    Stable,
    /// Every class
    All,
}

/// Joins `tag.class:nth-child(n)` segments outermost first, stopping at the
/// first ancestor with an id.
fn path_selector(nodes: &[PathNode], max_depth: usize, filter: ClassFilter) -> String {
    let mut segments = Vec::new();

    for node in nodes.iter().take(max_depth) {
        if let Some(id) = node.id.as_deref() {
            segments.push(Selector::unique_id(id).value);
            break;
        }

        if node.tag_name.is_empty() {
            continue;
        }

        let mut segment = node.tag_name.clone();
        let classes: Vec<&String> = match filter {
            ClassFilter::Stable => node
                .classes
                .iter()
                .filter(|c| !IGNORED_CLASS_PREFIXES.iter().any(|p| c.starts_with(p)))
                .take(2)
                .collect(),
            ClassFilter::All => node.classes.iter().collect(),
        };
        for class in classes {
            segment.push_str(&css_class(class));
        }

        if node.same_tag_count > 1 && node.child_index > 0 {
            segment.push_str(&format!(":nth-child({})", node.child_index));
        }

        segments.push(segment);
    }

    segments.reverse();
    segments.join(" > ")
}

/// Boundaries crossed to reach the element, outermost first.
pub fn frame_path(element: &ElementSnapshot) -> FramePath {
    element
        .boundaries
        .iter()
        .map(|host| FrameStep {
            kind: host.kind,
            selector: host_selector(host),
        })
        .collect()
}

fn host_selector(host: &BoundaryHost) -> Selector {
    if let Some(id) = host.id.as_deref() {
        return Selector::unique_id(id);
    }

    match host.kind {
        FrameKind::Iframe => {
            if let Some(name) = host.name.as_deref() {
                return Selector::css_path(format!(
                    "iframe{}",
                    crate::models::selector::attr_match("name", name)
                ));
            }
            if let Some(segment) = host.src.as_deref().and_then(last_path_segment) {
                return Selector::css_path(format!(
                    "iframe[src*=\"{}\"]",
                    crate::models::selector::escape_attr(segment)
                ));
            }
            Selector::css_path(fallback_host_path(host, usize::MAX, ClassFilter::All))
        }
        FrameKind::ShadowHost => {
            if !host.classes.is_empty() {
                let classes: String = host.classes.iter().map(|c| css_class(c)).collect();
                return Selector::css_path(classes);
            }
            Selector::css_path(fallback_host_path(host, PATH_MAX_DEPTH, ClassFilter::Stable))
        }
    }
}

fn fallback_host_path(host: &BoundaryHost, max_depth: usize, filter: ClassFilter) -> String {
    let path = path_selector(&host.path, max_depth, filter);
    if path.is_empty() {
        host.tag_name.clone()
    } else {
        path
    }
}

fn last_path_segment(src: &str) -> Option<&str> {
    src.rsplit('/').next().filter(|segment| !segment.is_empty())
}
