//! Second-pass cleanup over a finished action log.
//!
//! Capture already filters most noise; this pass repeats the checks with the
//! wider generation thresholds so hand-edited or older logs come out clean.

use crate::config::GeneratorConfig;
use crate::models::{Action, ActionType};

/// Drops hovers, duplicates, redundant navigations, small scrolls and
/// focus/blur on non-form elements.
pub fn prefilter(actions: &[Action], config: &GeneratorConfig) -> Vec<Action> {
    let mut kept: Vec<Action> = Vec::with_capacity(actions.len());
    let mut current_url: Option<&str> = None;
    let mut last_scroll = (0i64, 0i64);

    for action in actions {
        match action.action_type {
            ActionType::Hover => continue,
            ActionType::Navigate => {
                if action.url.is_some() && action.url.as_deref() == current_url {
                    tracing::debug!("Skipping redundant navigate to {:?}", action.url);
                    continue;
                }
                if action.url.is_some() {
                    current_url = action.url.as_deref();
                }
            }
            ActionType::Focus | ActionType::Blur => {
                if !is_form_tag(action.tag_name.as_deref()) {
                    continue;
                }
            }
            ActionType::Scroll => {
                let x = action.scroll_x.unwrap_or_default();
                let y = action.scroll_y.unwrap_or_default();
                let delta = (x - last_scroll.0).abs().max((y - last_scroll.1).abs());
                if delta <= config.scroll_threshold_px {
                    continue;
                }
                last_scroll = (x, y);
            }
            _ => {}
        }

        if !action.is_navigation() {
            if let Some(last) = kept.last() {
                let elapsed = action.timestamp.saturating_sub(last.timestamp);
                if last.same_target(action) && elapsed < config.duplicate_window_ms {
                    continue;
                }
            }
        }

        kept.push(action.clone());
    }

    kept
}

/// Everything from the first navigate that carries a URL onwards.
pub fn anchor(actions: Vec<Action>) -> Vec<Action> {
    match actions
        .iter()
        .position(|a| a.is_navigation() && a.url.is_some())
    {
        Some(start) => actions.into_iter().skip(start).collect(),
        None => Vec::new(),
    }
}

fn is_form_tag(tag: Option<&str>) -> bool {
    matches!(
        tag.map(|t| t.to_ascii_lowercase()).as_deref(),
        Some("input" | "textarea" | "select")
    )
}
