//! Action log → test plan: page groups, named steps and the per-action
//! operation table shared by every language back end.

use super::cleanup::{anchor, prefilter};
use super::keys::{key_chord, key_description};
use super::ops::{MouseButton, Operation, Target};
use crate::config::GeneratorConfig;
use crate::models::{Action, ActionType, ActionValue};

/// Actions that happened under one navigation.
#[derive(Debug, Clone, PartialEq)]
pub struct PageGroup {
    pub url: String,
    pub actions: Vec<Action>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Step {
    pub title: String,
    pub operations: Vec<Operation>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlanEntry {
    Step(Step),
    /// An action that could not be rendered; becomes a comment marker
    Skipped { reason: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TestPlan {
    pub start_url: Option<String>,
    /// Top-level calls before the first step (navigate to start, settle wait)
    pub opening: Vec<Operation>,
    pub entries: Vec<PlanEntry>,
}

impl TestPlan {
    pub fn build(actions: &[Action], fallback_start_url: Option<&str>, config: &GeneratorConfig) -> Self {
        let groups = group_by_page(anchor(prefilter(actions, config)));
        let start_url = groups
            .first()
            .map(|g| g.url.clone())
            .or_else(|| fallback_start_url.map(|u| u.to_string()))
            .filter(|u| !u.trim().is_empty());

        let mut entries = Vec::new();
        let mut page_opens = Vec::new();

        for (index, group) in groups.iter().enumerate() {
            if index > 0 {
                page_opens.push(entries.len());
                entries.push(PlanEntry::Step(Step {
                    title: format!("Navigate to {}", group.url),
                    operations: vec![Operation::Goto {
                        url: group.url.clone(),
                    }],
                }));
            }

            let mut steps = synthesize_steps(&group.actions, config);
            let followed_by_navigation = index + 1 < groups.len();
            if followed_by_navigation {
                if let Some(PlanEntry::Step(last)) = steps.last_mut() {
                    last.operations.push(Operation::SettleWait {
                        ms: config.settle_wait_ms,
                    });
                }
            }
            entries.extend(steps);
        }

        for index in page_opens {
            if index + 1 < entries.len() {
                if let PlanEntry::Step(step) = &mut entries[index] {
                    step.operations.push(Operation::SettleWait {
                        ms: config.settle_wait_ms,
                    });
                }
            }
        }

        let mut opening = Vec::new();
        if let Some(url) = &start_url {
            opening.push(Operation::Goto { url: url.clone() });
            if !entries.is_empty() {
                opening.push(Operation::SettleWait {
                    ms: config.settle_wait_ms,
                });
            }
        }

        Self {
            start_url,
            opening,
            entries,
        }
    }

    pub fn steps(&self) -> impl Iterator<Item = &Step> {
        self.entries.iter().filter_map(|entry| match entry {
            PlanEntry::Step(step) => Some(step),
            PlanEntry::Skipped { .. } => None,
        })
    }
}

/// Splits an anchored log (first action is a navigate) into page groups.
/// Consecutive navigations to the same URL collapse into one group.
pub fn group_by_page(actions: Vec<Action>) -> Vec<PageGroup> {
    let mut groups: Vec<PageGroup> = Vec::new();

    for action in actions {
        if let (ActionType::Navigate, Some(url)) = (&action.action_type, &action.url) {
            if groups.last().map(|g| &g.url) == Some(url) {
                continue;
            }
            groups.push(PageGroup {
                url: url.clone(),
                actions: Vec::new(),
            });
            continue;
        }

        match groups.last_mut() {
            Some(group) => group.actions.push(action),
            None => tracing::debug!("Dropping {} before first navigate", action.action_type),
        }
    }

    groups
}

/// Clusters one page's actions into named steps, in order.
fn synthesize_steps(actions: &[Action], config: &GeneratorConfig) -> Vec<PlanEntry> {
    let mut entries = Vec::new();
    let mut index = 0;

    while index < actions.len() {
        // A lone keypress keeps its key-based title
        let end = typing_run_end(actions, index);
        if end > index + 1 || actions[index].action_type == ActionType::Type {
            entries.push(typing_step(&actions[index..end], config));
            index = end;
            continue;
        }

        entries.push(match operations_for(&actions[index], config) {
            Ok(step) => PlanEntry::Step(step),
            Err(reason) => {
                tracing::debug!("Skipping action in generated code: {}", reason);
                PlanEntry::Skipped { reason }
            }
        });
        index += 1;
    }

    entries
}

/// End (exclusive) of the run of type/keypress actions on the same field
/// starting at `start`.
fn typing_run_end(actions: &[Action], start: usize) -> usize {
    let first = &actions[start];
    let is_typing = |a: &Action| matches!(a.action_type, ActionType::Type | ActionType::Keypress);
    if !is_typing(first) || first.selector.is_none() {
        return start + 1;
    }

    let mut end = start + 1;
    while end < actions.len()
        && is_typing(&actions[end])
        && actions[end].selector == first.selector
        && actions[end].frame_path == first.frame_path
    {
        end += 1;
    }
    end
}

fn typing_step(run: &[Action], config: &GeneratorConfig) -> PlanEntry {
    let target = match Target::of(&run[0]) {
        Some(target) => target,
        None => {
            return PlanEntry::Skipped {
                reason: "type action without selector".to_string(),
            }
        }
    };

    let mut operations = Vec::new();
    for action in run {
        match operations_for(action, config) {
            Ok(step) => operations.extend(step.operations),
            Err(reason) => operations.push(Operation::Note {
                text: format!("Skipped: {}", reason),
            }),
        }
    }

    PlanEntry::Step(Step {
        title: format!("Type in {}", target.selector),
        operations,
    })
}

/// The operation table: one recorded action → a titled step.
fn operations_for(action: &Action, config: &GeneratorConfig) -> Result<Step, String> {
    let target = Target::of(action);
    let on = |verb: &str, target: &Target| format!("{} on {}", verb, target.selector);
    let step = |title: String, operations: Vec<Operation>| Step { title, operations };

    Ok(match &action.action_type {
        ActionType::Click => {
            let target = required(&target, action)?;
            step(
                on("Click", &target),
                vec![Operation::Click {
                    target,
                    button: MouseButton::Left,
                }],
            )
        }
        ActionType::DoubleClick => {
            let target = required(&target, action)?;
            step(on("Double-click", &target), vec![Operation::DoubleClick { target }])
        }
        ActionType::RightClick => {
            let target = required(&target, action)?;
            step(
                on("Right-click", &target),
                vec![Operation::Click {
                    target,
                    button: MouseButton::Right,
                }],
            )
        }
        ActionType::Type => {
            let target = required(&target, action)?;
            let value = action.value_text().unwrap_or_default().to_string();
            step(
                format!("Type in {}", target.selector),
                vec![Operation::Fill { target, value }],
            )
        }
        ActionType::Check => {
            let target = required(&target, action)?;
            let checked = action
                .checked
                .or(match action.value {
                    Some(ActionValue::Flag(flag)) => Some(flag),
                    _ => None,
                })
                .unwrap_or(true);
            if checked || action.input_type.as_deref() == Some("radio") {
                step(on("Check", &target), vec![Operation::Check { target }])
            } else {
                step(on("Uncheck", &target), vec![Operation::Uncheck { target }])
            }
        }
        ActionType::Select => {
            let target = required(&target, action)?;
            let values = action
                .value
                .as_ref()
                .map(ActionValue::to_list)
                .unwrap_or_default();
            if values.is_empty() {
                return Err(format!("select on {} without a value", target.selector));
            }
            let multiple = action.multiple == Some(true) || values.len() > 1;
            step(
                on("Select", &target),
                vec![Operation::SelectOption {
                    target,
                    values,
                    multiple,
                }],
            )
        }
        ActionType::Upload => {
            let target = required(&target, action)?;
            let files: Vec<String> = action
                .value_text()
                .unwrap_or_default()
                .split(", ")
                .map(str::trim)
                .filter(|f| !f.is_empty())
                .map(|f| f.to_string())
                .collect();
            if files.is_empty() {
                return Err(format!("upload on {} without a file name", target.selector));
            }
            step(on("Upload", &target), vec![Operation::SetInputFiles { target, files }])
        }
        ActionType::Navigate => match &action.url {
            Some(url) => step(
                format!("Navigate to {}", url),
                vec![Operation::Goto { url: url.clone() }],
            ),
            None => return Err("navigate action without url".to_string()),
        },
        ActionType::Hover => {
            let target = required(&target, action)?;
            step(on("Hover", &target), vec![Operation::Hover { target }])
        }
        ActionType::Focus => {
            let target = required(&target, action)?;
            step(on("Focus", &target), vec![Operation::Focus { target }])
        }
        ActionType::Blur => {
            let target = required(&target, action)?;
            step(on("Blur", &target), vec![Operation::Blur { target }])
        }
        ActionType::Wait => match target {
            Some(target) => step(on("Wait", &target), vec![Operation::WaitFor { target }]),
            None => step(
                "Wait".to_string(),
                vec![Operation::SettleWait {
                    ms: config.settle_wait_ms,
                }],
            ),
        },
        ActionType::Keypress => {
            let key = action
                .key
                .as_deref()
                .filter(|k| !k.is_empty())
                .ok_or_else(|| "keypress action without key".to_string())?;
            let modifiers = action.modifiers.unwrap_or_default();
            let description = key_description(key, &modifiers);
            let title = match &target {
                Some(target) => on(&description, target),
                None => description,
            };
            step(
                title,
                vec![Operation::Press {
                    target,
                    key: key_chord(key, &modifiers),
                }],
            )
        }
        ActionType::Scroll => {
            let x = action.scroll_x.unwrap_or_default();
            let y = action.scroll_y.unwrap_or_default();
            match target {
                Some(target) => step(
                    on("Scroll", &target),
                    vec![Operation::ScrollElement { target, x, y }],
                ),
                None => step(
                    format!("Scroll to ({}, {})", x, y),
                    vec![Operation::ScrollWindow {
                        frames: action.frame_path.clone(),
                        x,
                        y,
                    }],
                ),
            }
        }
        ActionType::DragStart => {
            let target = required(&target, action)?;
            step(
                on("Drag", &target),
                vec![
                    Operation::Hover {
                        target: target.clone(),
                    },
                    Operation::MouseDown,
                ],
            )
        }
        ActionType::Drop => {
            let target = required(&target, action)?;
            step(
                on("Drop", &target),
                vec![
                    Operation::Hover {
                        target: target.clone(),
                    },
                    Operation::MouseUp,
                ],
            )
        }
        ActionType::Submit => {
            let target = required(&target, action)?;
            let operation = if action.tag_name.as_deref() == Some("form") {
                Operation::RequestSubmit { target }
            } else {
                Operation::Click {
                    target,
                    button: MouseButton::Left,
                }
            };
            step("Submit form".to_string(), vec![operation])
        }
        ActionType::Other(name) => {
            return Err(format!("unsupported action type '{}'", name));
        }
    })
}

fn required(target: &Option<Target>, action: &Action) -> Result<Target, String> {
    target
        .clone()
        .ok_or_else(|| format!("{} action without selector", action.action_type))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Selector;

    fn at(action_type: ActionType, id: &str, timestamp: u64) -> Action {
        Action::on(action_type, Selector::unique_id(id), Vec::new(), timestamp)
    }

    fn titles(plan: &TestPlan) -> Vec<String> {
        plan.entries
            .iter()
            .map(|e| match e {
                PlanEntry::Step(s) => s.title.clone(),
                PlanEntry::Skipped { reason } => format!("skipped: {}", reason),
            })
            .collect()
    }

    #[test]
    fn test_group_by_page_collapses_repeated_navigation() {
        let groups = group_by_page(vec![
            Action::navigate("https://a.test", None, 0),
            at(ActionType::Click, "one", 10),
            Action::navigate("https://a.test/b", None, 20),
            Action::navigate("https://a.test/b", None, 30),
            at(ActionType::Click, "two", 40),
        ]);
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[1].url, "https://a.test/b");
        assert_eq!(groups[1].actions.len(), 1);
    }

    #[test]
    fn test_typing_run_becomes_one_step() {
        let mut enter = at(ActionType::Keypress, "q", 3000);
        enter.key = Some("Enter".into());
        let actions = vec![
            Action::navigate("https://a.test", None, 0),
            at(ActionType::Type, "q", 1000).with_value("rust"),
            enter,
            at(ActionType::Click, "go", 4000),
        ];

        let plan = TestPlan::build(&actions, None, &GeneratorConfig::default());
        assert_eq!(titles(&plan), vec!["Type in #q", "Click on #go"]);
        let typing = plan.steps().next().unwrap();
        assert_eq!(typing.operations.len(), 2);
        assert!(matches!(typing.operations[1], Operation::Press { ref key, .. } if key == "Enter"));
    }

    #[test]
    fn test_keypress_run_on_one_field_is_one_step() {
        // Different keys in quick succession are not duplicates
        let keys = [("ArrowDown", 100), ("Enter", 200)].map(|(key, timestamp)| {
            let mut press = at(ActionType::Keypress, "combo", timestamp);
            press.key = Some(key.into());
            press
        });
        let mut actions = vec![Action::navigate("https://a.test", None, 0)];
        actions.extend(keys);

        let plan = TestPlan::build(&actions, None, &GeneratorConfig::default());
        assert_eq!(titles(&plan), vec!["Type in #combo"]);
        let step = plan.steps().next().unwrap();
        assert_eq!(step.operations.len(), 2);
        assert!(matches!(step.operations[0], Operation::Press { ref key, .. } if key == "ArrowDown"));
    }

    #[test]
    fn test_lone_keypress_is_named_by_key() {
        let mut copy = at(ActionType::Keypress, "doc", 10);
        copy.key = Some("c".into());
        copy.modifiers = Some(crate::models::Modifiers {
            ctrl: true,
            ..Default::default()
        });
        let plan = TestPlan::build(
            &[Action::navigate("https://a.test", None, 0), copy],
            None,
            &GeneratorConfig::default(),
        );
        assert_eq!(titles(&plan), vec!["Copy on #doc"]);
    }

    #[test]
    fn test_settle_waits_around_navigation() {
        let actions = vec![
            Action::navigate("https://a.test", None, 0),
            at(ActionType::Click, "next", 10),
            Action::navigate("https://a.test/2", None, 20),
            at(ActionType::Click, "done", 30),
        ];
        let plan = TestPlan::build(&actions, None, &GeneratorConfig::default());

        assert_eq!(plan.opening.len(), 2);
        assert_eq!(
            titles(&plan),
            vec!["Click on #next", "Navigate to https://a.test/2", "Click on #done"]
        );
        let steps: Vec<&Step> = plan.steps().collect();
        assert!(matches!(steps[0].operations.last(), Some(Operation::SettleWait { ms: 1000 })));
        assert!(matches!(steps[1].operations.last(), Some(Operation::SettleWait { .. })));
        assert_eq!(steps[2].operations.len(), 1);
    }

    #[test]
    fn test_unknown_and_incomplete_actions_are_skipped() {
        let mut select = at(ActionType::Select, "country", 20);
        select.value = None;
        let actions = vec![
            Action::navigate("https://a.test", None, 0),
            Action::new(ActionType::Other("pinch".into()), 10),
            select,
            Action::new(ActionType::Click, 30),
        ];
        let plan = TestPlan::build(&actions, None, &GeneratorConfig::default());
        assert_eq!(
            titles(&plan),
            vec![
                "skipped: unsupported action type 'pinch'",
                "skipped: select on #country without a value",
                "skipped: click action without selector",
            ]
        );
    }

    #[test]
    fn test_empty_log_without_start_url_has_no_opening() {
        let plan = TestPlan::build(&[], None, &GeneratorConfig::default());
        assert!(plan.opening.is_empty());
        assert!(plan.entries.is_empty());

        let plan = TestPlan::build(&[], Some("https://start.test"), &GeneratorConfig::default());
        assert_eq!(
            plan.opening,
            vec![Operation::Goto {
                url: "https://start.test".into()
            }]
        );
    }

    #[test]
    fn test_submit_on_form_uses_request_submit() {
        let mut submit = at(ActionType::Submit, "signup", 10);
        submit.tag_name = Some("form".into());
        let mut button_submit = at(ActionType::Submit, "send", 2000);
        button_submit.tag_name = Some("button".into());

        let plan = TestPlan::build(
            &[Action::navigate("https://a.test", None, 0), submit, button_submit],
            None,
            &GeneratorConfig::default(),
        );
        let steps: Vec<&Step> = plan.steps().collect();
        assert_eq!(steps[0].title, "Submit form");
        assert!(matches!(steps[0].operations[0], Operation::RequestSubmit { .. }));
        assert!(matches!(steps[1].operations[0], Operation::Click { .. }));
    }

    #[test]
    fn test_unchecked_checkbox_renders_uncheck() {
        let mut check = at(ActionType::Check, "tos", 10);
        check.checked = Some(false);
        check.input_type = Some("checkbox".into());
        let plan = TestPlan::build(
            &[Action::navigate("https://a.test", None, 0), check],
            None,
            &GeneratorConfig::default(),
        );
        assert_eq!(titles(&plan), vec!["Uncheck on #tos"]);
    }
}
