//! Shared rendering driver.
//!
//! Every operation lowers to one abstract `Call` here; the language modules
//! only say how a call, a string or a file skeleton is spelled.

mod java;
mod javascript;
mod python;

pub use java::Java;
pub use javascript::{JavaScript, TypeScript};
pub use python::Python;

use std::sync::OnceLock;

use regex::Regex;

use super::ops::{MouseButton, Operation, Target};
use super::plan::{PlanEntry, TestPlan};
use crate::models::{FrameKind, Language, Selector, SelectorKind};

/// Roles Playwright's `getByRole` accepts; anything else renders as an
/// attribute locator.
const ARIA_ROLES: &[&str] = &[
    "alert", "alertdialog", "application", "article", "banner", "blockquote", "button",
    "caption", "cell", "checkbox", "code", "columnheader", "combobox", "complementary",
    "contentinfo", "definition", "deletion", "dialog", "directory", "document", "emphasis",
    "feed", "figure", "form", "generic", "grid", "gridcell", "group", "heading", "img",
    "insertion", "link", "list", "listbox", "listitem", "log", "main", "marquee", "math",
    "meter", "menu", "menubar", "menuitem", "menuitemcheckbox", "menuitemradio", "navigation",
    "none", "note", "option", "paragraph", "presentation", "progressbar", "radio",
    "radiogroup", "region", "row", "rowgroup", "rowheader", "scrollbar", "search",
    "searchbox", "separator", "slider", "spinbutton", "status", "strong", "subscript",
    "superscript", "switch", "tab", "table", "tablist", "tabpanel", "term", "textbox", "time",
    "timer", "toolbar", "tooltip", "tree", "treegrid", "treeitem",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Goto,
    Click,
    DblClick,
    Fill,
    Check,
    Uncheck,
    SelectOption,
    SetInputFiles,
    Hover,
    Focus,
    Blur,
    WaitFor,
    Press,
    Evaluate,
    Down,
    Up,
    WaitForTimeout,
}

/// Locator accessors, spelled per language.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Accessor {
    FrameLocator,
    Locator,
    TestId,
    Label,
    Placeholder,
    AltText,
    Title,
}

/// What a locator chain currently hangs off, for languages whose role
/// options type depends on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scope {
    Page,
    FrameLocator,
    Locator,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageObject {
    Page,
    Keyboard,
    Mouse,
}

pub enum Receiver {
    Page(PageObject),
    Element(Target),
}

pub enum Arg {
    Str(String),
    StrList(Vec<String>),
    Int(i64),
    /// JavaScript function source evaluated in the browser
    Script(String),
    Files(Vec<String>),
    Button(MouseButton),
}

pub struct Call {
    pub receiver: Receiver,
    pub method: Method,
    pub args: Vec<Arg>,
}

/// Language-specific spelling. Implementations hold no state.
pub trait Syntax {
    fn quote(&self, text: &str) -> String;
    fn method_name(&self, method: Method) -> &'static str;
    fn accessor_name(&self, accessor: Accessor) -> &'static str;
    fn page_object(&self, object: PageObject) -> &'static str;
    /// `.getByRole(...)` including the leading dot
    fn role_accessor(&self, role: &str, name: Option<&str>, scope: Scope) -> String;
    fn string_list(&self, values: &[String]) -> String;
    fn script(&self, source: &str) -> String;
    fn files(&self, files: &[String]) -> String;
    fn click_options(&self, button: MouseButton) -> String;
    fn statement(&self, expression: &str) -> String;
    fn comment(&self, text: &str) -> String;

    fn indent_unit(&self) -> &'static str;
    /// Indent levels of top-level statements inside the test body
    fn body_depth(&self) -> usize;
    /// Imports through the opening of the test body
    fn header(&self, test_name: &str) -> String;
    /// Assertion placeholder through the end of file
    fn footer(&self) -> String;
    fn step_open(&self, title: &str) -> String;
    fn step_close(&self) -> Option<&'static str>;
    /// Statement required when a body would otherwise hold only comments
    fn empty_body(&self) -> Option<&'static str> {
        None
    }
}

pub fn syntax_for(language: Language) -> &'static dyn Syntax {
    match language {
        Language::JavaScript => &JavaScript,
        Language::TypeScript => &TypeScript,
        Language::Python => &Python,
        Language::Java => &Java,
    }
}

/// Renders a plan as a complete test file.
pub fn render(plan: &TestPlan, syntax: &dyn Syntax, test_name: &str, placeholder_url: &str) -> String {
    let mut out = syntax.header(test_name);
    let depth = syntax.body_depth();
    let mut statements = 0usize;

    if plan.opening.is_empty() {
        let placeholder = Operation::Goto {
            url: placeholder_url.to_string(),
        };
        line(&mut out, syntax, depth, &syntax.comment("No start URL was recorded; replace the placeholder below"));
        line(&mut out, syntax, depth, &syntax.comment(&statement(syntax, &placeholder)));
    } else {
        for operation in &plan.opening {
            line(&mut out, syntax, depth, &statement(syntax, operation));
            statements += 1;
        }
    }

    for entry in &plan.entries {
        out.push('\n');
        match entry {
            PlanEntry::Step(step) => {
                line(&mut out, syntax, depth, &syntax.step_open(&step.title));
                for operation in &step.operations {
                    line(&mut out, syntax, depth + 1, &statement(syntax, operation));
                }
                let only_notes = step
                    .operations
                    .iter()
                    .all(|op| matches!(op, Operation::Note { .. }));
                if only_notes {
                    if let Some(filler) = syntax.empty_body() {
                        line(&mut out, syntax, depth + 1, filler);
                    }
                }
                if let Some(close) = syntax.step_close() {
                    line(&mut out, syntax, depth, close);
                }
                statements += 1;
            }
            PlanEntry::Skipped { reason } => {
                line(&mut out, syntax, depth, &syntax.comment(&format!("Skipped: {}", reason)));
            }
        }
    }

    if statements == 0 {
        if let Some(filler) = syntax.empty_body() {
            line(&mut out, syntax, depth, filler);
        }
    }

    out.push('\n');
    out.push_str(&syntax.footer());
    out
}

fn line(out: &mut String, syntax: &dyn Syntax, depth: usize, text: &str) {
    for _ in 0..depth {
        out.push_str(syntax.indent_unit());
    }
    out.push_str(text);
    out.push('\n');
}

/// One operation as a full statement (a comment line for notes).
fn statement(syntax: &dyn Syntax, operation: &Operation) -> String {
    match lower(operation) {
        Some(call) => syntax.statement(&expression(syntax, &call)),
        None => match operation {
            Operation::Note { text } => syntax.comment(text),
            _ => String::new(),
        },
    }
}

/// The abstract call for an operation.
fn lower(operation: &Operation) -> Option<Call> {
    let on = |target: &Target, method: Method, args: Vec<Arg>| Call {
        receiver: Receiver::Element(target.clone()),
        method,
        args,
    };
    let page = |object: PageObject, method: Method, args: Vec<Arg>| Call {
        receiver: Receiver::Page(object),
        method,
        args,
    };

    Some(match operation {
        Operation::Goto { url } => page(PageObject::Page, Method::Goto, vec![Arg::Str(url.clone())]),
        Operation::Click { target, button } => match button {
            MouseButton::Left => on(target, Method::Click, vec![]),
            MouseButton::Right => on(target, Method::Click, vec![Arg::Button(*button)]),
        },
        Operation::DoubleClick { target } => on(target, Method::DblClick, vec![]),
        Operation::Fill { target, value } => on(target, Method::Fill, vec![Arg::Str(value.clone())]),
        Operation::Check { target } => on(target, Method::Check, vec![]),
        Operation::Uncheck { target } => on(target, Method::Uncheck, vec![]),
        Operation::SelectOption {
            target,
            values,
            multiple,
        } => {
            let arg = if *multiple {
                Arg::StrList(values.clone())
            } else {
                Arg::Str(values.first().cloned().unwrap_or_default())
            };
            on(target, Method::SelectOption, vec![arg])
        }
        Operation::SetInputFiles { target, files } => {
            on(target, Method::SetInputFiles, vec![Arg::Files(files.clone())])
        }
        Operation::Hover { target } => on(target, Method::Hover, vec![]),
        Operation::Focus { target } => on(target, Method::Focus, vec![]),
        Operation::Blur { target } => on(target, Method::Blur, vec![]),
        Operation::WaitFor { target } => on(target, Method::WaitFor, vec![]),
        Operation::Press { target, key } => match target {
            Some(target) => on(target, Method::Press, vec![Arg::Str(key.clone())]),
            None => page(PageObject::Keyboard, Method::Press, vec![Arg::Str(key.clone())]),
        },
        Operation::ScrollElement { target, x, y } => on(
            target,
            Method::Evaluate,
            vec![Arg::Script(format!("(el) => el.scrollTo({}, {})", x, y))],
        ),
        Operation::ScrollWindow { frames, x, y } => {
            let script = Arg::Script(format!("() => window.scrollTo({}, {})", x, y));
            if frames.is_empty() {
                page(PageObject::Page, Method::Evaluate, vec![script])
            } else {
                on(&Target::document_of(frames), Method::Evaluate, vec![script])
            }
        }
        Operation::MouseDown => page(PageObject::Mouse, Method::Down, vec![]),
        Operation::MouseUp => page(PageObject::Mouse, Method::Up, vec![]),
        Operation::RequestSubmit { target } => on(
            target,
            Method::Evaluate,
            vec![Arg::Script("(form) => form.requestSubmit()".to_string())],
        ),
        Operation::SettleWait { ms } => page(
            PageObject::Page,
            Method::WaitForTimeout,
            vec![Arg::Int(*ms as i64)],
        ),
        Operation::Note { .. } => return None,
    })
}

fn expression(syntax: &dyn Syntax, call: &Call) -> String {
    let receiver = match &call.receiver {
        Receiver::Page(object) => syntax.page_object(*object).to_string(),
        Receiver::Element(target) => locator_chain(syntax, target),
    };
    let args: Vec<String> = call
        .args
        .iter()
        .map(|arg| match arg {
            Arg::Str(text) => syntax.quote(text),
            Arg::StrList(values) => syntax.string_list(values),
            Arg::Int(n) => n.to_string(),
            Arg::Script(source) => syntax.script(source),
            Arg::Files(files) => syntax.files(files),
            Arg::Button(button) => syntax.click_options(*button),
        })
        .collect();
    format!(
        "{}.{}({})",
        receiver,
        syntax.method_name(call.method),
        args.join(", ")
    )
}

/// `page`, then one accessor per frame hop, then the element accessor.
fn locator_chain(syntax: &dyn Syntax, target: &Target) -> String {
    let mut chain = syntax.page_object(PageObject::Page).to_string();
    let mut scope = Scope::Page;

    for hop in &target.frames {
        let accessor = match hop.kind {
            FrameKind::Iframe => {
                scope = Scope::FrameLocator;
                Accessor::FrameLocator
            }
            FrameKind::ShadowHost => {
                scope = Scope::Locator;
                Accessor::Locator
            }
        };
        chain.push_str(&accessor_call(syntax, accessor, &hop.selector.to_css()));
    }

    chain.push_str(&selector_accessor(syntax, &target.selector, scope));
    chain
}

fn accessor_call(syntax: &dyn Syntax, accessor: Accessor, argument: &str) -> String {
    format!(".{}({})", syntax.accessor_name(accessor), syntax.quote(argument))
}

fn selector_accessor(syntax: &dyn Syntax, selector: &Selector, scope: Scope) -> String {
    match selector.kind {
        SelectorKind::TestId if selector.is_default_test_id() => {
            accessor_call(syntax, Accessor::TestId, &selector.value)
        }
        SelectorKind::Role if ARIA_ROLES.contains(&selector.value.as_str()) => {
            syntax.role_accessor(&selector.value, selector.aux_name.as_deref(), scope)
        }
        SelectorKind::Label => accessor_call(syntax, Accessor::Label, &selector.value),
        SelectorKind::Placeholder => accessor_call(syntax, Accessor::Placeholder, &selector.value),
        SelectorKind::AltText => accessor_call(syntax, Accessor::AltText, &selector.value),
        SelectorKind::Title => accessor_call(syntax, Accessor::Title, &selector.value),
        _ => accessor_call(syntax, Accessor::Locator, &selector.to_css()),
    }
}

/// Splits a file name into lowercase identifier words. Separators and
/// camel-case boundaries both break words.
pub(crate) fn identifier_words(name: &str) -> Vec<String> {
    static WORD: OnceLock<Regex> = OnceLock::new();
    let word = WORD.get_or_init(|| {
        Regex::new(r"[A-Z]*[a-z0-9]+|[A-Z]+").expect("word pattern is valid")
    });
    word.find_iter(name)
        .map(|m| m.as_str().to_ascii_lowercase())
        .collect()
}

pub(crate) fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_ascii_uppercase().to_string() + chars.as_str(),
        None => String::new(),
    }
}

/// Comment text folded onto one line. Line terminators (including the ones
/// only JavaScript treats as such) would end the comment early.
pub(crate) fn comment_text(text: &str) -> String {
    text.chars()
        .map(|c| match c {
            '\n' | '\r' | '\u{2028}' | '\u{2029}' => ' ',
            _ => c,
        })
        .collect()
}

/// Escapes for a double-quoted string literal (Python, Java).
pub(crate) fn double_quote(text: &str) -> String {
    let mut quoted = String::with_capacity(text.len() + 2);
    quoted.push('"');
    for c in text.chars() {
        match c {
            '\\' => quoted.push_str("\\\\"),
            '"' => quoted.push_str("\\\""),
            '\n' => quoted.push_str("\\n"),
            '\r' => quoted.push_str("\\r"),
            '\t' => quoted.push_str("\\t"),
            _ => quoted.push(c),
        }
    }
    quoted.push('"');
    quoted
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::FrameStep;

    fn target(selector: Selector, frames: Vec<FrameStep>) -> Target {
        Target { frames, selector }
    }

    #[test]
    fn test_identifier_words() {
        assert_eq!(identifier_words("login-flow"), vec!["login", "flow"]);
        assert_eq!(identifier_words("checkoutPage v2"), vec!["checkout", "page", "v2"]);
        assert!(identifier_words("--").is_empty());
    }

    #[test]
    fn test_unknown_role_renders_as_attribute_locator() {
        let chain = locator_chain(
            &JavaScript,
            &target(Selector::role("fancy-widget", Some("Go".into())), vec![]),
        );
        assert_eq!(
            chain,
            "page.locator('[role=\"fancy-widget\"][aria-label=\"Go\"]')"
        );
    }

    #[test]
    fn test_frame_hops_wrap_the_element_locator() {
        let frames = vec![
            FrameStep {
                kind: FrameKind::Iframe,
                selector: Selector::unique_id("outer"),
            },
            FrameStep {
                kind: FrameKind::ShadowHost,
                selector: Selector::css_path(".card"),
            },
        ];
        let chain = locator_chain(&Python, &target(Selector::label("Email"), frames));
        assert_eq!(
            chain,
            "page.frame_locator(\"#outer\").locator(\".card\").get_by_label(\"Email\")"
        );
    }

    #[test]
    fn test_non_default_test_id_uses_attribute_locator() {
        let chain = locator_chain(&Java, &target(Selector::test_id("buy", "data-qa"), vec![]));
        assert_eq!(chain, "page.locator(\"[data-qa=\\\"buy\\\"]\")");
    }
}
