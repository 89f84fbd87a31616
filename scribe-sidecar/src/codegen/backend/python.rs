use super::{comment_text, double_quote, identifier_words, Accessor, Method, PageObject, Scope, Syntax};
use crate::codegen::ops::MouseButton;

/// pytest-playwright, sync API.
pub struct Python;

const HEADER: &str = r#"from contextlib import contextmanager

from playwright.sync_api import Page, expect


@contextmanager
def step(title: str):
    print(f"Step: {title}")
    yield

"#;

/// `test_` followed by the snake_case words of the test name.
pub fn function_name(test_name: &str) -> String {
    let words = identifier_words(test_name);
    if words.is_empty() {
        return "test_recorded".to_string();
    }
    format!("test_{}", words.join("_"))
}

impl Syntax for Python {
    fn quote(&self, text: &str) -> String {
        double_quote(text)
    }

    fn method_name(&self, method: Method) -> &'static str {
        match method {
            Method::Goto => "goto",
            Method::Click => "click",
            Method::DblClick => "dblclick",
            Method::Fill => "fill",
            Method::Check => "check",
            Method::Uncheck => "uncheck",
            Method::SelectOption => "select_option",
            Method::SetInputFiles => "set_input_files",
            Method::Hover => "hover",
            Method::Focus => "focus",
            Method::Blur => "blur",
            Method::WaitFor => "wait_for",
            Method::Press => "press",
            Method::Evaluate => "evaluate",
            Method::Down => "down",
            Method::Up => "up",
            Method::WaitForTimeout => "wait_for_timeout",
        }
    }

    fn accessor_name(&self, accessor: Accessor) -> &'static str {
        match accessor {
            Accessor::FrameLocator => "frame_locator",
            Accessor::Locator => "locator",
            Accessor::TestId => "get_by_test_id",
            Accessor::Label => "get_by_label",
            Accessor::Placeholder => "get_by_placeholder",
            Accessor::AltText => "get_by_alt_text",
            Accessor::Title => "get_by_title",
        }
    }

    fn page_object(&self, object: PageObject) -> &'static str {
        match object {
            PageObject::Page => "page",
            PageObject::Keyboard => "page.keyboard",
            PageObject::Mouse => "page.mouse",
        }
    }

    fn role_accessor(&self, role: &str, name: Option<&str>, _scope: Scope) -> String {
        match name {
            Some(name) => format!(
                ".get_by_role({}, name={})",
                double_quote(role),
                double_quote(name)
            ),
            None => format!(".get_by_role({})", double_quote(role)),
        }
    }

    fn string_list(&self, values: &[String]) -> String {
        let items: Vec<String> = values.iter().map(|v| double_quote(v)).collect();
        format!("[{}]", items.join(", "))
    }

    fn script(&self, source: &str) -> String {
        double_quote(source)
    }

    fn files(&self, files: &[String]) -> String {
        match files {
            [single] => double_quote(single),
            _ => self.string_list(files),
        }
    }

    fn click_options(&self, button: MouseButton) -> String {
        match button {
            MouseButton::Left => "button=\"left\"".to_string(),
            MouseButton::Right => "button=\"right\"".to_string(),
        }
    }

    fn statement(&self, expression: &str) -> String {
        expression.to_string()
    }

    fn comment(&self, text: &str) -> String {
        format!("# {}", comment_text(text))
    }

    fn indent_unit(&self) -> &'static str {
        "    "
    }

    fn body_depth(&self) -> usize {
        1
    }

    fn header(&self, test_name: &str) -> String {
        format!(
            "{}\ndef {}(page: Page) -> None:\n",
            HEADER,
            function_name(test_name)
        )
    }

    fn footer(&self) -> String {
        "    # Add assertions for the expected outcome here\n".to_string()
    }

    fn step_open(&self, title: &str) -> String {
        format!("with step({}):", double_quote(title))
    }

    fn step_close(&self) -> Option<&'static str> {
        None
    }

    fn empty_body(&self) -> Option<&'static str> {
        Some("pass")
    }
}
