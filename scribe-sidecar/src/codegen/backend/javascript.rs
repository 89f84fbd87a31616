use super::{comment_text, Accessor, Method, PageObject, Scope, Syntax};
use crate::codegen::ops::MouseButton;

/// `@playwright/test` in CommonJS JavaScript.
pub struct JavaScript;

/// `@playwright/test` in TypeScript. Only the import line differs.
pub struct TypeScript;

fn single_quote(text: &str) -> String {
    let mut quoted = String::with_capacity(text.len() + 2);
    quoted.push('\'');
    for c in text.chars() {
        match c {
            '\\' => quoted.push_str("\\\\"),
            '\'' => quoted.push_str("\\'"),
            '\n' => quoted.push_str("\\n"),
            '\r' => quoted.push_str("\\r"),
            '\t' => quoted.push_str("\\t"),
            _ => quoted.push(c),
        }
    }
    quoted.push('\'');
    quoted
}

fn test_open(test_name: &str) -> String {
    format!("test({}, async ({{ page }}) => {{\n", single_quote(test_name))
}

macro_rules! ecmascript_syntax {
    ($name:ident, $import:expr) => {
        impl Syntax for $name {
            fn quote(&self, text: &str) -> String {
                single_quote(text)
            }

            fn method_name(&self, method: Method) -> &'static str {
                match method {
                    Method::Goto => "goto",
                    Method::Click => "click",
                    Method::DblClick => "dblclick",
                    Method::Fill => "fill",
                    Method::Check => "check",
                    Method::Uncheck => "uncheck",
                    Method::SelectOption => "selectOption",
                    Method::SetInputFiles => "setInputFiles",
                    Method::Hover => "hover",
                    Method::Focus => "focus",
                    Method::Blur => "blur",
                    Method::WaitFor => "waitFor",
                    Method::Press => "press",
                    Method::Evaluate => "evaluate",
                    Method::Down => "down",
                    Method::Up => "up",
                    Method::WaitForTimeout => "waitForTimeout",
                }
            }

            fn accessor_name(&self, accessor: Accessor) -> &'static str {
                match accessor {
                    Accessor::FrameLocator => "frameLocator",
                    Accessor::Locator => "locator",
                    Accessor::TestId => "getByTestId",
                    Accessor::Label => "getByLabel",
                    Accessor::Placeholder => "getByPlaceholder",
                    Accessor::AltText => "getByAltText",
                    Accessor::Title => "getByTitle",
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
                        ".getByRole({}, {{ name: {} }})",
                        single_quote(role),
                        single_quote(name)
                    ),
                    None => format!(".getByRole({})", single_quote(role)),
                }
            }

            fn string_list(&self, values: &[String]) -> String {
                let items: Vec<String> = values.iter().map(|v| single_quote(v)).collect();
                format!("[{}]", items.join(", "))
            }

            fn script(&self, source: &str) -> String {
                source.to_string()
            }

            fn files(&self, files: &[String]) -> String {
                match files {
                    [single] => single_quote(single),
                    _ => self.string_list(files),
                }
            }

            fn click_options(&self, button: MouseButton) -> String {
                match button {
                    MouseButton::Left => "{ button: 'left' }".to_string(),
                    MouseButton::Right => "{ button: 'right' }".to_string(),
                }
            }

            fn statement(&self, expression: &str) -> String {
                format!("await {};", expression)
            }

            fn comment(&self, text: &str) -> String {
                format!("// {}", comment_text(text))
            }

            fn indent_unit(&self) -> &'static str {
                "  "
            }

            fn body_depth(&self) -> usize {
                1
            }

            fn header(&self, test_name: &str) -> String {
                format!("{}\n\n{}", $import, test_open(test_name))
            }

            fn footer(&self) -> String {
                "  // Add assertions for the expected outcome here\n});\n".to_string()
            }

            fn step_open(&self, title: &str) -> String {
                format!("await test.step({}, async () => {{", single_quote(title))
            }

            fn step_close(&self) -> Option<&'static str> {
                Some("});")
            }
        }
    };
}

ecmascript_syntax!(
    JavaScript,
    "const { test, expect } = require('@playwright/test');"
);
ecmascript_syntax!(TypeScript, "import { test, expect } from '@playwright/test';");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quote_escapes() {
        assert_eq!(JavaScript.quote("it's"), "'it\\'s'");
        assert_eq!(JavaScript.quote("a\\b\nc"), "'a\\\\b\\nc'");
    }

    #[test]
    fn test_comment_stays_on_one_line() {
        let comment = TypeScript.comment("Skipped: 'x\nawait page.close();'\u{2028}done");
        assert_eq!(comment, "// Skipped: 'x await page.close();' done");
        assert_eq!(comment.lines().count(), 1);
    }

    #[test]
    fn test_headers_differ_only_in_import() {
        let js = JavaScript.header("login");
        let ts = TypeScript.header("login");
        assert!(js.starts_with("const { test, expect } = require('@playwright/test');"));
        assert!(ts.starts_with("import { test, expect } from '@playwright/test';"));
        assert!(js.ends_with("test('login', async ({ page }) => {\n"));
        assert_eq!(js.lines().last(), ts.lines().last());
    }

    #[test]
    fn test_role_accessor() {
        assert_eq!(
            JavaScript.role_accessor("button", Some("Save"), Scope::Page),
            ".getByRole('button', { name: 'Save' })"
        );
        assert_eq!(
            TypeScript.role_accessor("link", None, Scope::Locator),
            ".getByRole('link')"
        );
    }
}
