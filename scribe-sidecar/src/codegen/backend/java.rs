use super::{capitalize, comment_text, double_quote, identifier_words, Accessor, Method, PageObject, Scope, Syntax};
use crate::codegen::ops::MouseButton;

/// Playwright for Java under JUnit 5.
pub struct Java;

/// PascalCase class name ending in `Test`.
pub fn class_name(test_name: &str) -> String {
    let pascal: String = identifier_words(test_name)
        .iter()
        .map(|w| capitalize(w))
        .collect();
    match pascal.chars().next() {
        None => "RecordedTest".to_string(),
        Some(c) if c.is_ascii_digit() => format!("Recorded{}Test", pascal),
        Some(_) => format!("{}Test", pascal),
    }
}

/// camelCase test method name.
pub fn test_method_name(test_name: &str) -> String {
    let words = identifier_words(test_name);
    let Some((first, rest)) = words.split_first() else {
        return "recorded".to_string();
    };
    let camel: String = std::iter::once(first.clone())
        .chain(rest.iter().map(|w| capitalize(w)))
        .collect();
    if camel.starts_with(|c: char| c.is_ascii_digit()) {
        format!("test{}", camel)
    } else {
        camel
    }
}

impl Syntax for Java {
    fn quote(&self, text: &str) -> String {
        double_quote(text)
    }

    fn method_name(&self, method: Method) -> &'static str {
        match method {
            Method::Goto => "navigate",
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
            PageObject::Keyboard => "page.keyboard()",
            PageObject::Mouse => "page.mouse()",
        }
    }

    fn role_accessor(&self, role: &str, name: Option<&str>, scope: Scope) -> String {
        let role = format!("AriaRole.{}", role.to_ascii_uppercase());
        let Some(name) = name else {
            return format!(".getByRole({})", role);
        };
        let options = match scope {
            Scope::Page => "Page",
            Scope::FrameLocator => "FrameLocator",
            Scope::Locator => "Locator",
        };
        format!(
            ".getByRole({}, new {}.GetByRoleOptions().setName({}))",
            role,
            options,
            double_quote(name)
        )
    }

    fn string_list(&self, values: &[String]) -> String {
        let items: Vec<String> = values.iter().map(|v| double_quote(v)).collect();
        format!("new String[] {{{}}}", items.join(", "))
    }

    fn script(&self, source: &str) -> String {
        double_quote(source)
    }

    fn files(&self, files: &[String]) -> String {
        let paths: Vec<String> = files
            .iter()
            .map(|f| format!("Paths.get({})", double_quote(f)))
            .collect();
        match paths.as_slice() {
            [single] => single.clone(),
            _ => format!("new Path[] {{{}}}", paths.join(", ")),
        }
    }

    fn click_options(&self, button: MouseButton) -> String {
        let button = match button {
            MouseButton::Left => "LEFT",
            MouseButton::Right => "RIGHT",
        };
        format!("new Locator.ClickOptions().setButton(MouseButton.{})", button)
    }

    fn statement(&self, expression: &str) -> String {
        format!("{};", expression)
    }

    fn comment(&self, text: &str) -> String {
        // javac decodes \u escapes before it sees comments
        format!("// {}", comment_text(text).replace("\\u", "\\ u"))
    }

    fn indent_unit(&self) -> &'static str {
        "    "
    }

    fn body_depth(&self) -> usize {
        3
    }

    fn header(&self, test_name: &str) -> String {
        format!(
            r#"import com.microsoft.playwright.*;
import com.microsoft.playwright.options.*;
import org.junit.jupiter.api.Test;

import java.nio.file.Path;
import java.nio.file.Paths;

public class {class} {{
    private static void step(String title, Runnable body) {{
        System.out.println("Step: " + title);
        body.run();
    }}

    @Test
    void {method}() {{
        try (Playwright playwright = Playwright.create()) {{
            Browser browser = playwright.chromium().launch();
            Page page = browser.newPage();
"#,
            class = class_name(test_name),
            method = test_method_name(test_name),
        )
    }

    fn footer(&self) -> String {
        [
            "            // Add assertions for the expected outcome here",
            "            browser.close();",
            "        }",
            "    }",
            "}",
            "",
        ]
        .join("\n")
    }

    fn step_open(&self, title: &str) -> String {
        format!("step({}, () -> {{", double_quote(title))
    }

    fn step_close(&self) -> Option<&'static str> {
        Some("});")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identifiers() {
        assert_eq!(class_name("login-flow"), "LoginFlowTest");
        assert_eq!(test_method_name("login-flow"), "loginFlow");
        assert_eq!(class_name("2fa setup"), "Recorded2faSetupTest");
        assert_eq!(test_method_name("2fa setup"), "test2faSetup");
        assert_eq!(class_name(""), "RecordedTest");
    }

    #[test]
    fn test_comment_stays_on_one_line() {
        assert_eq!(
            Java.comment("Skipped: 'x\npage.close();'"),
            "// Skipped: 'x page.close();'"
        );
        assert_eq!(
            Java.comment("Skipped: 'a\\u000a page.close();'"),
            "// Skipped: 'a\\ u000a page.close();'"
        );
    }

    #[test]
    fn test_role_options_follow_scope() {
        assert_eq!(
            Java.role_accessor("button", Some("Pay"), Scope::FrameLocator),
            ".getByRole(AriaRole.BUTTON, new FrameLocator.GetByRoleOptions().setName(\"Pay\"))"
        );
        assert_eq!(Java.role_accessor("link", None, Scope::Page), ".getByRole(AriaRole.LINK)");
    }

    #[test]
    fn test_files_and_lists() {
        assert_eq!(Java.files(&["a.pdf".into()]), "Paths.get(\"a.pdf\")");
        assert_eq!(
            Java.files(&["a.pdf".into(), "b.png".into()]),
            "new Path[] {Paths.get(\"a.pdf\"), Paths.get(\"b.png\")}"
        );
        assert_eq!(
            Java.string_list(&["x".into(), "y".into()]),
            "new String[] {\"x\", \"y\"}"
        );
    }
}
