use crate::models::Modifiers;

/// Human wording for a recorded key, used in step titles.
pub fn key_description(key: &str, modifiers: &Modifiers) -> String {
    let lower = key.to_ascii_lowercase();

    if modifiers.ctrl || modifiers.meta {
        let shortcut = match lower.as_str() {
            "c" => Some("Copy"),
            "v" => Some("Paste"),
            "x" => Some("Cut"),
            "a" => Some("Select All"),
            _ => None,
        };
        if let Some(shortcut) = shortcut {
            return shortcut.to_string();
        }
    }

    let name = match lower.as_str() {
        "enter" => "Enter".to_string(),
        "escape" => "Escape".to_string(),
        "tab" => "Tab".to_string(),
        "arrowup" => "Up Arrow".to_string(),
        "arrowdown" => "Down Arrow".to_string(),
        "arrowleft" => "Left Arrow".to_string(),
        "arrowright" => "Right Arrow".to_string(),
        _ => key.to_string(),
    };

    let mut prefix = String::new();
    if modifiers.alt {
        prefix.push_str("Alt+");
    }
    if modifiers.shift {
        prefix.push_str("Shift+");
    }
    if modifiers.ctrl || modifiers.meta {
        prefix.push_str("Ctrl+");
    }
    format!("Press {}{}", prefix, name)
}

/// Playwright key chord, e.g. `Control+c`, `Shift+Tab`.
pub fn key_chord(key: &str, modifiers: &Modifiers) -> String {
    let mut parts: Vec<&str> = Vec::new();
    if modifiers.ctrl {
        parts.push("Control");
    }
    if modifiers.meta {
        parts.push("Meta");
    }
    if modifiers.alt {
        parts.push("Alt");
    }
    if modifiers.shift {
        parts.push("Shift");
    }
    parts.push(key);
    parts.join("+")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shortcut_descriptions() {
        let ctrl = Modifiers {
            ctrl: true,
            ..Default::default()
        };
        let meta = Modifiers {
            meta: true,
            ..Default::default()
        };
        assert_eq!(key_description("c", &ctrl), "Copy");
        assert_eq!(key_description("V", &meta), "Paste");
        assert_eq!(key_description("a", &ctrl), "Select All");
        assert_eq!(key_description("ArrowUp", &Modifiers::default()), "Press Up Arrow");
    }

    #[test]
    fn test_modifier_prefixes() {
        let shift = Modifiers {
            shift: true,
            ..Default::default()
        };
        assert_eq!(key_description("Tab", &shift), "Press Shift+Tab");
        assert_eq!(key_chord("Tab", &shift), "Shift+Tab");

        let both = Modifiers {
            ctrl: true,
            alt: true,
            ..Default::default()
        };
        assert_eq!(key_description("Enter", &both), "Press Alt+Ctrl+Enter");
        assert_eq!(key_chord("Enter", &both), "Control+Alt+Enter");
    }
}
