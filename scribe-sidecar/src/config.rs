use std::env;
use std::str::FromStr;

/// Server settings plus the tunables of the capture and generation pipelines.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub host: String,
    pub recorder: RecorderConfig,
    pub generator: GeneratorConfig,
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            port: env_or("SCRIBE_PORT", 8765),
            host: env::var("SCRIBE_HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
            recorder: RecorderConfig::from_env(),
            generator: GeneratorConfig::default(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: 8765,
            host: "127.0.0.1".to_string(),
            recorder: RecorderConfig::default(),
            generator: GeneratorConfig::default(),
        }
    }
}

/// Capture-side constants.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecorderConfig {
    pub type_debounce_ms: u64,
    pub hover_debounce_ms: u64,
    pub scroll_debounce_ms: u64,
    /// Identical type+selector within this window is dropped
    pub duplicate_window_ms: u64,
    /// Scrolls must move more than this many pixels from the last recorded position
    pub scroll_threshold_px: i64,
    pub value_limit_chars: usize,
    pub redaction_marker: String,
}

impl Default for RecorderConfig {
    fn default() -> Self {
        Self {
            type_debounce_ms: 2000,
            hover_debounce_ms: 300,
            scroll_debounce_ms: 100,
            duplicate_window_ms: 500,
            scroll_threshold_px: 100,
            value_limit_chars: 100,
            redaction_marker: "***".to_string(),
        }
    }
}

impl RecorderConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            type_debounce_ms: env_or("SCRIBE_TYPE_DEBOUNCE_MS", defaults.type_debounce_ms),
            hover_debounce_ms: env_or("SCRIBE_HOVER_DEBOUNCE_MS", defaults.hover_debounce_ms),
            scroll_debounce_ms: env_or("SCRIBE_SCROLL_DEBOUNCE_MS", defaults.scroll_debounce_ms),
            duplicate_window_ms: env_or(
                "SCRIBE_DUPLICATE_WINDOW_MS",
                defaults.duplicate_window_ms,
            ),
            ..defaults
        }
    }
}

/// Generation-side constants.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratorConfig {
    pub duplicate_window_ms: u64,
    pub scroll_threshold_px: i64,
    /// Fixed delay inserted after page opens and navigation-triggering actions
    pub settle_wait_ms: u64,
    pub placeholder_url: String,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            duplicate_window_ms: 1000,
            scroll_threshold_px: 100,
            settle_wait_ms: 1000,
            placeholder_url: "https://example.com".to_string(),
        }
    }
}

fn env_or<T: FromStr>(key: &str, default: T) -> T {
    match env::var(key) {
        Ok(raw) => match raw.trim().parse() {
            Ok(value) => value,
            Err(_) => {
                tracing::warn!("Ignoring invalid {}={:?}", key, raw);
                default
            }
        },
        Err(_) => default,
    }
}
