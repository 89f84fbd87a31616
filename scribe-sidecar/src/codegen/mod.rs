//! Playwright test generation from a recorded action log.
//!
//! `plan` turns the log into language-neutral steps, `backend` spells those
//! steps out per language. Generation is total: anything it cannot render
//! becomes a comment in the output.

pub mod backend;
pub mod cleanup;
pub mod keys;
pub mod ops;
pub mod plan;

use serde::Serialize;

use crate::config::GeneratorConfig;
use crate::models::{Action, Language};
use plan::TestPlan;

/// A rendered test file ready to hand back to the extension.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedFile {
    pub code: String,
    pub file_name: String,
    pub content_type: String,
}

#[derive(Debug, Clone, Default)]
pub struct CodeGenerator {
    config: GeneratorConfig,
}

impl CodeGenerator {
    pub fn new(config: GeneratorConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    pub fn generate(&self, actions: &[Action], language: Language, test_name: &str) -> String {
        self.generate_with_start_url(actions, language, test_name, None)
    }

    /// Like `generate`, with a fallback start URL for logs that never
    /// recorded a navigation.
    pub fn generate_with_start_url(
        &self,
        actions: &[Action],
        language: Language,
        test_name: &str,
        start_url: Option<&str>,
    ) -> String {
        let plan = TestPlan::build(actions, start_url, &self.config);
        let code = backend::render(
            &plan,
            backend::syntax_for(language),
            test_name,
            &self.config.placeholder_url,
        );

        tracing::info!(
            "Generated {} test '{}': {} actions -> {} steps",
            language,
            test_name,
            actions.len(),
            plan.steps().count()
        );
        code
    }

    pub fn generate_file(
        &self,
        actions: &[Action],
        file_name: &str,
        language: Language,
        start_url: Option<&str>,
    ) -> GeneratedFile {
        let test_name = match file_name.trim() {
            "" => "recorded-test",
            name => name,
        };
        let code = self.generate_with_start_url(actions, language, test_name, start_url);
        let file_name = language.suggested_file_name(test_name);

        GeneratedFile {
            code,
            content_type: content_type(language, &file_name),
            file_name,
        }
    }
}

/// Generates with default settings.
pub fn generate(actions: &[Action], language: Language, test_name: &str) -> String {
    CodeGenerator::default().generate(actions, language, test_name)
}

fn content_type(language: Language, file_name: &str) -> String {
    match language {
        // `.ts` is registered as an MPEG transport stream
        Language::TypeScript => "application/typescript".to_string(),
        _ => mime_guess::from_path(file_name)
            .first_or_text_plain()
            .to_string(),
    }
}
