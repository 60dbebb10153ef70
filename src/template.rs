use std::collections::HashMap;

pub struct TemplateEngine;

impl TemplateEngine {
    // Templates embedded at compile time
    const CODE_SYSTEM_PROMPT: &'static str = include_str!("../templates/code_system_prompt.txt");

    #[must_use]
    pub fn render(
        template: &str,
        variables: &HashMap<&str, &str>,
    ) -> String {
        let mut result = template.to_string();

        for (key, value) in variables {
            let placeholder = format!("{{{{{key}}}}}");
            result = result.replace(&placeholder, value);
        }

        result
    }

    /// Render the strict code-only system prompt for the given language tag.
    #[must_use]
    pub fn render_code_system_prompt(language: &str) -> String {
        let upper = language.to_uppercase();
        let mut variables = HashMap::new();
        variables.insert("LANGUAGE", language);
        variables.insert("LANGUAGE_UPPER", upper.as_str());

        Self::render(Self::CODE_SYSTEM_PROMPT, &variables)
    }
}
