//! Pulls a code block out of free-form model output.
//!
//! Generation prompts forbid markdown, but models routinely wrap code in
//! fences anyway. The extractor tries a fence tagged with the requested
//! language first, then any generic fence, and otherwise assumes the model
//! obeyed and returns the trimmed text unchanged.

use regex::Regex;
use std::sync::OnceLock;

static GENERIC_FENCE: OnceLock<Regex> = OnceLock::new();

fn generic_fence() -> &'static Regex {
    GENERIC_FENCE.get_or_init(|| Regex::new(r"(?s)```\s*\n(.*?)```").unwrap())
}

/// Extracts the best-guess pure-code substring from `text`.
///
/// Search order: fence tagged with `language` (case-insensitive), then any
/// untagged fence, then the trimmed input itself. Only the first match of
/// each tier is used. Total function, never fails.
#[must_use]
pub fn extract_code_block(
    text: &str,
    language: &str,
) -> String {
    let tagged_pattern = format!(r"(?si)```{}\s*\n(.*?)```", regex::escape(language.trim()));
    if let Ok(tagged) = Regex::new(&tagged_pattern)
        && let Some(caps) = tagged.captures(text)
    {
        return caps[1].trim().to_string();
    }

    if let Some(caps) = generic_fence().captures(text) {
        return caps[1].trim().to_string();
    }

    text.trim().to_string()
}
