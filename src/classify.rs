//! Heuristic code-likeness check.
//!
//! Deliberately permissive: a single structural signature anywhere in the
//! text classifies it as code. The check exists to catch egregious
//! prose-only responses, not to validate syntax, so false positives are
//! preferred over false negatives.

use regex::Regex;
use std::sync::OnceLock;

static PATTERNS: OnceLock<Vec<Regex>> = OnceLock::new();

fn code_patterns() -> &'static [Regex] {
    PATTERNS.get_or_init(|| {
        [
            r"\bdef\s+\w+\s*\(",       // Python function
            r"\bfn\s+\w+\s*\(",        // Rust function
            r"\bfunction\s+\w+\s*\(",  // JS function
            r"\bclass\s+\w+",          // class definition
            r"\bimport\s+\w+",         // import statement
            r"\bfrom\s+\w+\s+import",  // from-import
            r"\b(?:if|for|while)\s+.*[:{(]", // control flow
            r"\breturn\s+",            // return statement
            r"[{}\[\]]",               // braces/brackets
            r"(?m);\s*$",              // statement terminator at line end
        ]
        .iter()
        .map(|p| Regex::new(p).unwrap())
        .collect()
    })
}

/// Minimum non-whitespace length before text can count as code at all.
const MIN_CODE_CHARS: usize = 10;

/// Returns true if `text` plausibly contains code.
#[must_use]
pub fn is_code_like(text: &str) -> bool {
    let significant = text.chars().filter(|c| !c.is_whitespace()).count();
    if significant < MIN_CODE_CHARS {
        return false;
    }

    code_patterns().iter().any(|p| p.is_match(text))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_text_never_code() {
        assert!(!is_code_like(""));
        assert!(!is_code_like("x = 1"));
        assert!(!is_code_like("   a b c   "));
    }

    #[test]
    fn test_python_function_is_code() {
        assert!(is_code_like("def foo(bar):\n    return bar"));
    }

    #[test]
    fn test_rust_function_is_code() {
        assert!(is_code_like("fn main() {\n    println!(\"hi\");\n}"));
    }

    #[test]
    fn test_braces_are_code() {
        assert!(is_code_like("some text with a { brace inside }"));
    }

    #[test]
    fn test_trailing_semicolon_is_code() {
        assert!(is_code_like("int x = compute_value();"));
    }

    #[test]
    fn test_plain_prose_is_not_code() {
        assert!(!is_code_like(
            "I'm sorry, I cannot help with that particular request today."
        ));
    }

    #[test]
    fn test_prose_with_embedded_keyword_is_code() {
        // Permissive by design: "return" in running prose still matches.
        assert!(is_code_like("You should return the item to the store soon."));
    }
}
