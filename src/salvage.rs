//! Best-effort recovery of code-only content.
//!
//! Invoked only when the classifier rejects extracted text: the model mixed
//! prose with code despite the instructions. Lines that open like narration
//! or comments are dropped; everything else is kept in order. If nothing
//! survives, the original text is returned untouched rather than an empty
//! salvage.

/// Line openers that mark explanatory rather than executable content.
const PROSE_OPENERS: &[&str] = &["#", "//", "/*", "*", "Here", "This", "The "];

/// Strips likely prose lines from `text`, returning the surviving code
/// lines joined by newlines, or the original text when every line was
/// dropped. Never fails.
#[must_use]
pub fn salvage_code(text: &str) -> String {
    let survivors: Vec<&str> = text
        .lines()
        .filter(|line| {
            let trimmed = line.trim();
            !trimmed.is_empty() && !PROSE_OPENERS.iter().any(|p| trimmed.starts_with(p))
        })
        .collect();

    if survivors.is_empty() {
        text.to_string()
    } else {
        survivors.join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_comment_line_dropped_code_kept() {
        let text = "# this computes the answer\nresult = 6 * 7";
        let salvaged = salvage_code(text);
        assert!(salvaged.contains("result = 6 * 7"));
        assert!(!salvaged.contains("computes"));
    }

    #[test]
    fn test_narrative_openers_dropped() {
        let text = "Here is the function you asked for:\ndef add(a, b):\n    return a + b\nThis should work.";
        let salvaged = salvage_code(text);
        assert_eq!(salvaged, "def add(a, b):\n    return a + b");
    }

    #[test]
    fn test_blank_lines_dropped() {
        let text = "x = 1\n\n\ny = 2";
        assert_eq!(salvage_code(text), "x = 1\ny = 2");
    }

    #[test]
    fn test_order_preserved() {
        let text = "b = 2\n// comment\na = 1";
        assert_eq!(salvage_code(text), "b = 2\na = 1");
    }

    #[test]
    fn test_all_prose_returns_original() {
        let text = "Here is an explanation.\nThis is all narration.";
        assert_eq!(salvage_code(text), text);
    }

    #[test]
    fn test_empty_input_returns_original() {
        assert_eq!(salvage_code(""), "");
    }
}
