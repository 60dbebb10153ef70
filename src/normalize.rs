//! Optional code reformatting ahead of similarity comparison.
//!
//! The formatter is an injected capability: it may be absent, and when
//! present it may still refuse input it cannot make sense of. Both cases
//! degrade to returning the code unchanged so verification never aborts on
//! a formatting defect.

use crate::language::Language;

/// A language-aware code formatter.
pub trait CodeFormatter: Send + Sync {
    /// Whether this formatter handles `language` at all.
    fn supports(
        &self,
        language: Language,
    ) -> bool;

    /// Reformats `code`, or errors when the input does not parse well
    /// enough to format. Errors are advisory; callers fall back to the
    /// original text.
    fn format(
        &self,
        code: &str,
        language: Language,
    ) -> Result<String, FormatError>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormatError(pub String);

impl std::fmt::Display for FormatError {
    fn fmt(
        &self,
        f: &mut std::fmt::Formatter<'_>,
    ) -> std::fmt::Result {
        write!(f, "format error: {}", self.0)
    }
}

/// Built-in whitespace-canonicalizing formatter.
///
/// Conservative on purpose: tabs become four spaces, trailing whitespace is
/// stripped, runs of blank lines collapse to one, and the edges are
/// trimmed. Token content is never touched. Input with unbalanced
/// delimiters is treated as unparsable and refused.
pub struct BasicFormatter;

impl CodeFormatter for BasicFormatter {
    fn supports(
        &self,
        _language: Language,
    ) -> bool {
        true
    }

    fn format(
        &self,
        code: &str,
        _language: Language,
    ) -> Result<String, FormatError> {
        if !delimiters_balanced(code) {
            return Err(FormatError("unbalanced delimiters".to_string()));
        }

        let mut out = Vec::new();
        let mut prev_blank = false;
        for line in code.lines() {
            let line = line.replace('\t', "    ");
            let line = line.trim_end();
            if line.is_empty() {
                if !prev_blank {
                    out.push(String::new());
                }
                prev_blank = true;
            } else {
                out.push(line.to_string());
                prev_blank = false;
            }
        }

        Ok(out.join("\n").trim().to_string())
    }
}

/// Runs `code` through the formatter when one is present and applicable,
/// passing through unchanged otherwise. Total function.
#[must_use]
pub fn normalize_code(
    code: &str,
    language: Language,
    formatter: Option<&dyn CodeFormatter>,
) -> String {
    let Some(formatter) = formatter else {
        return code.to_string();
    };

    if !formatter.supports(language) {
        return code.to_string();
    }

    match formatter.format(code, language) {
        Ok(formatted) => formatted,
        Err(e) => {
            tracing::debug!("Formatter declined input, passing through: {e}");
            code.to_string()
        }
    }
}

/// Checks paired bracket characters, ignoring ordering between families.
/// A cheap stand-in for "the code parses". Quoted regions are skipped so a
/// bracket inside a string literal does not count.
fn delimiters_balanced(code: &str) -> bool {
    let mut paren = 0i64;
    let mut brace = 0i64;
    let mut bracket = 0i64;
    let mut chars = code.chars();
    while let Some(c) = chars.next() {
        match c {
            '"' | '\'' => {
                let quote = c;
                while let Some(inner) = chars.next() {
                    if inner == '\\' {
                        chars.next();
                    } else if inner == quote {
                        break;
                    }
                }
            }
            '(' => paren += 1,
            ')' => paren -= 1,
            '{' => brace += 1,
            '}' => brace -= 1,
            '[' => bracket += 1,
            ']' => bracket -= 1,
            _ => {}
        }
        if paren < 0 || brace < 0 || bracket < 0 {
            return false;
        }
    }
    paren == 0 && brace == 0 && bracket == 0
}
