//! Language-aware lexer feeding the similarity components.
//!
//! Produces a flat token stream with just enough classification for the
//! scoring heuristics: keywords for weighting, identifiers for dataflow,
//! literals and symbols for lexical overlap. Comments are stripped since
//! they carry no similarity signal.

use crate::language::Language;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    Keyword,
    Identifier,
    Number,
    StringLit,
    Symbol,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Token {
    pub kind: TokenKind,
    pub text: String,
}

impl Token {
    fn new(
        kind: TokenKind,
        text: impl Into<String>,
    ) -> Self {
        Self {
            kind,
            text: text.into(),
        }
    }

    /// Relative importance for weighted n-gram matching: keywords dominate
    /// identifiers and literals.
    #[must_use]
    pub fn weight(&self) -> f64 {
        match self.kind {
            TokenKind::Keyword => 1.0,
            _ => 0.2,
        }
    }
}

const PYTHON_KEYWORDS: &[&str] = &[
    "False", "None", "True", "and", "as", "assert", "async", "await", "break", "class", "continue",
    "def", "del", "elif", "else", "except", "finally", "for", "from", "global", "if", "import",
    "in", "is", "lambda", "nonlocal", "not", "or", "pass", "raise", "return", "try", "while",
    "with", "yield",
];

const C_KEYWORDS: &[&str] = &[
    "auto", "break", "case", "char", "const", "continue", "default", "do", "double", "else",
    "enum", "extern", "float", "for", "goto", "if", "int", "long", "register", "return", "short",
    "signed", "sizeof", "static", "struct", "switch", "typedef", "union", "unsigned", "void",
    "volatile", "while",
];

const CPP_KEYWORDS: &[&str] = &[
    "auto", "bool", "break", "case", "catch", "char", "class", "const", "continue", "default",
    "delete", "do", "double", "else", "enum", "explicit", "extern", "false", "float", "for",
    "friend", "goto", "if", "inline", "int", "long", "namespace", "new", "nullptr", "operator",
    "private", "protected", "public", "return", "short", "signed", "sizeof", "static",
    "struct", "switch", "template", "this", "throw", "true", "try", "typedef", "typename",
    "union", "unsigned", "using", "virtual", "void", "volatile", "while",
];

const JAVA_KEYWORDS: &[&str] = &[
    "abstract", "assert", "boolean", "break", "byte", "case", "catch", "char", "class", "const",
    "continue", "default", "do", "double", "else", "enum", "extends", "final", "finally", "float",
    "for", "goto", "if", "implements", "import", "instanceof", "int", "interface", "long",
    "native", "new", "package", "private", "protected", "public", "return", "short", "static",
    "strictfp", "super", "switch", "synchronized", "this", "throw", "throws", "transient", "try",
    "void", "volatile", "while",
];

const JS_KEYWORDS: &[&str] = &[
    "async", "await", "break", "case", "catch", "class", "const", "continue", "debugger",
    "default", "delete", "do", "else", "export", "extends", "false", "finally", "for", "function",
    "if", "import", "in", "instanceof", "let", "new", "null", "of", "return", "super", "switch",
    "this", "throw", "true", "try", "typeof", "undefined", "var", "void", "while", "with",
    "yield",
];

const TS_KEYWORDS: &[&str] = &[
    "any", "as", "async", "await", "boolean", "break", "case", "catch", "class", "const",
    "continue", "declare", "default", "delete", "do", "else", "enum", "export", "extends",
    "false", "finally", "for", "function", "if", "implements", "import", "in", "instanceof",
    "interface", "let", "namespace", "new", "null", "number", "of", "private", "protected",
    "public", "readonly", "return", "string", "super", "switch", "this", "throw", "true", "try",
    "type", "typeof", "undefined", "var", "void", "while", "yield",
];

const GO_KEYWORDS: &[&str] = &[
    "break", "case", "chan", "const", "continue", "default", "defer", "else", "fallthrough",
    "for", "func", "go", "goto", "if", "import", "interface", "map", "package", "range",
    "return", "select", "struct", "switch", "type", "var",
];

const RUST_KEYWORDS: &[&str] = &[
    "as", "async", "await", "break", "const", "continue", "crate", "dyn", "else", "enum",
    "extern", "false", "fn", "for", "if", "impl", "in", "let", "loop", "match", "mod", "move",
    "mut", "pub", "ref", "return", "self", "static", "struct", "super", "trait", "true", "type",
    "unsafe", "use", "where", "while",
];

fn keywords(language: Language) -> &'static [&'static str] {
    match language {
        Language::Python => PYTHON_KEYWORDS,
        Language::C => C_KEYWORDS,
        Language::Cpp => CPP_KEYWORDS,
        Language::Java => JAVA_KEYWORDS,
        Language::JavaScript => JS_KEYWORDS,
        Language::TypeScript => TS_KEYWORDS,
        Language::Go => GO_KEYWORDS,
        Language::Rust => RUST_KEYWORDS,
    }
}

/// Two-character operators lexed as single tokens.
const DOUBLE_OPS: &[&str] = &[
    "==", "!=", "<=", ">=", "->", "=>", ":=", "&&", "||", "**", "+=", "-=", "*=", "/=", "::",
    "<<", ">>",
];

/// Tokenizes `code` for similarity scoring. Comments are skipped according
/// to the language's comment syntax; strings are single tokens.
#[must_use]
pub fn tokenize(
    code: &str,
    language: Language,
) -> Vec<Token> {
    let hash_comments = matches!(language, Language::Python);
    let keyword_set = keywords(language);

    let chars: Vec<char> = code.chars().collect();
    let mut tokens = Vec::new();
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];

        if c.is_whitespace() {
            i += 1;
            continue;
        }

        // Comments.
        if hash_comments && c == '#' {
            while i < chars.len() && chars[i] != '\n' {
                i += 1;
            }
            continue;
        }
        if !hash_comments && c == '/' && i + 1 < chars.len() {
            if chars[i + 1] == '/' {
                while i < chars.len() && chars[i] != '\n' {
                    i += 1;
                }
                continue;
            }
            if chars[i + 1] == '*' {
                i += 2;
                while i + 1 < chars.len() && !(chars[i] == '*' && chars[i + 1] == '/') {
                    i += 1;
                }
                i = (i + 2).min(chars.len());
                continue;
            }
        }

        // String literals, with escape handling.
        if c == '"' || c == '\'' {
            let quote = c;
            let start = i;
            i += 1;
            while i < chars.len() && chars[i] != quote {
                if chars[i] == '\\' {
                    i += 1;
                }
                i += 1;
            }
            i = (i + 1).min(chars.len());
            let text: String = chars[start..i.min(chars.len())].iter().collect();
            tokens.push(Token::new(TokenKind::StringLit, text));
            continue;
        }

        // Numbers.
        if c.is_ascii_digit() {
            let start = i;
            while i < chars.len() && (chars[i].is_ascii_alphanumeric() || chars[i] == '.' || chars[i] == '_') {
                i += 1;
            }
            let text: String = chars[start..i].iter().collect();
            tokens.push(Token::new(TokenKind::Number, text));
            continue;
        }

        // Identifiers and keywords.
        if c.is_alphabetic() || c == '_' {
            let start = i;
            while i < chars.len() && (chars[i].is_alphanumeric() || chars[i] == '_') {
                i += 1;
            }
            let text: String = chars[start..i].iter().collect();
            let kind = if keyword_set.contains(&text.as_str()) {
                TokenKind::Keyword
            } else {
                TokenKind::Identifier
            };
            tokens.push(Token::new(kind, text));
            continue;
        }

        // Operators and punctuation.
        if i + 1 < chars.len() {
            let pair: String = chars[i..i + 2].iter().collect();
            if DOUBLE_OPS.contains(&pair.as_str()) {
                tokens.push(Token::new(TokenKind::Symbol, pair));
                i += 2;
                continue;
            }
        }
        tokens.push(Token::new(TokenKind::Symbol, c.to_string()));
        i += 1;
    }

    tokens
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_python_tokenization() {
        let tokens = tokenize("def add(a, b):\n    return a + b", Language::Python);
        let texts: Vec<&str> = tokens.iter().map(|t| t.text.as_str()).collect();
        assert_eq!(texts, vec!["def", "add", "(", "a", ",", "b", ")", ":", "return", "a", "+", "b"]);
        assert_eq!(tokens[0].kind, TokenKind::Keyword);
        assert_eq!(tokens[1].kind, TokenKind::Identifier);
    }

    #[test]
    fn test_comments_stripped() {
        let tokens = tokenize("x = 1  # the answer", Language::Python);
        assert_eq!(tokens.len(), 3);

        let tokens = tokenize("let x = 1; // the answer\n/* block */ let y = 2;", Language::Rust);
        let texts: Vec<&str> = tokens.iter().map(|t| t.text.as_str()).collect();
        assert_eq!(texts, vec!["let", "x", "=", "1", ";", "let", "y", "=", "2", ";"]);
    }

    #[test]
    fn test_string_literal_is_one_token() {
        let tokens = tokenize(r#"print("hello, world")"#, Language::Python);
        assert_eq!(tokens[2].kind, TokenKind::StringLit);
        assert_eq!(tokens[2].text, r#""hello, world""#);
    }

    #[test]
    fn test_double_operators() {
        let tokens = tokenize("a == b && c != d", Language::JavaScript);
        let texts: Vec<&str> = tokens.iter().map(|t| t.text.as_str()).collect();
        assert_eq!(texts, vec!["a", "==", "b", "&&", "c", "!=", "d"]);
    }

    #[test]
    fn test_keyword_weight_dominates() {
        let tokens = tokenize("return value", Language::Python);
        assert!(tokens[0].weight() > tokens[1].weight());
    }

    #[test]
    fn test_number_token() {
        let tokens = tokenize("x = 3.14_15", Language::Python);
        assert_eq!(tokens[2].kind, TokenKind::Number);
        assert_eq!(tokens[2].text, "3.14_15");
    }
}
