use strum::{Display, EnumString};

/// Programming languages the service knows how to post-process and compare.
/// Parsed case-insensitively from wire tags such as `"python"` or `"c++"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumString, Display)]
#[strum(ascii_case_insensitive)]
pub enum Language {
    #[strum(to_string = "python", serialize = "py")]
    Python,
    #[strum(to_string = "cpp", serialize = "c++")]
    Cpp,
    #[strum(to_string = "c")]
    C,
    #[strum(to_string = "java")]
    Java,
    #[strum(to_string = "javascript", serialize = "js")]
    JavaScript,
    #[strum(to_string = "typescript", serialize = "ts")]
    TypeScript,
    #[strum(to_string = "go", serialize = "golang")]
    Go,
    #[strum(to_string = "rust", serialize = "rs")]
    Rust,
}

impl Language {
    /// Parses a caller-supplied language tag, tolerating case and padding.
    #[must_use]
    pub fn from_tag(tag: &str) -> Option<Self> {
        tag.trim().parse().ok()
    }

    /// Canonical source-file extension, used for downloads.
    #[must_use]
    pub fn extension(self) -> &'static str {
        match self {
            Language::Python => ".py",
            Language::Cpp => ".cpp",
            Language::C => ".c",
            Language::Java => ".java",
            Language::JavaScript => ".js",
            Language::TypeScript => ".ts",
            Language::Go => ".go",
            Language::Rust => ".rs",
        }
    }
}
