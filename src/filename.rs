//! Filename sanitization and MIME selection for the download endpoint.

/// Base name used when sanitization leaves nothing usable.
const DEFAULT_BASENAME: &str = "generated_code";
/// Extension appended when the name carries none.
const DEFAULT_EXTENSION: &str = ".py";
/// Hard cap on the sanitized name, extension included.
const MAX_FILENAME_LEN: usize = 100;

/// Maps a caller-supplied filename, possibly empty or hostile, to a safe
/// one: no path separators or traversal characters, guaranteed non-empty,
/// guaranteed extension, at most 100 characters. Deterministic and total.
#[must_use]
pub fn sanitize_filename(name: &str) -> String {
    let mut name: String = name
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            other => other,
        })
        .collect();

    // Leading/trailing dots enable hidden-file and trailing-dot tricks.
    name = name.trim_matches(|c: char| c.is_whitespace() || c == '.').to_string();

    if name.is_empty() {
        name = DEFAULT_BASENAME.to_string();
    }

    if !name.contains('.') {
        name.push_str(DEFAULT_EXTENSION);
    }

    if name.chars().count() > MAX_FILENAME_LEN {
        let ext = extension_of(&name).unwrap_or_default().to_string();
        let keep = MAX_FILENAME_LEN.saturating_sub(ext.chars().count());
        let base: String = name.chars().take(keep).collect();
        name = format!("{base}{ext}");
        // An absurdly long extension can still blow the cap on its own.
        if name.chars().count() > MAX_FILENAME_LEN {
            name = name.chars().take(MAX_FILENAME_LEN).collect();
        }
    }

    name
}

/// MIME type for a sanitized filename, from a fixed extension table.
#[must_use]
pub fn media_type_for(name: &str) -> &'static str {
    match extension_of(name) {
        Some(".py") => "text/x-python",
        Some(".cpp") => "text/x-c++src",
        Some(".c") => "text/x-csrc",
        Some(".java") => "text/x-java",
        Some(".js") => "text/javascript",
        Some(".ts") => "text/typescript",
        Some(".go") => "text/x-go",
        Some(".rs") => "text/x-rust",
        _ => "text/plain",
    }
}

/// Extension including the leading dot, or None when the name has none.
fn extension_of(name: &str) -> Option<&str> {
    name.rfind('.').map(|idx| &name[idx..])
}
