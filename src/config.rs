//! Service configuration read once at startup and passed by handle into
//! every component that needs it. No ambient global lookup.

/// Runtime settings for the upstream LLM endpoint and the HTTP bind address.
#[derive(Debug, Clone)]
pub struct Settings {
    pub api_url: String,
    pub api_key: String,
    pub model: String,
    pub host: String,
    pub port: u16,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_url: "https://api.groq.com/openai/v1/chat/completions".to_string(),
            api_key: String::new(),
            model: "llama-3.1-70b-versatile".to_string(),
            host: "127.0.0.1".to_string(),
            port: 8000,
        }
    }
}

impl Settings {
    /// Builds settings from the environment, falling back to defaults for
    /// anything unset. `.env` loading is the binary's job, not ours.
    #[must_use]
    pub fn from_env() -> Self {
        let defaults = Self::default();

        Self {
            api_url: std::env::var("LLM_API_URL").unwrap_or(defaults.api_url),
            api_key: std::env::var("LLM_API_KEY").unwrap_or(defaults.api_key),
            model: std::env::var("LLM_MODEL").unwrap_or(defaults.model),
            host: std::env::var("HOST").unwrap_or(defaults.host),
            port: std::env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(defaults.port),
        }
    }

    /// Whether an API credential is present at all.
    #[must_use]
    pub fn is_configured(&self) -> bool {
        !self.api_key.is_empty()
    }

    /// Masked rendering of the API key for the config endpoint. Shows the
    /// first and last four characters only; short keys are fully masked.
    #[must_use]
    pub fn masked_key(&self) -> String {
        if self.api_key.is_empty() {
            return "(not set)".to_string();
        }
        // Char-based throughout; keys are not guaranteed to be ASCII.
        let chars: Vec<char> = self.api_key.chars().collect();
        if chars.len() <= 8 {
            return "****".to_string();
        }
        let head: String = chars[..4].iter().collect();
        let tail: String = chars[chars.len() - 4..].iter().collect();
        format!("{head}****{tail}")
    }
}
