//! # prompt-to-code
//!
//! A library and REST API for turning hosted-LLM chat completions into
//! verifiable source-code artifacts.
//!
//! The service forwards chat and code-generation requests to an
//! OpenAI-compatible completion endpoint, post-processes the raw model
//! output into either a conversational reply or an isolated code artifact,
//! and can score generated code against a reference implementation with a
//! CodeBLEU-style similarity metric.
//!
//! ## Features
//!
//! - **Conversational chat**: pass-through of the caller's message history
//!   with structured error reporting
//! - **Strict code generation**: code-only prompting plus a deterministic
//!   extract → classify → salvage pipeline for models that disobey
//! - **Code verification**: four-component similarity scoring (n-gram,
//!   weighted n-gram, syntax tree, dataflow) with an overall mean score
//! - **Safe downloads**: filename sanitization and a fixed MIME table
//!
//! ## Library Usage
//!
//! ```toml
//! [dependencies]
//! prompt-to-code = { version = "0.1", default-features = false }
//! ```
//!
//! ### Basic Example
//!
//! ```rust,no_run
//! use prompt_to_code::{ChatMessage, ChatRequest, PromptToCodeClient};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
//!     let client = PromptToCodeClient::new(
//!         "https://api.groq.com/openai/v1/chat/completions",
//!         "your-api-key",
//!         "llama-3.1-70b-versatile",
//!     )?;
//!
//!     let request = ChatRequest {
//!         messages: vec![ChatMessage::user("Explain binary search".to_string())],
//!     };
//!
//!     let response = client.chat(&request).await;
//!     println!("{}", response.reply.unwrap_or_default());
//!     Ok(())
//! }
//! ```
//!
//! ### Verifying Generated Code
//!
//! ```rust,no_run
//! use prompt_to_code::{PromptToCodeClient, VerifyRequest};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
//! let client = PromptToCodeClient::new("url", "key", "model")?;
//!
//! let score = client.verify_code(&VerifyRequest {
//!     reference: "def add(a, b):\n    return a + b".to_string(),
//!     candidate: "def add(x, y):\n    return x + y".to_string(),
//!     language: "python".to_string(),
//!     normalize: true,
//! });
//!
//! if score.available {
//!     println!("overall: {:.3}", score.score.unwrap());
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Server Mode
//!
//! The REST server is behind the `server` feature (enabled by default).
//! Run the binary and browse the Swagger UI at `/swagger-ui/`.

// Core modules - always available
pub mod chat;
pub mod classify;
pub mod config;
pub mod error;
pub mod extract;
pub mod filename;
pub mod language;
pub mod llm;
pub mod normalize;
pub mod processor;
pub mod salvage;
pub mod similarity;
pub mod template;

// Server-specific modules - only when server feature is enabled
#[cfg(feature = "server")]
pub mod server;

// Re-export commonly used types for easier access
pub use chat::{ChatMessage, ChatRequest, ChatResponse, ChatRole};
pub use config::Settings;
pub use error::{ApiError, ErrorResponse};
pub use language::Language;
pub use processor::{CodeGenRequest, CodeGenResponse, VerifyRequest};
pub use similarity::SimilarityScore;

use llm::HttpCompletionClient;
use normalize::BasicFormatter;
use similarity::CodeBleuEngine;

/// A high-level client for chat, code generation, and verification against
/// an OpenAI-compatible completion endpoint.
pub struct PromptToCodeClient {
    settings: Settings,
    client: HttpCompletionClient,
}

impl PromptToCodeClient {
    /// Creates a client for the given endpoint, credential, and model.
    ///
    /// # Errors
    ///
    /// Fails if the underlying HTTP client cannot be constructed.
    pub fn new(
        api_url: impl Into<String>,
        api_key: impl Into<String>,
        model: impl Into<String>,
    ) -> Result<Self, ApiError> {
        let settings = Settings {
            api_url: api_url.into(),
            api_key: api_key.into(),
            model: model.into(),
            ..Settings::default()
        };
        let client = HttpCompletionClient::new(&settings)?;
        Ok(Self { settings, client })
    }

    /// Conversational chat over the full caller-supplied message history.
    pub async fn chat(
        &self,
        request: &ChatRequest,
    ) -> ChatResponse {
        processor::process_chat(&self.settings, &self.client, request).await
    }

    /// Strict code generation with fence extraction and prose salvage.
    pub async fn generate_code(
        &self,
        request: &CodeGenRequest,
    ) -> CodeGenResponse {
        processor::process_generate(&self.settings, &self.client, request).await
    }

    /// Scores candidate code against a reference using the built-in
    /// CodeBLEU-style engine and normalizer.
    #[must_use]
    pub fn verify_code(
        &self,
        request: &VerifyRequest,
    ) -> SimilarityScore {
        processor::process_verify(Some(&CodeBleuEngine), Some(&BasicFormatter), request)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_creation() {
        let client = PromptToCodeClient::new("https://example.com/v1/chat", "test-key-123456", "test-model")
            .expect("client should build");

        assert_eq!(client.settings.model, "test-model");
        assert_eq!(client.settings.api_url, "https://example.com/v1/chat");
        assert!(client.settings.is_configured());
    }

    #[test]
    fn test_client_verify_identical() {
        let client = PromptToCodeClient::new("url", "key", "model").unwrap();
        let score = client.verify_code(&VerifyRequest {
            reference: "def f():\n    return 1".to_string(),
            candidate: "def f():\n    return 1".to_string(),
            language: "python".to_string(),
            normalize: true,
        });

        assert!(score.available);
        assert!((score.score.unwrap() - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_client_verify_empty_candidate() {
        let client = PromptToCodeClient::new("url", "key", "model").unwrap();
        let score = client.verify_code(&VerifyRequest {
            reference: "x = 1".to_string(),
            candidate: String::new(),
            language: "python".to_string(),
            normalize: false,
        });

        assert!(!score.available);
        assert!(score.error.is_some());
    }
}
