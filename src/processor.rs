//! Request orchestration shared by the REST handlers and the library
//! client.
//!
//! Every function here returns a structured response: upstream, transport,
//! and configuration failures are folded into the `error` field rather than
//! propagated, so callers always get a well-formed result.

use crate::chat::{ChatMessage, ChatRequest, ChatResponse};
use crate::classify::is_code_like;
use crate::config::Settings;
use crate::extract::extract_code_block;
use crate::llm::CompletionClient;
use crate::normalize::CodeFormatter;
use crate::salvage::salvage_code;
use crate::similarity::{SimilarityEngine, SimilarityScore, score_similarity};
use crate::template::TemplateEngine;
use serde::{Deserialize, Serialize};
use std::time::Instant;
use utoipa::ToSchema;

/// Conversational settings: room for creative, helpful answers.
const CHAT_TEMPERATURE: f64 = 0.7;
const CHAT_MAX_TOKENS: u32 = 1024;
/// Code generation gets a larger budget; temperature comes from the caller.
const CODE_MAX_TOKENS: u32 = 2048;

const NOT_CONFIGURED: &str = "API key not configured. Set LLM_API_KEY in .env file";

#[derive(Serialize, Deserialize, ToSchema, Debug, Clone)]
pub struct CodeGenRequest {
    pub prompt: String,
    pub language: String,
    pub temperature: f64,
}

#[derive(Serialize, Deserialize, ToSchema, Debug, Clone)]
pub struct CodeGenMetadata {
    pub model: String,
    #[serde(rename = "latencyMs")]
    pub latency_ms: u64,
    pub language: String,
    pub temperature: f64,
}

/// Result of a code-generation call. One of `code` and `error` is
/// populated; `metadata` accompanies `code`.
#[derive(Serialize, Deserialize, ToSchema, Debug, Clone, Default)]
pub struct CodeGenResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<CodeGenMetadata>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl CodeGenResponse {
    #[must_use]
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            code: None,
            metadata: None,
            error: Some(message.into()),
        }
    }
}

#[derive(Serialize, Deserialize, ToSchema, Debug, Clone)]
pub struct VerifyRequest {
    pub reference: String,
    pub candidate: String,
    #[serde(default = "default_language")]
    pub language: String,
    #[serde(default = "default_normalize")]
    pub normalize: bool,
}

fn default_language() -> String {
    "python".to_string()
}

const fn default_normalize() -> bool {
    true
}

/// Conversational chat: forwards the caller's message sequence unchanged
/// and maps the first completion choice to a reply.
pub async fn process_chat(
    settings: &Settings,
    client: &dyn CompletionClient,
    request: &ChatRequest,
) -> ChatResponse {
    if !settings.is_configured() {
        return ChatResponse::error(NOT_CONFIGURED);
    }

    match client
        .complete(&request.messages, CHAT_TEMPERATURE, CHAT_MAX_TOKENS)
        .await
    {
        Ok(outcome) => {
            if outcome.status != 200 {
                return ChatResponse::error(format!("LLM Error {}: {}", outcome.status, outcome.text));
            }
            match outcome.first_choice_text() {
                Some(reply) => ChatResponse::reply(reply),
                None => ChatResponse::error("Empty response from LLM"),
            }
        }
        Err(e) => ChatResponse::error(format!("Chat failed: {e}")),
    }
}

/// Strict code generation: prompts for code only, then pushes the raw
/// completion through extract → classify → salvage before returning it.
pub async fn process_generate(
    settings: &Settings,
    client: &dyn CompletionClient,
    request: &CodeGenRequest,
) -> CodeGenResponse {
    if !settings.is_configured() {
        return CodeGenResponse::error(NOT_CONFIGURED);
    }

    let temperature = request.temperature.clamp(0.0, 1.0);
    let messages = vec![
        ChatMessage::system(TemplateEngine::render_code_system_prompt(&request.language)),
        ChatMessage::user(request.prompt.clone()),
    ];

    let start = Instant::now();
    let outcome = match client.complete(&messages, temperature, CODE_MAX_TOKENS).await {
        Ok(outcome) => outcome,
        Err(e) => return CodeGenResponse::error(format!("Code generation failed: {e}")),
    };
    let latency_ms = u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX);

    if outcome.status != 200 {
        return CodeGenResponse::error(format!("LLM Error {}: {}", outcome.status, outcome.text));
    }

    let Some(raw) = outcome.first_choice_text() else {
        return CodeGenResponse::error("Empty response from LLM");
    };

    // Models wrap code in fences despite the prompt; unwrap, then salvage
    // if what's left still reads like prose.
    let mut code = extract_code_block(raw.trim(), &request.language);
    if !is_code_like(&code) {
        code = salvage_code(&code);
    }

    tracing::info!(
        "Generated {} code in {latency_ms} ms ({} chars)",
        request.language,
        code.len()
    );

    CodeGenResponse {
        code: Some(code),
        metadata: Some(CodeGenMetadata {
            model: settings.model.clone(),
            latency_ms,
            language: request.language.clone(),
            temperature,
        }),
        error: None,
    }
}

/// Code verification: delegates to the similarity scorer, which owns all
/// validation and availability reporting.
#[must_use]
pub fn process_verify(
    engine: Option<&dyn SimilarityEngine>,
    formatter: Option<&dyn CodeFormatter>,
    request: &VerifyRequest,
) -> SimilarityScore {
    score_similarity(
        engine,
        formatter,
        &request.reference,
        &request.candidate,
        &request.language,
        request.normalize,
    )
}
