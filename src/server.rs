//! REST handlers for the standalone server.
//!
//! Every POST endpoint answers 200 with a structured body carrying either
//! the success field or an `error` string. The exceptions: a chat request
//! with no messages is a 400, and a failed download write is a 500.

use crate::chat::{ChatRequest, ChatResponse};
use crate::config::Settings;
use crate::error::ApiError;
use crate::filename::{media_type_for, sanitize_filename};
use crate::llm::{CompletionClient, HttpCompletionClient};
use crate::normalize::{BasicFormatter, CodeFormatter};
use crate::processor;
use crate::processor::{CodeGenRequest, CodeGenResponse, VerifyRequest};
use crate::similarity::{CodeBleuEngine, SimilarityEngine, SimilarityScore};
use actix_web::{HttpResponse, Responder, Result, get, post, web};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::ToSchema;

/// Shared per-process state: settings plus the injected capabilities.
/// Everything is read-only across requests; no locks needed.
#[derive(Clone)]
pub struct AppState {
    pub settings: Settings,
    pub client: Arc<dyn CompletionClient>,
    pub engine: Option<Arc<dyn SimilarityEngine>>,
    pub formatter: Option<Arc<dyn CodeFormatter>>,
}

impl AppState {
    /// Production wiring: HTTP completion client, built-in similarity
    /// engine and formatter.
    ///
    /// # Errors
    ///
    /// Fails if the HTTP client cannot be constructed.
    pub fn from_settings(settings: Settings) -> std::result::Result<Self, ApiError> {
        let client = HttpCompletionClient::new(&settings)?;
        Ok(Self {
            settings,
            client: Arc::new(client),
            engine: Some(Arc::new(CodeBleuEngine)),
            formatter: Some(Arc::new(BasicFormatter)),
        })
    }
}

#[derive(Serialize, Deserialize, ToSchema)]
pub struct RootResponse {
    pub status: String,
    pub service: String,
}

#[derive(Serialize, Deserialize, ToSchema)]
pub struct HealthResponse {
    pub status: String,
    pub model: String,
    pub api_configured: bool,
}

#[derive(Serialize, Deserialize, ToSchema)]
pub struct ConfigResponse {
    pub model: String,
    pub api_url: String,
    pub api_key_configured: bool,
    pub api_key_masked: String,
}

#[derive(Serialize, Deserialize, ToSchema, Debug, Clone)]
pub struct CodeDownloadRequest {
    pub code: String,
    #[serde(default)]
    pub filename: Option<String>,
}

#[utoipa::path(
    get,
    path = "/",
    responses((status = 200, description = "Service liveness", body = RootResponse))
)]
#[get("/")]
pub async fn root() -> impl Responder {
    web::Json(RootResponse {
        status: "running".to_string(),
        service: "prompt-to-code backend".to_string(),
    })
}

#[utoipa::path(
    get,
    path = "/api/health",
    responses((status = 200, description = "Health and configuration state", body = HealthResponse))
)]
#[get("/api/health")]
pub async fn health(state: web::Data<AppState>) -> impl Responder {
    web::Json(HealthResponse {
        status: "ok".to_string(),
        model: state.settings.model.clone(),
        api_configured: state.settings.is_configured(),
    })
}

#[utoipa::path(
    get,
    path = "/api/config",
    responses((status = 200, description = "Active configuration with masked credential", body = ConfigResponse))
)]
#[get("/api/config")]
pub async fn get_config(state: web::Data<AppState>) -> impl Responder {
    web::Json(ConfigResponse {
        model: state.settings.model.clone(),
        api_url: state.settings.api_url.clone(),
        api_key_configured: state.settings.is_configured(),
        api_key_masked: state.settings.masked_key(),
    })
}

#[utoipa::path(
    post,
    path = "/api/chat",
    request_body = ChatRequest,
    responses(
        (status = 200, description = "Reply or structured error", body = ChatResponse),
        (status = 400, description = "No messages provided")
    )
)]
#[post("/api/chat")]
pub async fn chat(
    state: web::Data<AppState>,
    req: web::Json<ChatRequest>,
) -> Result<impl Responder, ApiError> {
    if req.messages.is_empty() {
        return Err(ApiError::bad_request("No messages provided"));
    }

    let response = processor::process_chat(&state.settings, state.client.as_ref(), &req).await;
    Ok(web::Json(response))
}

#[utoipa::path(
    post,
    path = "/api/generate_code",
    request_body = CodeGenRequest,
    responses((status = 200, description = "Generated code with metadata, or structured error", body = CodeGenResponse))
)]
#[post("/api/generate_code")]
pub async fn generate_code(
    state: web::Data<AppState>,
    req: web::Json<CodeGenRequest>,
) -> Result<impl Responder, ApiError> {
    let response = processor::process_generate(&state.settings, state.client.as_ref(), &req).await;
    Ok(web::Json(response))
}

#[utoipa::path(
    post,
    path = "/api/download_code",
    request_body = CodeDownloadRequest,
    responses(
        (status = 200, description = "Source file attachment"),
        (status = 500, description = "Download failed")
    )
)]
#[post("/api/download_code")]
pub async fn download_code(req: web::Json<CodeDownloadRequest>) -> Result<HttpResponse, ApiError> {
    let safe_filename = sanitize_filename(req.filename.as_deref().unwrap_or("generated_code.py"));
    let media_type = media_type_for(&safe_filename);

    // Transient file per request; this invocation owns its whole lifecycle.
    let temp_path =
        std::env::temp_dir().join(format!("{}_{safe_filename}", uuid::Uuid::new_v4()));

    tokio::fs::write(&temp_path, &req.code).await?;
    let contents = tokio::fs::read(&temp_path).await?;
    if let Err(e) = tokio::fs::remove_file(&temp_path).await {
        tracing::warn!("Failed to remove transient file {}: {e}", temp_path.display());
    }

    Ok(HttpResponse::Ok()
        .content_type(media_type)
        .insert_header((
            "Content-Disposition",
            format!("attachment; filename={safe_filename}"),
        ))
        .body(contents))
}

#[utoipa::path(
    post,
    path = "/api/verify_code",
    request_body = VerifyRequest,
    responses((status = 200, description = "Similarity score breakdown or unavailability report", body = SimilarityScore))
)]
#[post("/api/verify_code")]
pub async fn verify_code(
    state: web::Data<AppState>,
    req: web::Json<VerifyRequest>,
) -> Result<impl Responder, ApiError> {
    let engine = state.engine.as_deref();
    let formatter = state.formatter.as_deref();
    let score = processor::process_verify(engine, formatter, &req);
    Ok(web::Json(score))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chat::ChatMessage;
    use crate::llm::CompletionOutcome;
    use actix_web::{App, test};
    use async_trait::async_trait;
    use serde_json::{Value, json};

    struct CannedClient {
        content: &'static str,
    }

    #[async_trait]
    impl CompletionClient for CannedClient {
        async fn complete(
            &self,
            _messages: &[ChatMessage],
            _temperature: f64,
            _max_tokens: u32,
        ) -> std::result::Result<CompletionOutcome, ApiError> {
            Ok(CompletionOutcome {
                status: 200,
                body: json!({"choices": [{"message": {"content": self.content}}]}),
                text: String::new(),
            })
        }
    }

    fn test_state(
        api_key: &str,
        content: &'static str,
    ) -> AppState {
        AppState {
            settings: Settings {
                api_key: api_key.to_string(),
                ..Settings::default()
            },
            client: Arc::new(CannedClient { content }),
            engine: Some(Arc::new(CodeBleuEngine)),
            formatter: Some(Arc::new(BasicFormatter)),
        }
    }

    macro_rules! test_app {
        ($state:expr) => {
            test::init_service(
                App::new()
                    .app_data(web::Data::new($state))
                    .service(root)
                    .service(health)
                    .service(get_config)
                    .service(chat)
                    .service(generate_code)
                    .service(download_code)
                    .service(verify_code),
            )
            .await
        };
    }

    #[actix_web::test]
    async fn test_root_endpoint() {
        let app = test_app!(test_state("key-1234567890", "hi"));
        let req = test::TestRequest::get().uri("/").to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["status"], "running");
        assert!(body["service"].as_str().is_some());
    }

    #[actix_web::test]
    async fn test_health_endpoint() {
        let app = test_app!(test_state("key-1234567890", "hi"));
        let req = test::TestRequest::get().uri("/api/health").to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["status"], "ok");
        assert_eq!(body["api_configured"], true);
    }

    #[actix_web::test]
    async fn test_config_endpoint_masks_key() {
        let app = test_app!(test_state("gsk_abcdefghijklmnop", "hi"));
        let req = test::TestRequest::get().uri("/api/config").to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["api_key_masked"], "gsk_****mnop");
        assert_eq!(body["api_key_configured"], true);
    }

    #[actix_web::test]
    async fn test_chat_empty_messages_is_bad_request() {
        let app = test_app!(test_state("key-1234567890", "hi"));
        let req = test::TestRequest::post()
            .uri("/api/chat")
            .set_json(json!({"messages": []}))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), 400);
    }

    #[actix_web::test]
    async fn test_chat_roundtrip() {
        let app = test_app!(test_state("key-1234567890", "Hello back"));
        let req = test::TestRequest::post()
            .uri("/api/chat")
            .set_json(json!({"messages": [{"role": "user", "content": "Hello"}]}))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["reply"], "Hello back");
        assert!(body.get("error").is_none());
    }

    #[actix_web::test]
    async fn test_chat_unconfigured_returns_error_field() {
        let app = test_app!(test_state("", "unused"));
        let req = test::TestRequest::post()
            .uri("/api/chat")
            .set_json(json!({"messages": [{"role": "user", "content": "Hello"}]}))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), 200);
        let body: Value = test::read_body_json(resp).await;
        assert!(body["error"].as_str().unwrap().contains("not configured"));
        assert!(body.get("reply").is_none());
    }

    #[actix_web::test]
    async fn test_generate_code_unwraps_fence() {
        let app = test_app!(test_state("key-1234567890", "```python\nprint('ok')\n```"));
        let req = test::TestRequest::post()
            .uri("/api/generate_code")
            .set_json(json!({"prompt": "print ok", "language": "python", "temperature": 0.1}))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["code"], "print('ok')");
        assert_eq!(body["metadata"]["language"], "python");
    }

    #[actix_web::test]
    async fn test_download_traversal_filename_sanitized() {
        let app = test_app!(test_state("key-1234567890", "hi"));
        let req = test::TestRequest::post()
            .uri("/api/download_code")
            .set_json(json!({"code": "print('x')", "filename": "../x"}))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), 200);

        let disposition = resp
            .headers()
            .get("Content-Disposition")
            .unwrap()
            .to_str()
            .unwrap()
            .to_string();
        assert!(disposition.starts_with("attachment; filename="));
        let served_name = disposition.trim_start_matches("attachment; filename=");
        assert!(!served_name.contains('/'));
        assert!(!served_name.contains('\\'));

        let body = test::read_body(resp).await;
        assert_eq!(body, "print('x')".as_bytes());
    }

    #[actix_web::test]
    async fn test_download_python_mime_type() {
        let app = test_app!(test_state("key-1234567890", "hi"));
        let req = test::TestRequest::post()
            .uri("/api/download_code")
            .set_json(json!({"code": "x = 1", "filename": "solution.py"}))
            .to_request();
        let resp = test::call_service(&app, req).await;
        let content_type = resp.headers().get("Content-Type").unwrap().to_str().unwrap();
        assert_eq!(content_type, "text/x-python");
    }

    #[actix_web::test]
    async fn test_verify_identical_code() {
        let app = test_app!(test_state("key-1234567890", "hi"));
        let req = test::TestRequest::post()
            .uri("/api/verify_code")
            .set_json(json!({
                "reference": "def f():\n    return 1",
                "candidate": "def f():\n    return 1",
                "language": "python",
                "normalize": false
            }))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["available"], true);
        assert!((body["score"].as_f64().unwrap() - 1.0).abs() < 1e-9);
    }

    #[actix_web::test]
    async fn test_verify_empty_candidate_unavailable() {
        let app = test_app!(test_state("key-1234567890", "hi"));
        let req = test::TestRequest::post()
            .uri("/api/verify_code")
            .set_json(json!({"reference": "x = 1", "candidate": ""}))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["available"], false);
        assert!(body["error"].as_str().is_some());
        assert!(body.get("score").is_none());
    }
}
