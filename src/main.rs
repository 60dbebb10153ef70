use actix_web::{App, HttpServer, web};
use prompt_to_code::chat::{ChatMessage, ChatRequest, ChatResponse, ChatRole};
use prompt_to_code::config::Settings;
use prompt_to_code::error::ErrorResponse;
use prompt_to_code::processor::{CodeGenMetadata, CodeGenRequest, CodeGenResponse, VerifyRequest};
use prompt_to_code::server::{
    self, AppState, CodeDownloadRequest, ConfigResponse, HealthResponse, RootResponse,
};
use prompt_to_code::similarity::SimilarityScore;
use tracing_subscriber::fmt;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[derive(OpenApi)]
#[openapi(
    paths(
        server::root,
        server::health,
        server::get_config,
        server::chat,
        server::generate_code,
        server::download_code,
        server::verify_code,
    ),
    components(schemas(
        RootResponse,
        HealthResponse,
        ConfigResponse,
        ChatRequest,
        ChatMessage,
        ChatRole,
        ChatResponse,
        CodeGenRequest,
        CodeGenMetadata,
        CodeGenResponse,
        CodeDownloadRequest,
        VerifyRequest,
        SimilarityScore,
        ErrorResponse
    ))
)]
struct ApiDoc;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    fmt().with_max_level(tracing::Level::INFO).init();

    // Load .env if present; environment always wins.
    dotenvy::dotenv().ok();

    let settings = Settings::from_env();
    let bind_addr = (settings.host.clone(), settings.port);

    tracing::info!(
        "Using model {} via {} (api key: {})",
        settings.model,
        settings.api_url,
        settings.masked_key()
    );

    let state = AppState::from_settings(settings)
        .map_err(|e| std::io::Error::other(e.to_string()))?;
    let state = web::Data::new(state);

    tracing::info!(
        "Starting server at http://{}:{}/swagger-ui/",
        bind_addr.0,
        bind_addr.1
    );

    // Swagger UI at /swagger-ui/, OpenAPI document at /api-doc/openapi.json
    HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .service(server::root)
            .service(server::health)
            .service(server::get_config)
            .service(server::chat)
            .service(server::generate_code)
            .service(server::download_code)
            .service(server::verify_code)
            .service(
                SwaggerUi::new("/swagger-ui/{_:.*}").url("/api-doc/openapi.json", ApiDoc::openapi()),
            )
    })
    .bind(bind_addr)?
    .run()
    .await
}
