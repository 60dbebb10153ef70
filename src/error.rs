use serde::{Deserialize, Serialize};
use std::fmt;
use utoipa::ToSchema;

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    pub status_code: u16,
}

/// Failure taxonomy for the service. Most variants never surface as HTTP
/// errors: handlers convert them into an `error` string field inside a 200
/// JSON body. Only `BadRequest` (malformed input) and `Io` (download
/// failure) map to real HTTP status codes.
#[derive(Debug)]
pub enum ApiError {
    /// Missing credential; the upstream call is never attempted.
    Configuration(String),
    /// Non-2xx status or malformed/empty choice list from the LLM.
    Upstream { status: u16, body: String },
    /// Timeout or connection failure talking to the LLM.
    Transport(String),
    /// Empty or out-of-range required field.
    Validation(String),
    /// Similarity engine or formatter not present.
    ToolUnavailable(String),
    /// Transient-file failure during download.
    Io(String),
    /// Malformed request body.
    BadRequest(String),
}

impl fmt::Display for ApiError {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        match self {
            ApiError::Configuration(msg) => write!(f, "Configuration error: {msg}"),
            ApiError::Upstream { status, body } => write!(f, "LLM Error {status}: {body}"),
            ApiError::Transport(msg) => write!(f, "Transport error: {msg}"),
            ApiError::Validation(msg) => write!(f, "Validation error: {msg}"),
            ApiError::ToolUnavailable(msg) => write!(f, "Tool unavailable: {msg}"),
            ApiError::Io(msg) => write!(f, "Download failed: {msg}"),
            ApiError::BadRequest(msg) => write!(f, "Bad request: {msg}"),
        }
    }
}

impl std::error::Error for ApiError {}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        ApiError::Transport(err.to_string())
    }
}

impl From<std::io::Error> for ApiError {
    fn from(err: std::io::Error) -> Self {
        ApiError::Io(err.to_string())
    }
}

impl ApiError {
    pub fn configuration(msg: impl Into<String>) -> Self {
        ApiError::Configuration(msg.into())
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        ApiError::Validation(msg.into())
    }

    pub fn tool_unavailable(msg: impl Into<String>) -> Self {
        ApiError::ToolUnavailable(msg.into())
    }

    pub fn bad_request(msg: impl Into<String>) -> Self {
        ApiError::BadRequest(msg.into())
    }
}

#[cfg(feature = "server")]
impl actix_web::ResponseError for ApiError {
    fn error_response(&self) -> actix_web::HttpResponse {
        let (status_code, error_type) = match self {
            ApiError::BadRequest(_) | ApiError::Validation(_) => (400, "BAD_REQUEST"),
            ApiError::Configuration(_) => (500, "CONFIGURATION_ERROR"),
            ApiError::ToolUnavailable(_) => (503, "TOOL_UNAVAILABLE"),
            ApiError::Upstream { .. } => (502, "UPSTREAM_ERROR"),
            ApiError::Transport(_) => (502, "TRANSPORT_ERROR"),
            ApiError::Io(_) => (500, "DOWNLOAD_FAILED"),
        };

        let error_response = ErrorResponse {
            error: error_type.to_string(),
            message: self.to_string(),
            status_code,
        };

        actix_web::HttpResponse::build(
            actix_web::http::StatusCode::from_u16(status_code)
                .unwrap_or(actix_web::http::StatusCode::INTERNAL_SERVER_ERROR),
        )
        .json(error_response)
    }
}
