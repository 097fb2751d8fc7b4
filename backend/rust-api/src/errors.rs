use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::services::generator_client::GeneratorError;
use crate::store::StoreError;

/// Request-level error taxonomy. Every variant maps to exactly one HTTP
/// status; bodies are `{"error": <message>}` so callers never see HTML.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    Validation(String),

    #[error("Session not found")]
    SessionMissing,

    #[error("Quiz not found.")]
    QuizNotFound,

    #[error("Initial answers not found")]
    IntakeNotFound,

    #[error("{0}")]
    GeneratorUnavailable(String),

    #[error("Rate limit exceeded. Please try again later.")]
    RateLimited,

    #[error("Request to AI service timed out. Please try again.")]
    GenerationTimeout,

    #[error("{message}")]
    InvalidGenerationOutput {
        message: String,
        raw: String,
        cleaned: String,
    },

    #[error("Store unavailable: {0}")]
    Store(#[from] StoreError),

    #[error("{0}")]
    Internal(String),
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) | ApiError::SessionMissing => StatusCode::BAD_REQUEST,
            ApiError::QuizNotFound | ApiError::IntakeNotFound => StatusCode::NOT_FOUND,
            ApiError::GeneratorUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            ApiError::RateLimited => StatusCode::TOO_MANY_REQUESTS,
            ApiError::GenerationTimeout => StatusCode::GATEWAY_TIMEOUT,
            ApiError::InvalidGenerationOutput { .. }
            | ApiError::Store(_)
            | ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();

        if status.is_server_error() {
            tracing::error!("Request failed: {}", self);
        } else {
            tracing::warn!("Request rejected: {}", self);
        }

        // Malformed generator output keeps the raw and cleaned text in the
        // body for diagnosis.
        let body = match &self {
            ApiError::InvalidGenerationOutput {
                message,
                raw,
                cleaned,
            } => json!({
                "error": message,
                "raw": raw,
                "cleaned": cleaned,
            }),
            other => json!({ "error": other.to_string() }),
        };

        (status, Json(body)).into_response()
    }
}

impl From<GeneratorError> for ApiError {
    fn from(err: GeneratorError) -> Self {
        match err {
            GeneratorError::MissingApiKey => {
                ApiError::GeneratorUnavailable("AI API Key is missing.".to_string())
            }
            GeneratorError::InvalidApiKey => ApiError::GeneratorUnavailable(
                "Invalid API key. Please check your generator API key.".to_string(),
            ),
            GeneratorError::QuotaExceeded => ApiError::GeneratorUnavailable(
                "Quota exceeded or payment required for the generator API.".to_string(),
            ),
            GeneratorError::RateLimited => ApiError::RateLimited,
            GeneratorError::Timeout => ApiError::GenerationTimeout,
            GeneratorError::Upstream { status, message } => {
                ApiError::Internal(format!("Generator API error: {} {}", status, message))
            }
            GeneratorError::EmptyResponse => ApiError::InvalidGenerationOutput {
                message: "Model did not return content".to_string(),
                raw: String::new(),
                cleaned: String::new(),
            },
            GeneratorError::Transport(e) => {
                ApiError::Internal(format!("Failed to call generator API: {}", e))
            }
        }
    }
}
