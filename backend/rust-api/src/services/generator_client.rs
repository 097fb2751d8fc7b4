use reqwest::{Client, StatusCode};
use serde::Deserialize;
use serde_json::json;
use thiserror::Error;

use crate::config::Config;
use crate::metrics::GENERATOR_REQUESTS_TOTAL;

/// Hard deadline for one generation call. Exceeding it aborts the in-flight
/// request rather than letting it linger.
pub const GENERATION_TIMEOUT: std::time::Duration = std::time::Duration::from_secs(30);

const MAX_TOKENS: u32 = 4000;

#[derive(Debug, Error)]
pub enum GeneratorError {
    #[error("generator API key is not configured")]
    MissingApiKey,

    #[error("generator rejected the configured API key")]
    InvalidApiKey,

    #[error("generator quota exceeded or payment required")]
    QuotaExceeded,

    #[error("generator rate limit exceeded")]
    RateLimited,

    #[error("generation call exceeded the 30s deadline")]
    Timeout,

    #[error("generator API error: {status} {message}")]
    Upstream { status: u16, message: String },

    #[error("model returned no content")]
    EmptyResponse,

    #[error("failed to call generator API: {0}")]
    Transport(reqwest::Error),
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

#[derive(Debug, Deserialize)]
struct ChatMessage {
    #[serde(default)]
    content: String,
}

/// Thin client for the chat-completion provider. One synchronous call per
/// generation request; no server-side retries, a fresh client request is the
/// retry mechanism.
pub struct GeneratorClient {
    http: Client,
    base_url: String,
    api_key: Option<String>,
    model: String,
}

impl GeneratorClient {
    pub fn new(config: &Config) -> Self {
        Self {
            http: Client::new(),
            base_url: config.generator_base_url.trim_end_matches('/').to_string(),
            api_key: config.generator_api_key.clone(),
            model: config.generator_model.clone(),
        }
    }

    /// Sends one completion request and returns the raw text blob the model
    /// produced. Provider status codes are mapped onto the error taxonomy;
    /// the response is expected to contain a single JSON object but is not
    /// parsed here.
    pub async fn generate(
        &self,
        system_instruction: &str,
        user_prompt: &str,
    ) -> Result<String, GeneratorError> {
        let result = self.call(system_instruction, user_prompt).await;

        let status = if result.is_ok() { "success" } else { "error" };
        GENERATOR_REQUESTS_TOTAL.with_label_values(&[status]).inc();

        result
    }

    async fn call(
        &self,
        system_instruction: &str,
        user_prompt: &str,
    ) -> Result<String, GeneratorError> {
        let api_key = self.api_key.as_ref().ok_or(GeneratorError::MissingApiKey)?;

        let url = format!("{}/chat/completions", self.base_url);
        let body = json!({
            "model": self.model,
            "messages": [
                { "role": "system", "content": system_instruction },
                { "role": "user", "content": user_prompt },
            ],
            "max_tokens": MAX_TOKENS,
            "response_format": { "type": "json_object" },
        });

        tracing::debug!("Calling generator API: {} (model={})", url, self.model);

        let response = self
            .http
            .post(&url)
            .bearer_auth(api_key)
            .json(&body)
            .timeout(GENERATION_TIMEOUT)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    GeneratorError::Timeout
                } else {
                    GeneratorError::Transport(e)
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let message = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            tracing::warn!("Generator API returned {}: {}", status, message);
            return Err(match status {
                StatusCode::UNAUTHORIZED => GeneratorError::InvalidApiKey,
                StatusCode::PAYMENT_REQUIRED => GeneratorError::QuotaExceeded,
                StatusCode::TOO_MANY_REQUESTS => GeneratorError::RateLimited,
                other => GeneratorError::Upstream {
                    status: other.as_u16(),
                    message,
                },
            });
        }

        let completion: ChatCompletionResponse = response.json().await.map_err(|e| {
            if e.is_timeout() {
                GeneratorError::Timeout
            } else {
                GeneratorError::Transport(e)
            }
        })?;

        let content = completion
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content)
            .unwrap_or_default();

        if content.trim().is_empty() {
            return Err(GeneratorError::EmptyResponse);
        }

        tracing::info!("Generator returned {} bytes of content", content.len());
        Ok(content)
    }
}
