//! `OpenAI` chat completions client.

use std::sync::Arc;

use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderValue};
use secrecy::ExposeSecret;
use tracing::instrument;

use crate::config::OpenAIConfig;

use super::error::{ApiErrorResponse, OpenAiError};
use super::types::{ChatMessage, ChatRequest, ChatResponse};

/// `OpenAI` chat completions client.
///
/// One user-role message per call, no streaming and no retries.
#[derive(Clone)]
pub struct ChatClient {
    inner: Arc<ChatClientInner>,
}

struct ChatClientInner {
    client: reqwest::Client,
    endpoint: String,
    model: String,
}

impl ChatClient {
    /// Create a new chat client.
    ///
    /// # Arguments
    ///
    /// * `config` - `OpenAI` configuration containing API key, model and base URL
    ///
    /// # Errors
    ///
    /// Returns `OpenAiError::InvalidApiKey` if the key contains invalid header
    /// characters, or `OpenAiError::Http` if the HTTP client cannot be built.
    pub fn new(config: &OpenAIConfig) -> Result<Self, OpenAiError> {
        let mut authorization =
            HeaderValue::from_str(&format!("Bearer {}", config.api_key.expose_secret()))
                .map_err(|e| OpenAiError::InvalidApiKey(e.to_string()))?;
        authorization.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(AUTHORIZATION, authorization);

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .build()?;

        Ok(Self {
            inner: Arc::new(ChatClientInner {
                client,
                endpoint: format!("{}/chat/completions", config.base_url),
                model: config.model.clone(),
            }),
        })
    }

    /// Model requests are sent with.
    #[must_use]
    pub fn model(&self) -> &str {
        &self.inner.model
    }

    /// Send a single user message and return the first choice's text.
    ///
    /// Returns an empty string when the response has no choices or the first
    /// choice has no content.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails or returns an error response.
    #[instrument(skip(self, prompt), fields(model = %self.inner.model, prompt_len = prompt.len()))]
    pub async fn complete(&self, prompt: String) -> Result<String, OpenAiError> {
        let request = ChatRequest {
            model: self.inner.model.clone(),
            messages: vec![ChatMessage::user(prompt)],
        };

        let response = self
            .inner
            .client
            .post(&self.inner.endpoint)
            .json(&request)
            .send()
            .await?;

        let response = self.handle_response(response).await?;
        Ok(response.into_text())
    }

    /// Handle a successful response.
    async fn handle_response(
        &self,
        response: reqwest::Response,
    ) -> Result<ChatResponse, OpenAiError> {
        let status = response.status();

        if status.is_success() {
            let body = response.text().await?;
            serde_json::from_str(&body)
                .map_err(|e| OpenAiError::Parse(format!("Failed to parse response: {e}")))
        } else {
            Err(self.handle_error_status(status, response).await)
        }
    }

    /// Handle an error status code.
    async fn handle_error_status(
        &self,
        status: reqwest::StatusCode,
        response: reqwest::Response,
    ) -> OpenAiError {
        // Check for rate limiting
        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            let retry_after = response
                .headers()
                .get("Retry-After")
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.parse().ok())
                .unwrap_or(60);
            return OpenAiError::RateLimited(retry_after);
        }

        // Check for unauthorized
        if status == reqwest::StatusCode::UNAUTHORIZED {
            return OpenAiError::Unauthorized("Invalid API key".to_string());
        }

        // Try to parse API error response
        match response.text().await {
            Ok(body) => match serde_json::from_str::<ApiErrorResponse>(&body) {
                Ok(api_error) => OpenAiError::Api {
                    error_type: api_error
                        .error
                        .error_type
                        .unwrap_or_else(|| status.to_string()),
                    message: api_error.error.message,
                },
                Err(_) => OpenAiError::Api {
                    error_type: status.to_string(),
                    message: body,
                },
            },
            Err(e) => OpenAiError::Http(e),
        }
    }
}
