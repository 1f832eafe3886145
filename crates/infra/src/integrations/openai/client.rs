//! Chat completions client implementing the `LanguageModel` port.

use async_trait::async_trait;
use reqwest::Method;
use tracing::debug;
use voicecal_core::ports::LanguageModel;
use voicecal_domain::{AssistantError, Result};

use super::types::{ChatCompletionRequest, ChatCompletionResponse, ChatMessage};
use crate::http::HttpClient;

const DEFAULT_MAX_TOKENS: u32 = 512;
const DEFAULT_TEMPERATURE: f32 = 0.3;

/// Client for an OpenAI-compatible chat completions endpoint.
pub struct OpenAiClient {
    http_client: HttpClient,
    api_key: String,
    model: String,
    api_url: String,
}

impl OpenAiClient {
    /// Create a new client.
    ///
    /// # Arguments
    /// * `api_key` - API key for the endpoint (required)
    /// * `model` - model identifier sent with every request
    /// * `api_url` - full chat completions URL
    /// * `http_client` - HTTP client with retry logic
    pub fn new(
        api_key: String,
        model: impl Into<String>,
        api_url: impl Into<String>,
        http_client: HttpClient,
    ) -> Self {
        Self { http_client, api_key, model: model.into(), api_url: api_url.into() }
    }

    async fn call_api(&self, prompt: &str) -> Result<String> {
        let request_payload = ChatCompletionRequest {
            model: self.model.clone(),
            messages: vec![ChatMessage { role: "user".to_string(), content: prompt.to_string() }],
            max_tokens: DEFAULT_MAX_TOKENS,
            temperature: DEFAULT_TEMPERATURE,
        };

        let request_builder = self
            .http_client
            .request(Method::POST, &self.api_url)
            .bearer_auth(&self.api_key)
            .json(&request_payload);

        let response = self.http_client.send(request_builder).await?;
        let status = response.status();
        debug!(status = status.as_u16(), "received chat completion response");

        if !status.is_success() {
            let message = response.text().await.unwrap_or_else(|_| "Unknown error".to_string());
            return Err(match status.as_u16() {
                401 | 403 => AssistantError::Auth(format!("language model rejected API key ({status})")),
                _ => AssistantError::Interpretation(format!(
                    "language model API error ({status}): {message}"
                )),
            });
        }

        let completion: ChatCompletionResponse = response.json().await.map_err(|err| {
            AssistantError::Interpretation(format!("failed to parse completion: {err}"))
        })?;

        let choice = completion.choices.into_iter().next().ok_or_else(|| {
            AssistantError::Interpretation("completion contained no choices".to_string())
        })?;

        Ok(choice.message.content)
    }
}

#[async_trait]
impl LanguageModel for OpenAiClient {
    async fn generate(&self, prompt: &str) -> Result<String> {
        debug!(prompt_len = prompt.len(), model = %self.model, "requesting completion");
        self.call_api(prompt).await
    }
}
