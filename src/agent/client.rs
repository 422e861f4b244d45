//! Reasoning service client
//!
//! Speaks the OpenAI-compatible chat-completions wire format against an
//! OpenRouter-style endpoint. The base URL is configurable so tests can
//! point at a mock server.

use crate::agent::types::*;
use crate::config::LlmConfig;
use crate::error::{Error, Result};
use reqwest::{header, Client};
use secrecy::ExposeSecret;
use tracing::{debug, info, warn};

/// Chat-completions client for the reasoning service
#[derive(Clone)]
pub struct LlmClient {
    /// HTTP client
    client: Client,
    /// Configuration
    config: LlmConfig,
}

impl LlmClient {
    /// Create a new client
    pub fn new(config: LlmConfig) -> Result<Self> {
        let mut headers = header::HeaderMap::new();
        headers.insert(
            header::AUTHORIZATION,
            header::HeaderValue::from_str(&format!("Bearer {}", config.api_key.expose_secret()))
                .map_err(|e| Error::Config(format!("Invalid API key format: {}", e)))?,
        );

        let client = Client::builder()
            .default_headers(headers)
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(LlmClient { client, config })
    }

    /// Get the default model
    pub fn default_model(&self) -> &str {
        &self.config.default_model
    }

    /// Create a chat completion
    pub async fn chat(
        &self,
        messages: Vec<Message>,
        options: GenerationOptions,
    ) -> Result<ChatCompletionResponse> {
        let request = ChatCompletionRequest {
            model: self.config.default_model.clone(),
            messages,
            max_tokens: options.max_tokens,
            temperature: options.temperature,
            top_p: options.top_p,
            tools: None,
            tool_choice: None,
        };

        self.send_request(request).await
    }

    /// Create a chat completion with tools/functions
    pub async fn chat_with_tools(
        &self,
        messages: Vec<Message>,
        tools: Vec<ToolDefinition>,
        options: GenerationOptions,
    ) -> Result<ChatCompletionResponse> {
        let request = ChatCompletionRequest {
            model: self.config.default_model.clone(),
            messages,
            max_tokens: options.max_tokens,
            temperature: options.temperature,
            top_p: options.top_p,
            tools: Some(tools),
            tool_choice: Some(ToolChoice::Auto("auto".to_string())),
        };

        self.send_request(request).await
    }

    /// Send a request to the chat-completions endpoint
    async fn send_request(&self, request: ChatCompletionRequest) -> Result<ChatCompletionResponse> {
        let url = format!("{}/chat/completions", self.config.base_url);

        debug!("Sending request to reasoning service: model={}", request.model);

        let response = self.client.post(&url).json(&request).send().await?;

        let status = response.status();

        if status.is_success() {
            let body = response.json::<ChatCompletionResponse>().await?;

            if let Some(ref usage) = body.usage {
                info!(
                    "LLM response: model={}, tokens={}",
                    body.model, usage.total_tokens
                );
            }

            Ok(body)
        } else {
            let error_text = response.text().await.unwrap_or_default();

            if status.as_u16() == 429 {
                warn!("Rate limit exceeded: {}", error_text);
                Err(Error::RateLimit(error_text))
            } else if status.as_u16() == 401 {
                Err(Error::Unauthorized("Invalid API key".to_string()))
            } else {
                Err(Error::Llm(format!("API error ({}): {}", status, error_text)))
            }
        }
    }
}
