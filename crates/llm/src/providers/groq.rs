//! Groq LLM provider implementation.
//!
//! Groq serves an OpenAI-compatible chat completions API.
//! Groq API: https://console.groq.com/docs/api-reference

use crate::client::{LlmClient, LlmRequest, LlmResponse, LlmUsage};
use scholar_core::{AppError, AppResult};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Default Groq API base URL.
pub const DEFAULT_GROQ_URL: &str = "https://api.groq.com/openai/v1";

/// Request timeout in seconds
const REQUEST_TIMEOUT_SECS: u64 = 120;

/// Chat completions request format.
#[derive(Debug, Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
    stream: bool,
}

#[derive(Debug, Serialize, Deserialize)]
struct ChatMessage {
    role: String,
    #[serde(default)]
    content: Option<String>,
}

/// Chat completions response format.
#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    model: String,
    #[serde(default)]
    choices: Vec<ChatChoice>,
    #[serde(default)]
    usage: Option<ChatUsage>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

#[derive(Debug, Deserialize)]
struct ChatUsage {
    #[serde(default)]
    prompt_tokens: u32,
    #[serde(default)]
    completion_tokens: u32,
}

/// Error body returned by the API.
#[derive(Debug, Deserialize)]
struct ErrorResponse {
    error: ErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ErrorDetail {
    message: String,
}

/// Groq LLM client.
pub struct GroqClient {
    /// Base URL for the chat completions API
    base_url: String,

    /// Bearer token
    api_key: String,

    /// HTTP client
    client: reqwest::Client,
}

impl GroqClient {
    /// Create a new Groq client with the default base URL.
    pub fn new(api_key: impl Into<String>) -> AppResult<Self> {
        Self::with_base_url(DEFAULT_GROQ_URL, api_key)
    }

    /// Create a new Groq client with a custom base URL.
    pub fn with_base_url(base_url: impl Into<String>, api_key: impl Into<String>) -> AppResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .map_err(|e| AppError::Llm(format!("Failed to create HTTP client for Groq: {}", e)))?;

        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
            client,
        })
    }

    /// Convert LlmRequest to the chat completions format.
    fn to_chat_request(&self, request: &LlmRequest) -> ChatRequest {
        ChatRequest {
            model: request.model.clone(),
            messages: vec![ChatMessage {
                role: "user".to_string(),
                content: Some(request.prompt.clone()),
            }],
            temperature: request.temperature,
            max_tokens: request.max_tokens,
            stream: false,
        }
    }

    /// Convert a chat completions response to LlmResponse.
    ///
    /// A missing choice or a null message content becomes an empty string.
    fn convert_response(&self, response: ChatResponse) -> LlmResponse {
        let usage = response
            .usage
            .map(|u| LlmUsage::new(u.prompt_tokens, u.completion_tokens))
            .unwrap_or_default();

        let content = response
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .unwrap_or_default();

        LlmResponse {
            content,
            model: response.model,
            usage,
        }
    }
}

/// Describe a non-success status in terms a user can act on.
fn describe_status(status: reqwest::StatusCode, detail: &str) -> String {
    let hint = match status.as_u16() {
        401 | 403 => "authentication failed, check your API key",
        404 => "model or endpoint not found",
        429 => "rate limit exceeded, try again later",
        500..=599 => "service unavailable",
        _ => "request rejected",
    };
    format!("Groq API error ({}): {}: {}", status, hint, detail)
}

#[async_trait::async_trait]
impl LlmClient for GroqClient {
    fn provider_name(&self) -> &str {
        "groq"
    }

    async fn complete(&self, request: &LlmRequest) -> AppResult<LlmResponse> {
        tracing::info!("Sending completion request to Groq (model: {})", request.model);
        tracing::debug!("Prompt length: {} chars", request.prompt.len());

        let chat_request = self.to_chat_request(request);
        let url = format!("{}/chat/completions", self.base_url);

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&chat_request)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    AppError::Llm(format!("Groq request timed out: {}", e))
                } else {
                    AppError::Llm(format!("Failed to send request to Groq: {}", e))
                }
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            let detail = serde_json::from_str::<ErrorResponse>(&error_text)
                .map(|body| body.error.message)
                .unwrap_or(error_text);
            return Err(AppError::Llm(describe_status(status, &detail)));
        }

        let chat_response: ChatResponse = response
            .json()
            .await
            .map_err(|e| AppError::Llm(format!("Failed to parse Groq response: {}", e)))?;

        let converted = self.convert_response(chat_response);

        tracing::info!(
            "Received completion from Groq ({} tokens)",
            converted.usage.total_tokens
        );

        Ok(converted)
    }
}
