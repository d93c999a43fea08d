//! Scripted LLM client for tests and offline runs.

use crate::client::{LlmClient, LlmRequest, LlmResponse, LlmUsage};
use scholar_core::{AppError, AppResult};
use std::collections::VecDeque;
use std::sync::Mutex;

/// What the mock does when asked for a completion.
#[derive(Debug, Clone)]
enum Behavior {
    /// Reply with fixed text
    Reply(String),
    /// Echo the prompt back
    Echo,
    /// Fail with the given cause
    Fail(String),
}

/// LLM client returning canned completions.
///
/// Scripted replies queued with [`MockLlmClient::then_reply`] are consumed
/// first; afterwards the default behavior applies. Every request is recorded.
#[derive(Debug)]
pub struct MockLlmClient {
    default: Behavior,
    script: Mutex<VecDeque<Behavior>>,
    requests: Mutex<Vec<LlmRequest>>,
}

impl MockLlmClient {
    fn with_default(default: Behavior) -> Self {
        Self {
            default,
            script: Mutex::new(VecDeque::new()),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Always reply with `text`.
    pub fn replying(text: impl Into<String>) -> Self {
        Self::with_default(Behavior::Reply(text.into()))
    }

    /// Reply with the prompt that was sent.
    pub fn echo() -> Self {
        Self::with_default(Behavior::Echo)
    }

    /// Always fail with `cause` as an `AppError::Llm`.
    pub fn failing(cause: impl Into<String>) -> Self {
        Self::with_default(Behavior::Fail(cause.into()))
    }

    /// Queue a one-off reply ahead of the default behavior.
    pub fn then_reply(self, text: impl Into<String>) -> Self {
        self.script
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push_back(Behavior::Reply(text.into()));
        self
    }

    /// Requests received so far, in order.
    pub fn requests(&self) -> Vec<LlmRequest> {
        self.requests
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }
}

#[async_trait::async_trait]
impl LlmClient for MockLlmClient {
    fn provider_name(&self) -> &str {
        "mock"
    }

    async fn complete(&self, request: &LlmRequest) -> AppResult<LlmResponse> {
        self.requests
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(request.clone());

        let behavior = self
            .script
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .pop_front()
            .unwrap_or_else(|| self.default.clone());

        let content = match behavior {
            Behavior::Reply(text) => text,
            Behavior::Echo => request.prompt.clone(),
            Behavior::Fail(cause) => return Err(AppError::Llm(cause)),
        };

        let prompt_tokens = request.prompt.split_whitespace().count() as u32;
        let completion_tokens = content.split_whitespace().count() as u32;

        Ok(LlmResponse {
            content,
            model: request.model.clone(),
            usage: LlmUsage::new(prompt_tokens, completion_tokens),
        })
    }
}
