//! Grounded answer synthesis.
//!
//! Renders the `rag.answer` prompt over the retrieved context and sends it as
//! a single completion request.

use crate::retriever::RetrievedChunk;
use scholar_core::{AppError, AppResult};
use scholar_llm::{GenerationParams, LlmClient};
use scholar_prompt::{build_prompt, PromptDefinition};
use std::collections::HashMap;
use std::sync::Arc;

/// Answer text used when the model returns nothing.
pub const NO_ANSWER: &str = "No answer generated.";

/// Turns a question and its context into an answer.
pub struct AnswerSynthesizer {
    llm: Arc<dyn LlmClient>,
    params: GenerationParams,
    prompt: PromptDefinition,
}

impl AnswerSynthesizer {
    pub fn new(llm: Arc<dyn LlmClient>, params: GenerationParams, prompt: PromptDefinition) -> Self {
        Self { llm, params, prompt }
    }

    /// Generate an answer grounded in `context`.
    ///
    /// # Errors
    /// * `AppError::Synthesis` - the model backend failed
    /// * `AppError::Prompt` - the answer template could not be rendered
    pub async fn synthesize(&self, question: &str, context: &[RetrievedChunk]) -> AppResult<String> {
        let mut variables = HashMap::new();
        variables.insert("context".to_string(), build_context(context));
        variables.insert("input".to_string(), question.to_string());

        let built = build_prompt(&self.prompt, variables)?;

        tracing::debug!(
            "Generating answer with {} (model: {}, {} context chunks)",
            self.llm.provider_name(),
            self.params.model,
            context.len()
        );

        let response = self
            .llm
            .complete(&self.params.request(built.user))
            .await
            .map_err(into_synthesis_error)?;

        Ok(answer_or_placeholder(response.content))
    }
}

/// Chunk texts joined by blank lines, in retrieval order.
pub fn build_context(context: &[RetrievedChunk]) -> String {
    context
        .iter()
        .map(|c| c.chunk.text.as_str())
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// Whitespace-only output becomes [`NO_ANSWER`].
pub fn answer_or_placeholder(content: String) -> String {
    if content.trim().is_empty() {
        NO_ANSWER.to_string()
    } else {
        content
    }
}

/// Map backend failures to `Synthesis`, leaving other errors as they are.
pub(crate) fn into_synthesis_error(err: AppError) -> AppError {
    match err {
        AppError::Llm(cause) => AppError::Synthesis(cause),
        other => other,
    }
}
