//! Study aids generated from the session's designated chunk.
//!
//! Each generator sends one fixed instruction plus the first chunk of the
//! session to the model. There is no retrieval step.

use super::synthesizer::into_synthesis_error;
use crate::chunker::Chunk;
use scholar_core::{AppError, AppResult};
use scholar_llm::{GenerationParams, LlmClient};
use scholar_prompt::{
    build_prompt, load_prompt, PromptDefinition, UTILITY_EXPLANATION, UTILITY_MCQS,
    UTILITY_SUMMARY,
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

/// The kinds of study aid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UtilityKind {
    Summary,
    Mcqs,
    Explanation,
}

impl UtilityKind {
    pub const ALL: [UtilityKind; 3] = [Self::Summary, Self::Mcqs, Self::Explanation];

    pub fn parse(s: &str) -> AppResult<Self> {
        match s.to_lowercase().as_str() {
            "summary" => Ok(Self::Summary),
            "mcqs" | "mcq" => Ok(Self::Mcqs),
            "explanation" | "explain" => Ok(Self::Explanation),
            other => Err(AppError::Config(format!(
                "Unknown utility: {}. Supported: summary, mcqs, explanation",
                other
            ))),
        }
    }

    pub fn prompt_id(&self) -> &'static str {
        match self {
            Self::Summary => UTILITY_SUMMARY,
            Self::Mcqs => UTILITY_MCQS,
            Self::Explanation => UTILITY_EXPLANATION,
        }
    }

    /// Heading used when exporting.
    pub fn title(&self) -> &'static str {
        match self {
            Self::Summary => "Document Summary",
            Self::Mcqs => "Practice Questions",
            Self::Explanation => "Topic-wise Explanation",
        }
    }

    /// File name stem used when exporting.
    pub fn file_stem(&self) -> &'static str {
        match self {
            Self::Summary => "summary",
            Self::Mcqs => "mcqs",
            Self::Explanation => "explanation",
        }
    }
}

impl std::fmt::Display for UtilityKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.file_stem())
    }
}

/// Generates every [`UtilityKind`] with one client and parameter set.
pub struct UtilityGenerator {
    llm: Arc<dyn LlmClient>,
    params: GenerationParams,
    prompts: HashMap<UtilityKind, PromptDefinition>,
}

impl UtilityGenerator {
    /// Load the three utility prompts, honouring workspace overrides.
    pub fn new(
        llm: Arc<dyn LlmClient>,
        params: GenerationParams,
        workspace: Option<&Path>,
    ) -> AppResult<Self> {
        let prompts = UtilityKind::ALL
            .iter()
            .map(|kind| Ok((*kind, load_prompt(workspace, kind.prompt_id())?)))
            .collect::<AppResult<HashMap<_, _>>>()?;

        Ok(Self {
            llm,
            params,
            prompts,
        })
    }

    /// Text of the designated chunk: the first one, or empty.
    pub fn designated_input(chunks: &[Chunk]) -> &str {
        chunks.first().map(|c| c.text.as_str()).unwrap_or("")
    }

    /// Generate `kind` from the first of `chunks`. Newlines in the model
    /// output are kept.
    ///
    /// # Errors
    /// * `AppError::Synthesis` - the model backend failed
    pub async fn generate(&self, kind: UtilityKind, chunks: &[Chunk]) -> AppResult<String> {
        let definition = self
            .prompts
            .get(&kind)
            .ok_or_else(|| AppError::Prompt(format!("No prompt loaded for {}", kind)))?;

        let mut variables = HashMap::new();
        variables.insert(
            "input".to_string(),
            Self::designated_input(chunks).to_string(),
        );
        let built = build_prompt(definition, variables)?;

        tracing::info!("Generating {} with model {}", kind, self.params.model);

        let response = self
            .llm
            .complete(&self.params.request(built.user))
            .await
            .map_err(into_synthesis_error)?;

        Ok(response.content)
    }
}
