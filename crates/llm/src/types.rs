//! LLM configuration types.
//!
//! `GenerationParams` is the per-session model configuration applied to
//! every answer and utility request.

use crate::client::LlmRequest;
use scholar_core::config::{validate_generation, LlmSettings};
use scholar_core::AppResult;
use serde::{Deserialize, Serialize};

/// Model identifier and sampling parameters for a session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationParams {
    /// Model identifier from the supported allow-list
    pub model: String,

    /// Sampling temperature in [0, 1]
    pub temperature: f32,

    /// Maximum output tokens in [512, 8192]
    pub max_tokens: u32,
}

impl GenerationParams {
    /// Create validated generation parameters.
    pub fn new(model: impl Into<String>, temperature: f32, max_tokens: u32) -> AppResult<Self> {
        let params = Self {
            model: model.into(),
            temperature,
            max_tokens,
        };
        params.validate()?;
        Ok(params)
    }

    /// Build validated parameters from application settings.
    pub fn from_settings(settings: &LlmSettings) -> AppResult<Self> {
        Self::new(settings.model.clone(), settings.temperature, settings.max_tokens)
    }

    /// Check the model against the allow-list and the numeric ranges.
    pub fn validate(&self) -> AppResult<()> {
        validate_generation(&self.model, self.temperature, self.max_tokens)
    }

    /// Build a request for `prompt` carrying these parameters.
    pub fn request(&self, prompt: impl Into<String>) -> LlmRequest {
        LlmRequest::new(prompt, &self.model)
            .with_temperature(self.temperature)
            .with_max_tokens(self.max_tokens)
    }
}

impl Default for GenerationParams {
    fn default() -> Self {
        let settings = LlmSettings::default();
        Self {
            model: settings.model,
            temperature: settings.temperature,
            max_tokens: settings.max_tokens,
        }
    }
}

/// Provider type enum for matching.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderType {
    Groq,
}

impl ProviderType {
    /// Parse provider type from string.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "groq" => Some(Self::Groq),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provider_type_parsing() {
        assert_eq!(ProviderType::parse("groq"), Some(ProviderType::Groq));
        assert_eq!(ProviderType::parse("GROQ"), Some(ProviderType::Groq));
        assert_eq!(ProviderType::parse("mock"), None);
        assert_eq!(ProviderType::parse("openai"), None);
    }

    #[test]
    fn test_default_params_are_valid() {
        let params = GenerationParams::default();
        assert_eq!(params.model, "llama3-70b-8192");
        assert_eq!(params.temperature, 0.5);
        assert_eq!(params.max_tokens, 3072);
        assert!(params.validate().is_ok());
    }

    #[test]
    fn test_params_reject_out_of_range() {
        assert!(GenerationParams::new("mixtral-8x22b", 1.5, 1024).is_err());
        assert!(GenerationParams::new("mixtral-8x22b", 0.5, 10_000).is_err());
        assert!(GenerationParams::new("llama2", 0.5, 1024).is_err());
    }

    #[test]
    fn test_request_carries_params() {
        let params = GenerationParams::new("llama3-8b-8192", 0.25, 2048).unwrap();
        let request = params.request("Summarize this");
        assert_eq!(request.model, "llama3-8b-8192");
        assert_eq!(request.temperature, Some(0.25));
        assert_eq!(request.max_tokens, Some(2048));
    }
}
