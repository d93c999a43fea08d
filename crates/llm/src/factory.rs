//! LLM provider factory.
//!
//! This module creates LLM clients based on application configuration.
//! It handles provider resolution and secret injection.

use crate::client::LlmClient;
use crate::providers::GroqClient;
use crate::types::ProviderType;
use scholar_core::{AppError, AppResult};
use std::sync::Arc;

/// Create an LLM client based on the provider name.
///
/// # Arguments
/// * `provider` - Provider identifier ("groq")
/// * `endpoint` - Optional custom endpoint URL
/// * `api_key` - API key (required by "groq")
///
/// # Errors
/// Returns error if:
/// - Provider is unknown (`Config`)
/// - The provider needs a key and none was given (`MissingCredential`)
/// - Client initialization fails (`Llm`)
pub fn create_client(
    provider: &str,
    endpoint: Option<&str>,
    api_key: Option<&str>,
) -> AppResult<Arc<dyn LlmClient>> {
    let provider_type = ProviderType::parse(provider).ok_or_else(|| {
        AppError::Config(format!("Unknown provider: {}. Supported: groq", provider))
    })?;

    match provider_type {
        ProviderType::Groq => {
            let api_key = api_key
                .filter(|key| !key.trim().is_empty())
                .ok_or_else(|| AppError::MissingCredential("GROQ_API_KEY".to_string()))?;
            let client = match endpoint {
                Some(base_url) => GroqClient::with_base_url(base_url, api_key)?,
                None => GroqClient::new(api_key)?,
            };
            tracing::debug!("Created Groq client");
            Ok(Arc::new(client))
        }
    }
}
