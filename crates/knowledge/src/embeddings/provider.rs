//! Embedding provider trait and factory.

use super::providers::{mock::MockProvider, ollama::OllamaProvider, trigram::TrigramProvider};
use scholar_core::config::EmbeddingSettings;
use scholar_core::{AppError, AppResult};
use std::sync::Arc;

/// Trait for embedding providers.
///
/// Implementations must be deterministic: the same text always maps to the
/// same vector.
#[async_trait::async_trait]
pub trait EmbeddingProvider: Send + Sync + std::fmt::Debug {
    /// Get provider name (e.g., "ollama", "trigram", "mock")
    fn provider_name(&self) -> &str;

    /// Get model identifier
    fn model_name(&self) -> &str;

    /// Get embedding dimensions
    fn dimensions(&self) -> usize;

    /// Generate embeddings for multiple texts in a batch.
    async fn embed_batch(&self, texts: &[String]) -> AppResult<Vec<Vec<f32>>>;

    /// Generate embedding for a single text (convenience method).
    async fn embed(&self, text: &str) -> AppResult<Vec<f32>> {
        let mut results = self.embed_batch(&[text.to_string()]).await?;
        results
            .pop()
            .ok_or_else(|| AppError::Embedding("No embedding returned".to_string()))
    }
}

/// Create an embedding provider based on configuration.
///
/// The Ollama provider checks that the server is reachable and that the
/// model returns vectors of the configured dimension.
pub async fn create_provider(settings: &EmbeddingSettings) -> AppResult<Arc<dyn EmbeddingProvider>> {
    match settings.provider.as_str() {
        "ollama" => {
            let provider = OllamaProvider::new(settings)?;
            provider.verify_connection().await?;
            Ok(Arc::new(provider))
        }

        "trigram" => Ok(Arc::new(TrigramProvider::new(settings.dimensions))),

        "mock" => Ok(Arc::new(MockProvider::new(settings.dimensions))),

        _ => Err(AppError::Config(format!(
            "Unknown embedding provider: '{}'. Supported providers: ollama, trigram, mock",
            settings.provider
        ))),
    }
}
