//! Embedding engine for document chunks.
//!
//! Provides provider-agnostic embedding generation. The [`Embedder`] checks
//! every provider response for count and dimension before it reaches the
//! index.

pub mod provider;
pub mod providers;

pub use provider::{create_provider, EmbeddingProvider};

use crate::chunker::Chunk;
use scholar_core::{AppError, AppResult};
use std::sync::Arc;

/// Default number of texts per provider request.
pub const DEFAULT_BATCH_SIZE: usize = 32;

/// Embeds chunks and queries through a single provider.
#[derive(Debug, Clone)]
pub struct Embedder {
    provider: Arc<dyn EmbeddingProvider>,
    batch_size: usize,
}

impl Embedder {
    pub fn new(provider: Arc<dyn EmbeddingProvider>) -> Self {
        Self {
            provider,
            batch_size: DEFAULT_BATCH_SIZE,
        }
    }

    /// Set the batch size. Zero is treated as one.
    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size.max(1);
        self
    }

    pub fn dimensions(&self) -> usize {
        self.provider.dimensions()
    }

    /// Embed multiple texts, in order.
    pub async fn embed_texts(&self, texts: &[String]) -> AppResult<Vec<Vec<f32>>> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        tracing::info!(
            "Embedding {} texts using provider '{}' (model: {})",
            texts.len(),
            self.provider.provider_name(),
            self.provider.model_name()
        );

        let mut embeddings = Vec::with_capacity(texts.len());
        for batch in texts.chunks(self.batch_size) {
            let vectors = self.provider.embed_batch(batch).await?;
            if vectors.len() != batch.len() {
                return Err(AppError::Embedding(format!(
                    "Provider '{}' returned {} vectors for {} texts",
                    self.provider.provider_name(),
                    vectors.len(),
                    batch.len()
                )));
            }
            for vector in &vectors {
                self.check_dimensions(vector)?;
            }
            embeddings.extend(vectors);
        }

        tracing::debug!(
            "Generated {} embeddings of dimension {}",
            embeddings.len(),
            self.provider.dimensions()
        );

        Ok(embeddings)
    }

    /// Embed chunks (extracts text from Chunk structs).
    pub async fn embed_chunks(&self, chunks: &[Chunk]) -> AppResult<Vec<Vec<f32>>> {
        let texts: Vec<String> = chunks.iter().map(|c| c.text.clone()).collect();
        self.embed_texts(&texts).await
    }

    /// Embed a question.
    pub async fn embed_query(&self, query: &str) -> AppResult<Vec<f32>> {
        let vector = self.provider.embed(query).await?;
        self.check_dimensions(&vector)?;
        Ok(vector)
    }

    fn check_dimensions(&self, vector: &[f32]) -> AppResult<()> {
        if vector.len() != self.provider.dimensions() {
            return Err(AppError::Embedding(format!(
                "Provider '{}' returned a {}-dimensional vector, expected {}",
                self.provider.provider_name(),
                vector.len(),
                self.provider.dimensions()
            )));
        }
        Ok(())
    }
}
