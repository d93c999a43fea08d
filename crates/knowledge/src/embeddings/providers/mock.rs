//! Mock embedding provider for tests.

use crate::embeddings::provider::EmbeddingProvider;
use scholar_core::{AppError, AppResult};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Mock provider for testing.
///
/// Each text maps to a pseudo-random vector seeded from a hash of the text,
/// so equal texts always get equal vectors. Individual texts can be pinned
/// to chosen vectors to set up exact similarity orderings.
#[derive(Debug)]
pub struct MockProvider {
    dimensions: usize,
    pinned: HashMap<String, Vec<f32>>,
    failure: Option<String>,
    calls: AtomicUsize,
}

impl MockProvider {
    pub fn new(dimensions: usize) -> Self {
        Self {
            dimensions,
            pinned: HashMap::new(),
            failure: None,
            calls: AtomicUsize::new(0),
        }
    }

    /// A provider whose every call fails with `cause`.
    pub fn failing(dimensions: usize, cause: impl Into<String>) -> Self {
        Self {
            failure: Some(cause.into()),
            ..Self::new(dimensions)
        }
    }

    /// Return `vector` for `text` instead of the seeded one.
    pub fn with_vector(mut self, text: impl Into<String>, vector: Vec<f32>) -> Self {
        self.pinned.insert(text.into(), vector);
        self
    }

    /// Number of `embed_batch` calls so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn seeded_vector(&self, text: &str) -> Vec<f32> {
        // FNV-1a, then xorshift64 for the components
        let mut state = text
            .bytes()
            .fold(0xcbf2_9ce4_8422_2325u64, |acc, b| {
                (acc ^ b as u64).wrapping_mul(0x0100_0000_01b3)
            })
            .max(1);

        (0..self.dimensions)
            .map(|_| {
                state ^= state << 13;
                state ^= state >> 7;
                state ^= state << 17;
                (state % 2001) as f32 / 1000.0 - 1.0
            })
            .collect()
    }
}

#[async_trait::async_trait]
impl EmbeddingProvider for MockProvider {
    fn provider_name(&self) -> &str {
        "mock"
    }

    fn model_name(&self) -> &str {
        "mock-seeded"
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }

    async fn embed_batch(&self, texts: &[String]) -> AppResult<Vec<Vec<f32>>> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        if let Some(ref cause) = self.failure {
            return Err(AppError::Embedding(cause.clone()));
        }

        Ok(texts
            .iter()
            .map(|text| {
                self.pinned
                    .get(text)
                    .cloned()
                    .unwrap_or_else(|| self.seeded_vector(text))
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_seeded_vectors_are_stable() {
        let provider = MockProvider::new(32);
        let first = provider.embed("same text").await.unwrap();
        let second = provider.embed("same text").await.unwrap();
        let other = provider.embed("other text").await.unwrap();

        assert_eq!(first.len(), 32);
        assert_eq!(first, second);
        assert_ne!(first, other);
        assert!(first.iter().all(|v| (-1.0..=1.0).contains(v)));
    }

    #[tokio::test]
    async fn test_pinned_vector_wins() {
        let provider = MockProvider::new(3).with_vector("x", vec![1.0, 0.0, 0.0]);
        assert_eq!(provider.embed("x").await.unwrap(), vec![1.0, 0.0, 0.0]);
    }

    #[tokio::test]
    async fn test_failing_counts_calls() {
        let provider = MockProvider::failing(3, "offline");
        assert!(provider.embed("x").await.is_err());
        assert_eq!(provider.calls(), 1);
    }
}
