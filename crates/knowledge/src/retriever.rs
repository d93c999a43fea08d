//! Question-to-context retrieval.

use crate::chunker::Chunk;
use crate::embeddings::Embedder;
use crate::vector_index::VectorIndex;
use scholar_core::{AppError, AppResult};
use serde::{Deserialize, Serialize};

/// A chunk selected as context, with its similarity score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RetrievedChunk {
    pub chunk: Chunk,
    pub score: f32,
}

/// Retrieves the chunks most similar to a question.
pub struct Retriever<'a> {
    embedder: &'a Embedder,
    index: &'a dyn VectorIndex,
    chunks: &'a [Chunk],
}

impl<'a> Retriever<'a> {
    /// `index` must hold one vector per element of `chunks`, in order.
    pub fn new(embedder: &'a Embedder, index: &'a dyn VectorIndex, chunks: &'a [Chunk]) -> Self {
        Self {
            embedder,
            index,
            chunks,
        }
    }

    /// Return up to `top_k` chunks by decreasing similarity.
    ///
    /// An empty index yields an empty context without embedding the question.
    pub async fn retrieve(&self, question: &str, top_k: usize) -> AppResult<Vec<RetrievedChunk>> {
        if self.index.is_empty() {
            tracing::debug!("Index is empty, no context to retrieve");
            return Ok(Vec::new());
        }

        let query = self.embedder.embed_query(question).await?;
        let hits = self.index.search(&query, top_k)?;

        let context = hits
            .into_iter()
            .map(|hit| {
                self.chunks
                    .get(hit.index)
                    .map(|chunk| RetrievedChunk {
                        chunk: chunk.clone(),
                        score: hit.score,
                    })
                    .ok_or_else(|| {
                        AppError::Other(format!(
                            "Index entry {} has no chunk ({} chunks)",
                            hit.index,
                            self.chunks.len()
                        ))
                    })
            })
            .collect::<AppResult<Vec<_>>>()?;

        tracing::info!(
            "Retrieved {} chunks (max score: {:.3})",
            context.len(),
            context.first().map(|c| c.score).unwrap_or(0.0)
        );

        Ok(context)
    }
}
