//! Document question answering over uploaded files.
//!
//! The build phase turns documents into an in-memory index:
//! loader → chunker → embeddings → vector index. The query phase answers
//! over it: retriever → synthesizer → confidence. A [`Session`] owns one run
//! of both and is rebuilt from scratch for every new set of documents.
//!
//! # Example
//! ```no_run
//! use scholar_knowledge::embeddings::{providers::TrigramProvider, Embedder};
//! use scholar_knowledge::{Document, Session, SessionConfig};
//! use scholar_llm::MockLlmClient;
//! use std::sync::Arc;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let documents = vec![Document::new("notes.txt", b"Cells divide by mitosis.".to_vec())];
//! let embedder = Embedder::new(Arc::new(TrigramProvider::new(384)));
//! let llm = Arc::new(MockLlmClient::replying("By mitosis."));
//!
//! let session = Session::build(documents, SessionConfig::default(), embedder, llm).await?;
//! let answer = session.ask("How do cells divide?").await?;
//! println!("{}", answer.text);
//! # Ok(())
//! # }
//! ```

pub mod chunker;
pub mod embeddings;
pub mod export;
pub mod loader;
pub mod rag;
pub mod retriever;
pub mod session;
pub mod vector_index;

#[cfg(test)]
mod tests;

// Re-export commonly used types
pub use chunker::{Chunk, ChunkConfig};
pub use loader::{Document, DocumentKind, LoadReport, SourceMetadata, TextSegment};
pub use rag::{Answer, AnswerRecord, UtilityKind};
pub use retriever::RetrievedChunk;
pub use session::{Session, SessionConfig};
pub use vector_index::{FlatIndex, Metric, SearchHit, VectorIndex};
