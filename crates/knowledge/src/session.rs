//! Session orchestration.
//!
//! A [`Session`] owns everything built from one set of uploads: the chunk
//! sequence, the vector index and the backends that answer over them.
//! Nothing is shared between sessions and nothing outlives the value.

use crate::chunker::{chunk_segments, Chunk, ChunkConfig};
use crate::embeddings::Embedder;
use crate::loader::{load_documents, Document, LoadReport};
use crate::rag::{
    attribute_source, estimate_confidence, Answer, AnswerSynthesizer, UtilityGenerator,
    UtilityKind,
};
use crate::retriever::Retriever;
use crate::vector_index::{FlatIndex, Metric, VectorIndex, DEFAULT_TOP_K};
use scholar_core::{AppConfig, AppError, AppResult};
use scholar_llm::{GenerationParams, LlmClient};
use scholar_prompt::{load_prompt, RAG_ANSWER};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;
use tracing::Instrument;
use uuid::Uuid;

/// Settings fixed for the lifetime of a session.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    pub chunking: ChunkConfig,
    pub top_k: usize,
    pub metric: Metric,
    pub params: GenerationParams,
    /// Workspace whose `.scholar/prompts/` may override built-in prompts
    pub workspace: Option<PathBuf>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            chunking: ChunkConfig::default(),
            top_k: DEFAULT_TOP_K,
            metric: Metric::Cosine,
            params: GenerationParams::default(),
            workspace: None,
        }
    }
}

impl SessionConfig {
    /// Derive session settings from the application config.
    pub fn from_app_config(config: &AppConfig) -> AppResult<Self> {
        Ok(Self {
            chunking: ChunkConfig::from_settings(&config.chunking)?,
            top_k: config.retrieval.top_k,
            metric: Metric::parse(&config.retrieval.metric)?,
            params: GenerationParams::from_settings(&config.llm)?,
            workspace: Some(config.workspace.clone()),
        })
    }

    pub fn validate(&self) -> AppResult<()> {
        if self.top_k == 0 {
            return Err(AppError::Config("top_k must be at least 1".to_string()));
        }
        self.chunking.validate()?;
        self.params.validate()
    }
}

/// One interaction's documents, index and backends.
pub struct Session {
    id: Uuid,
    span: tracing::Span,
    chunks: Vec<Chunk>,
    index: FlatIndex,
    embedder: Embedder,
    synthesizer: AnswerSynthesizer,
    utilities: UtilityGenerator,
    top_k: usize,
    report: LoadReport,
}

impl Session {
    /// Run the build phase: load, chunk, embed and index `documents`.
    ///
    /// # Errors
    /// * `AppError::Config` - invalid chunking or generation settings
    /// * `AppError::NoDocuments` - no document produced any text
    /// * `AppError::Embedding` - the embedding backend failed; no index is kept
    pub async fn build(
        documents: Vec<Document>,
        config: SessionConfig,
        embedder: Embedder,
        llm: Arc<dyn LlmClient>,
    ) -> AppResult<Self> {
        let id = Uuid::new_v4();
        let span = tracing::info_span!("session", id = %id);

        Self::build_in_span(id, documents, config, embedder, llm)
            .instrument(span)
            .await
    }

    async fn build_in_span(
        id: Uuid,
        documents: Vec<Document>,
        config: SessionConfig,
        embedder: Embedder,
        llm: Arc<dyn LlmClient>,
    ) -> AppResult<Self> {
        config.validate()?;

        let workspace = config.workspace.as_deref();
        let answer_prompt = load_prompt(workspace, RAG_ANSWER)?;
        let utilities = UtilityGenerator::new(llm.clone(), config.params.clone(), workspace)?;

        tracing::info!("Building session from {} document(s)", documents.len());

        let (segments, report) = load_documents(documents)?;
        let chunks = chunk_segments(&segments, &config.chunking);
        drop(segments);

        let vectors = embedder.embed_chunks(&chunks).await?;
        let mut index = FlatIndex::new(config.metric);
        index.build(vectors)?;

        tracing::info!(
            "Session ready: {} chunks indexed with {:?}",
            chunks.len(),
            config.metric
        );

        Ok(Self {
            id,
            span: tracing::Span::current(),
            chunks,
            index,
            embedder,
            synthesizer: AnswerSynthesizer::new(llm, config.params, answer_prompt),
            utilities,
            top_k: config.top_k,
            report,
        })
    }

    /// Answer a question from the indexed documents.
    ///
    /// Elapsed time covers retrieval and synthesis.
    ///
    /// # Errors
    /// * `AppError::Embedding` - the question could not be embedded
    /// * `AppError::Synthesis` - the model backend failed
    pub async fn ask(&self, question: &str) -> AppResult<Answer> {
        self.answer(question).instrument(self.span.clone()).await
    }

    async fn answer(&self, question: &str) -> AppResult<Answer> {
        tracing::info!("Answering question ({} chars)", question.chars().count());
        let started = Instant::now();

        let context = Retriever::new(&self.embedder, &self.index, &self.chunks)
            .retrieve(question, self.top_k)
            .await?;
        let text = self.synthesizer.synthesize(question, &context).await?;

        let elapsed = started.elapsed();
        let confidence = estimate_confidence(context.len());
        let source = attribute_source(&context);

        tracing::info!(
            "Answer generated in {:.2}s (confidence: {}, source: {})",
            elapsed.as_secs_f64(),
            confidence,
            source
        );

        Ok(Answer {
            text,
            context,
            confidence,
            source,
            elapsed,
        })
    }

    /// Generate a study aid from the first chunk.
    pub async fn generate(&self, kind: UtilityKind) -> AppResult<String> {
        self.utilities
            .generate(kind, &self.chunks)
            .instrument(self.span.clone())
            .await
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Chunks in positional order.
    pub fn chunks(&self) -> &[Chunk] {
        &self.chunks
    }

    pub fn load_report(&self) -> &LoadReport {
        &self.report
    }

    pub fn index_len(&self) -> usize {
        self.index.len()
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("id", &self.id)
            .field("chunks", &self.chunks.len())
            .field("top_k", &self.top_k)
            .finish_non_exhaustive()
    }
}
