use crate::chunker::ChunkConfig;
use crate::embeddings::providers::{MockProvider, TrigramProvider};
use crate::embeddings::Embedder;
use crate::loader::Document;
use crate::rag::{UtilityKind, NO_ANSWER, UNKNOWN_SOURCE};
use crate::session::{Session, SessionConfig};
use scholar_core::AppError;
use scholar_llm::MockLlmClient;
use std::sync::Arc;
use tempfile::TempDir;

/// `len` characters of readable filler, distinct per `seed`.
fn prose(seed: &str, len: usize) -> String {
    let sentence = format!("{} studies the structure of living cells. ", seed);
    sentence.chars().cycle().take(len).collect()
}

fn trigram_embedder() -> Embedder {
    Embedder::new(Arc::new(TrigramProvider::new(384)))
}

fn three_documents() -> Vec<Document> {
    vec![
        Document::new("uploads/biology.txt", prose("Biology", 2000).into_bytes()),
        Document::new("uploads/chemistry.txt", prose("Chemistry", 1200).into_bytes()),
        Document::new("uploads/physics.txt", prose("Physics", 800).into_bytes()),
    ]
}

#[tokio::test]
async fn test_end_to_end_question() {
    let llm = Arc::new(MockLlmClient::replying("Cells are the unit of life."));
    let session = Session::build(
        three_documents(),
        SessionConfig::default(),
        trigram_embedder(),
        llm.clone(),
    )
    .await
    .unwrap();

    // 2000 chars at 1500/200 gives two windows, the others one each
    assert_eq!(session.chunks().len(), 4);
    assert_eq!(session.index_len(), 4);
    assert_eq!(session.load_report().loaded.len(), 3);

    let answer = session.ask("What is the unit of life?").await.unwrap();
    assert_eq!(answer.text, "Cells are the unit of life.");
    assert_eq!(answer.context.len(), 4);
    assert_eq!(answer.confidence, 0.75);

    let record = answer.to_record("What is the unit of life?");
    assert_eq!(record.confidence_score, "0.75");
    assert!(
        ["biology.txt", "chemistry.txt", "physics.txt"].contains(&record.source_document.as_str()),
        "unexpected source: {}",
        record.source_document
    );

    let requests = llm.requests();
    assert_eq!(requests.len(), 1);
    assert!(requests[0].prompt.contains("Question: What is the unit of life?"));
    assert!(requests[0].prompt.contains("<context>\n"));
}

#[tokio::test]
async fn test_unsupported_file_is_skipped() {
    let mut documents = three_documents();
    documents.push(Document::new("data.xyz", b"opaque".to_vec()));

    let session = Session::build(
        documents,
        SessionConfig::default(),
        trigram_embedder(),
        Arc::new(MockLlmClient::replying("ok")),
    )
    .await
    .unwrap();

    let report = session.load_report();
    assert_eq!(report.loaded.len(), 3);
    assert_eq!(report.skipped.len(), 1);
    assert_eq!(report.skipped[0].filename, "data.xyz");
    assert_eq!(session.chunks().len(), 4);
}

#[tokio::test]
async fn test_only_unsupported_files_is_no_documents() {
    let result = Session::build(
        vec![Document::new("data.xyz", b"opaque".to_vec())],
        SessionConfig::default(),
        trigram_embedder(),
        Arc::new(MockLlmClient::replying("ok")),
    )
    .await;

    assert!(matches!(result, Err(AppError::NoDocuments)));
}

#[tokio::test]
async fn test_empty_upload_is_no_documents() {
    let provider = Arc::new(MockProvider::new(8));
    let result = Session::build(
        Vec::new(),
        SessionConfig::default(),
        Embedder::new(provider.clone()),
        Arc::new(MockLlmClient::replying("ok")),
    )
    .await;

    assert!(matches!(result, Err(AppError::NoDocuments)));
    assert_eq!(provider.calls(), 0);
}

#[tokio::test]
async fn test_invalid_chunking_fails_before_loading() {
    let provider = Arc::new(MockProvider::new(8));
    let config = SessionConfig {
        chunking: ChunkConfig {
            chunk_size: 500,
            chunk_overlap: 500,
        },
        ..SessionConfig::default()
    };

    let result = Session::build(
        three_documents(),
        config,
        Embedder::new(provider.clone()),
        Arc::new(MockLlmClient::replying("ok")),
    )
    .await;

    assert!(matches!(result, Err(AppError::Config(_))));
    assert_eq!(provider.calls(), 0);
}

#[tokio::test]
async fn test_zero_top_k_fails_before_loading() {
    let provider = Arc::new(MockProvider::new(8));
    let config = SessionConfig {
        top_k: 0,
        ..SessionConfig::default()
    };

    let result = Session::build(
        three_documents(),
        config,
        Embedder::new(provider.clone()),
        Arc::new(MockLlmClient::replying("ok")),
    )
    .await;

    assert!(matches!(result, Err(AppError::Config(_))));
    assert_eq!(provider.calls(), 0);
}

#[tokio::test]
async fn test_embedding_failure_aborts_build() {
    let result = Session::build(
        three_documents(),
        SessionConfig::default(),
        Embedder::new(Arc::new(MockProvider::failing(8, "backend down"))),
        Arc::new(MockLlmClient::replying("ok")),
    )
    .await;

    assert!(matches!(result, Err(AppError::Embedding(_))));
}

#[tokio::test]
async fn test_blank_model_output_becomes_placeholder() {
    let session = Session::build(
        three_documents(),
        SessionConfig::default(),
        trigram_embedder(),
        Arc::new(MockLlmClient::replying("  \n ")),
    )
    .await
    .unwrap();

    let answer = session.ask("Anything?").await.unwrap();
    assert_eq!(answer.text, NO_ANSWER);
    assert_eq!(answer.context.len(), 4);
}

#[tokio::test]
async fn test_model_failure_is_synthesis_error() {
    let session = Session::build(
        three_documents(),
        SessionConfig::default(),
        trigram_embedder(),
        Arc::new(MockLlmClient::failing("rate limited")),
    )
    .await
    .unwrap();

    let result = session.ask("Anything?").await;
    assert!(matches!(result, Err(AppError::Synthesis(_))));
}

#[tokio::test]
async fn test_small_top_k_raises_confidence() {
    let config = SessionConfig {
        top_k: 2,
        ..SessionConfig::default()
    };
    let session = Session::build(
        three_documents(),
        config,
        trigram_embedder(),
        Arc::new(MockLlmClient::replying("ok")),
    )
    .await
    .unwrap();

    let answer = session.ask("cells").await.unwrap();
    assert_eq!(answer.context.len(), 2);
    assert_eq!(answer.confidence, 0.85);
    assert_ne!(answer.source, UNKNOWN_SOURCE);
}

#[tokio::test]
async fn test_generate_uses_first_chunk() {
    let llm = Arc::new(MockLlmClient::echo());
    let session = Session::build(
        three_documents(),
        SessionConfig::default(),
        trigram_embedder(),
        llm.clone(),
    )
    .await
    .unwrap();

    let first = session.chunks()[0].text.clone();
    let summary = session.generate(UtilityKind::Summary).await.unwrap();

    assert_eq!(
        summary,
        format!("Summarize the following academic content clearly:\n{}", first)
    );
    assert!(first.starts_with("Biology"));
}

#[tokio::test]
async fn test_workspace_prompt_override() {
    let workspace = TempDir::new().unwrap();
    let prompts = workspace.path().join(".scholar").join("prompts");
    std::fs::create_dir_all(&prompts).unwrap();
    std::fs::write(
        prompts.join("utility.summary.yml"),
        "id: utility.summary\n\
         title: Short summary\n\
         apiVersion: \"1.0\"\n\
         variables:\n  - input\n\
         template: \"In one line: {{input}}\"\n\
         output:\n  format: text\n",
    )
    .unwrap();

    let config = SessionConfig {
        workspace: Some(workspace.path().to_path_buf()),
        ..SessionConfig::default()
    };
    let session = Session::build(
        vec![Document::new("note.txt", b"Mitochondria make ATP.".to_vec())],
        config,
        trigram_embedder(),
        Arc::new(MockLlmClient::echo()),
    )
    .await
    .unwrap();

    let summary = session.generate(UtilityKind::Summary).await.unwrap();
    assert_eq!(summary, "In one line: Mitochondria make ATP.");

    // Untouched prompts still come from the built-ins
    let mcqs = session.generate(UtilityKind::Mcqs).await.unwrap();
    assert!(mcqs.starts_with("Generate 3 MCQs"));
}

#[tokio::test]
async fn test_sessions_are_independent() {
    let llm = Arc::new(MockLlmClient::replying("ok"));
    let first = Session::build(
        three_documents(),
        SessionConfig::default(),
        trigram_embedder(),
        llm.clone(),
    )
    .await
    .unwrap();
    let second = Session::build(
        vec![Document::new("single.txt", b"Only one chunk here.".to_vec())],
        SessionConfig::default(),
        trigram_embedder(),
        llm,
    )
    .await
    .unwrap();

    assert_ne!(first.id(), second.id());
    assert_eq!(first.chunks().len(), 4);
    assert_eq!(second.chunks().len(), 1);

    let answer = second.ask("What is here?").await.unwrap();
    assert_eq!(answer.context.len(), 1);
    assert_eq!(answer.source, "single.txt");
    assert_eq!(answer.confidence, 0.9);
}
