//! Command handlers for the Scholar CLI.
//!
//! Both commands share the same pre-flight and session setup.

pub mod ask;
pub mod study;

pub use ask::AskCommand;
pub use study::StudyCommand;

use scholar_core::{config::AppConfig, AppError, AppResult};
use scholar_knowledge::embeddings::{create_provider, Embedder};
use scholar_knowledge::{Document, Session, SessionConfig};
use scholar_llm::create_client;
use std::path::{Path, PathBuf};

/// Resolve the credential, read `files` and build a session over them.
///
/// The credential is checked before any file is opened.
pub async fn open_session(config: &AppConfig, files: &[PathBuf]) -> AppResult<Session> {
    let api_key = config.resolve_api_key()?;
    let llm = create_client(
        &config.llm.provider,
        config.llm.endpoint.as_deref(),
        Some(&api_key),
    )?;

    let documents = read_documents(files)?;

    let provider = create_provider(&config.embedding).await?;
    let embedder = Embedder::new(provider).with_batch_size(config.embedding.batch_size);

    let session =
        Session::build(documents, SessionConfig::from_app_config(config)?, embedder, llm).await?;

    let report = session.load_report();
    for skipped in &report.skipped {
        eprintln!("Skipped {}: {}", skipped.filename, skipped.reason);
    }
    tracing::info!(
        "Loaded {} file(s) into {} segment(s)",
        report.loaded.len(),
        report.segment_count()
    );

    Ok(session)
}

/// Read each path into a [`Document`].
///
/// Unreadable paths are skipped with a warning; it is an error only when
/// none can be read.
pub fn read_documents(files: &[PathBuf]) -> AppResult<Vec<Document>> {
    let mut documents = Vec::with_capacity(files.len());

    for path in files {
        match Document::read(path) {
            Ok(document) => documents.push(document),
            Err(e) => {
                let err = AppError::load(path.display().to_string(), e.to_string());
                tracing::warn!("Skipping file: {}", err);
            }
        }
    }

    if documents.is_empty() {
        return Err(AppError::NoDocuments);
    }

    Ok(documents)
}

/// Write `body` for `kind` under `dir` and report the path on stderr.
pub fn export(dir: &Path, kind: scholar_knowledge::UtilityKind, body: &str) -> AppResult<()> {
    let path = scholar_knowledge::export::write_artifact(dir, kind, body)?;
    eprintln!("Saved {} to {}", kind, path.display());
    Ok(())
}
