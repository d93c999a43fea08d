//! Error types for the Scholar assistant.
//!
//! This module defines a unified error enum that covers every failure the
//! document pipeline can surface: pre-flight credential checks, per-file
//! loading problems, embedding and synthesis backend failures, plus the
//! ambient configuration, I/O, prompt and export errors.

use thiserror::Error;

/// Unified error type for the Scholar assistant.
///
/// All fallible functions return `Result<T, AppError>`.
/// Per-file loading errors (`Load`, `UnsupportedFormat`) are isolated by the
/// batch loader; every other variant aborts the current build or query.
#[derive(Error, Debug)]
pub enum AppError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// I/O and filesystem errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// No API key available for the language-model backend
    #[error("Missing credential: {0} not found in your environment")]
    MissingCredential(String),

    /// A file could not be parsed for its declared type
    #[error("Failed to load '{file}': {reason}")]
    Load { file: String, reason: String },

    /// A file has an extension the loader does not handle
    #[error("Unsupported file format '{extension}' for '{file}'")]
    UnsupportedFormat { file: String, extension: String },

    /// Loading finished without producing any text
    #[error("No valid documents to process")]
    NoDocuments,

    /// Embedding backend errors
    #[error("Embedding error: {0}")]
    Embedding(String),

    /// Answer or utility generation failed at the language-model backend
    #[error("Synthesis error: {0}")]
    Synthesis(String),

    /// Raw LLM provider errors
    #[error("LLM error: {0}")]
    Llm(String),

    /// Prompt system errors
    #[error("Prompt error: {0}")]
    Prompt(String),

    /// Artifact export errors
    #[error("Export error: {0}")]
    Export(String),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Generic errors
    #[error("{0}")]
    Other(String),
}

impl AppError {
    /// Create a load error for a named file.
    pub fn load(file: impl Into<String>, reason: impl Into<String>) -> Self {
        AppError::Load {
            file: file.into(),
            reason: reason.into(),
        }
    }

    /// Whether this error belongs to a single file and may be skipped.
    ///
    /// `UnsupportedFormat` is a specialization of `Load`.
    pub fn is_load_error(&self) -> bool {
        matches!(self, AppError::Load { .. } | AppError::UnsupportedFormat { .. })
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Serialization(err.to_string())
    }
}

impl From<serde_yaml::Error> for AppError {
    fn from(err: serde_yaml::Error) -> Self {
        AppError::Serialization(err.to_string())
    }
}

/// Convenience type alias for Results with AppError.
pub type AppResult<T> = Result<T, AppError>;
