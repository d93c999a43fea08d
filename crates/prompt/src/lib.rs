//! Prompt system for the Scholar assistant.
//!
//! This crate provides structured prompt management with:
//! - YAML-based prompt definitions, built in or overridden per workspace
//! - Handlebars template rendering

pub mod builder;
pub mod loader;
pub mod types;

// Re-export main types
pub use builder::build_prompt;
pub use loader::{
    load_builtin, load_prompt, RAG_ANSWER, UTILITY_EXPLANATION, UTILITY_MCQS, UTILITY_SUMMARY,
};
pub use types::{BuiltPrompt, BuiltPromptMetadata, PromptDefinition, PromptOutputSpec};
