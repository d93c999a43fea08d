//! LLM integration crate for the Scholar assistant.
//!
//! This crate provides a provider-agnostic abstraction for completing prompts
//! with a Large Language Model. Providers plug in through the [`LlmClient`]
//! trait so tests can substitute a scripted client.
//!
//! # Providers
//! - **Groq**: OpenAI-compatible chat completions (default)
//! - **Mock**: scripted replies for tests
//!
//! # Example
//! ```no_run
//! use scholar_llm::{GenerationParams, GroqClient, LlmClient};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = GroqClient::new("gsk_...")?;
//! let request = GenerationParams::default().request("Hello, world!");
//! let response = client.complete(&request).await?;
//! println!("{}", response.content);
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod factory;
pub mod providers;
pub mod types;

// Re-export main types
pub use client::{LlmClient, LlmRequest, LlmResponse, LlmUsage};
pub use factory::create_client;
pub use providers::{GroqClient, MockLlmClient};
pub use types::{GenerationParams, ProviderType};
