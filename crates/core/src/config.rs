//! Configuration management for the Scholar assistant.
//!
//! This module handles loading and merging configuration from multiple sources:
//! - Built-in defaults
//! - Config files (.scholar/config.yaml)
//! - Environment variables
//! - Command-line flags
//!
//! Later sources win. The workspace is the directory that holds `.scholar/`.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{AppError, AppResult};

/// Models the language-model backend accepts.
pub const SUPPORTED_MODELS: [&str; 4] = [
    "llama3-70b-8192",
    "llama3-8b-8192",
    "gemma-7b-it",
    "mixtral-8x22b",
];

/// Lowest accepted value for `max_tokens`.
pub const MIN_MAX_TOKENS: u32 = 512;

/// Highest accepted value for `max_tokens`.
pub const MAX_MAX_TOKENS: u32 = 8192;

/// Embedding providers known to the knowledge crate.
pub const SUPPORTED_EMBEDDING_PROVIDERS: [&str; 3] = ["ollama", "trigram", "mock"];

/// Main application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Path to the workspace root (contains .scholar/)
    pub workspace: PathBuf,

    /// Optional config file path
    pub config_file: Option<PathBuf>,

    /// Log level override
    pub log_level: Option<String>,

    /// Verbose mode (enables debug logging)
    pub verbose: bool,

    /// Disable colored output
    pub no_color: bool,

    /// Language-model settings shared by answering and utilities
    pub llm: LlmSettings,

    /// Embedding backend settings
    pub embedding: EmbeddingSettings,

    /// Chunk window settings
    pub chunking: ChunkingSettings,

    /// Retrieval settings
    pub retrieval: RetrievalSettings,
}

/// Language-model settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LlmSettings {
    /// Provider identifier ("groq")
    pub provider: String,

    /// Model identifier, one of [`SUPPORTED_MODELS`]
    pub model: String,

    /// Sampling temperature in [0, 1]
    pub temperature: f32,

    /// Maximum output tokens in [512, 8192]
    pub max_tokens: u32,

    /// Optional custom API base URL
    pub endpoint: Option<String>,

    /// Environment variable holding the API key
    pub api_key_env: String,
}

impl Default for LlmSettings {
    fn default() -> Self {
        Self {
            provider: "groq".to_string(),
            model: SUPPORTED_MODELS[0].to_string(),
            temperature: 0.5,
            max_tokens: 3072,
            endpoint: None,
            api_key_env: "GROQ_API_KEY".to_string(),
        }
    }
}

/// Embedding backend settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EmbeddingSettings {
    /// Provider name: "ollama", "trigram" or "mock"
    pub provider: String,

    /// Model identifier (provider-specific)
    pub model: String,

    /// Embedding vector dimensions
    pub dimensions: usize,

    /// Optional custom endpoint (Ollama base URL)
    pub endpoint: Option<String>,

    /// Maximum texts per embedding request
    pub batch_size: usize,
}

impl Default for EmbeddingSettings {
    fn default() -> Self {
        Self {
            provider: "ollama".to_string(),
            model: "all-minilm".to_string(),
            dimensions: 384,
            endpoint: None,
            batch_size: 32,
        }
    }
}

/// Chunk window settings, in characters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ChunkingSettings {
    pub chunk_size: usize,
    pub chunk_overlap: usize,
}

impl Default for ChunkingSettings {
    fn default() -> Self {
        Self {
            chunk_size: 1500,
            chunk_overlap: 200,
        }
    }
}

/// Retrieval settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RetrievalSettings {
    /// Number of chunks handed to the synthesizer
    pub top_k: usize,

    /// Similarity metric: "cosine" or "l2"
    pub metric: String,
}

impl Default for RetrievalSettings {
    fn default() -> Self {
        Self {
            top_k: 4,
            metric: "cosine".to_string(),
        }
    }
}

/// Full configuration file structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct ConfigFile {
    llm: Option<LlmSettings>,
    embedding: Option<EmbeddingSettings>,
    chunking: Option<ChunkingSettings>,
    retrieval: Option<RetrievalSettings>,
    logging: Option<LoggingConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct LoggingConfig {
    level: Option<String>,
    color: Option<bool>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            workspace: std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")),
            config_file: None,
            log_level: None,
            verbose: false,
            no_color: false,
            llm: LlmSettings::default(),
            embedding: EmbeddingSettings::default(),
            chunking: ChunkingSettings::default(),
            retrieval: RetrievalSettings::default(),
        }
    }
}

impl AppConfig {
    /// Load configuration from environment variables and defaults.
    ///
    /// Environment variables:
    /// - `SCHOLAR_WORKSPACE`: Override workspace path
    /// - `SCHOLAR_CONFIG`: Path to config file
    /// - `SCHOLAR_MODEL`: Model identifier
    /// - `RUST_LOG`: Log level
    /// - `NO_COLOR`: Disable colored output
    ///
    /// # Example
    /// ```no_run
    /// use scholar_core::config::AppConfig;
    ///
    /// let config = AppConfig::load().expect("Failed to load config");
    /// println!("Workspace: {:?}", config.workspace);
    /// ```
    pub fn load() -> AppResult<Self> {
        let workspace = std::env::var("SCHOLAR_WORKSPACE").ok().map(PathBuf::from);
        let config_file = std::env::var("SCHOLAR_CONFIG").ok().map(PathBuf::from);
        Self::load_from(workspace, config_file)
    }

    /// Load configuration for an explicit workspace and config file.
    ///
    /// Either may be `None`, in which case the current directory and
    /// `<workspace>/.scholar/config.yaml` are used.
    pub fn load_from(workspace: Option<PathBuf>, config_file: Option<PathBuf>) -> AppResult<Self> {
        let mut config = Self::default();

        if let Some(workspace) = workspace {
            config.workspace = workspace;
        }
        config.config_file = config_file;

        if !config.workspace.exists() {
            return Err(AppError::Config(format!(
                "Workspace directory does not exist: {:?}",
                config.workspace
            )));
        }

        let config_path = match config.config_file {
            Some(ref cf) => cf.clone(),
            None => config.scholar_dir().join("config.yaml"),
        };

        if config_path.exists() {
            config = config.merge_yaml(&config_path)?;
        } else if config.config_file.is_some() {
            return Err(AppError::Config(format!(
                "Config file does not exist: {:?}",
                config_path
            )));
        }

        // Environment variables override YAML config
        if let Ok(model) = std::env::var("SCHOLAR_MODEL") {
            config.llm.model = model;
        }

        if let Ok(level) = std::env::var("RUST_LOG") {
            config.log_level = Some(level);
        }

        if std::env::var("NO_COLOR").is_ok() {
            config.no_color = true;
        }

        Ok(config)
    }

    /// Merge YAML configuration file into this config.
    fn merge_yaml(&self, path: &Path) -> AppResult<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| {
            AppError::Config(format!("Failed to read config file {:?}: {}", path, e))
        })?;

        let config_file: ConfigFile = serde_yaml::from_str(&contents).map_err(|e| {
            AppError::Config(format!("Failed to parse config file {:?}: {}", path, e))
        })?;

        let mut result = self.clone();

        if let Some(llm) = config_file.llm {
            result.llm = llm;
        }
        if let Some(embedding) = config_file.embedding {
            result.embedding = embedding;
        }
        if let Some(chunking) = config_file.chunking {
            result.chunking = chunking;
        }
        if let Some(retrieval) = config_file.retrieval {
            result.retrieval = retrieval;
        }

        if let Some(logging) = config_file.logging {
            if let Some(level) = logging.level {
                result.log_level = Some(level);
            }
            if let Some(color) = logging.color {
                result.no_color = !color;
            }
        }

        tracing::debug!("Merged config file {:?}", path);
        Ok(result)
    }

    /// Apply CLI overrides to the configuration.
    ///
    /// Command-line flags take precedence over the environment and the
    /// config file.
    #[allow(clippy::too_many_arguments)]
    pub fn with_overrides(
        mut self,
        model: Option<String>,
        temperature: Option<f32>,
        max_tokens: Option<u32>,
        chunk_size: Option<usize>,
        chunk_overlap: Option<usize>,
        log_level: Option<String>,
        verbose: bool,
        no_color: bool,
    ) -> Self {
        if let Some(model) = model {
            self.llm.model = model;
        }

        if let Some(temperature) = temperature {
            self.llm.temperature = temperature;
        }

        if let Some(max_tokens) = max_tokens {
            self.llm.max_tokens = max_tokens;
        }

        if let Some(chunk_size) = chunk_size {
            self.chunking.chunk_size = chunk_size;
        }

        if let Some(chunk_overlap) = chunk_overlap {
            self.chunking.chunk_overlap = chunk_overlap;
        }

        if let Some(log_level) = log_level {
            self.log_level = Some(log_level);
        }

        if verbose {
            self.verbose = true;
            // Verbose mode implies debug logging
            if self.log_level.is_none() {
                self.log_level = Some("debug".to_string());
            }
        }

        if no_color {
            self.no_color = true;
        }

        self
    }

    /// Get the path to the .scholar directory.
    pub fn scholar_dir(&self) -> PathBuf {
        self.workspace.join(".scholar")
    }

    /// Resolve the language-model API key.
    ///
    /// Loads `<workspace>/.env` (or a `.env` found from the current
    /// directory upwards) without overriding variables already set, then
    /// reads the variable named by `llm.api_key_env`. An unset or blank
    /// variable is a `MissingCredential` error.
    pub fn resolve_api_key(&self) -> AppResult<String> {
        let env_path = self.workspace.join(".env");
        if env_path.exists() {
            if let Err(e) = dotenvy::from_path(&env_path) {
                tracing::warn!("Failed to read {:?}: {}", env_path, e);
            }
        } else {
            dotenvy::dotenv().ok();
        }

        match std::env::var(&self.llm.api_key_env) {
            Ok(key) if !key.trim().is_empty() => Ok(key),
            _ => Err(AppError::MissingCredential(self.llm.api_key_env.clone())),
        }
    }

    /// Validate configuration values and ranges.
    pub fn validate(&self) -> AppResult<()> {
        let provider = self.llm.provider.to_lowercase();
        if provider != "groq" {
            return Err(AppError::Config(format!(
                "Unknown provider: {}. Supported: groq",
                self.llm.provider
            )));
        }

        validate_generation(&self.llm.model, self.llm.temperature, self.llm.max_tokens)?;

        if !SUPPORTED_EMBEDDING_PROVIDERS.contains(&self.embedding.provider.as_str()) {
            return Err(AppError::Config(format!(
                "Unknown embedding provider: {}. Supported: {}",
                self.embedding.provider,
                SUPPORTED_EMBEDDING_PROVIDERS.join(", ")
            )));
        }

        if self.embedding.dimensions == 0 || self.embedding.batch_size == 0 {
            return Err(AppError::Config(
                "Embedding dimensions and batch size must be positive".to_string(),
            ));
        }

        if self.chunking.chunk_size == 0 || self.chunking.chunk_overlap >= self.chunking.chunk_size
        {
            return Err(AppError::Config(format!(
                "Chunk overlap ({}) must be smaller than a positive chunk size ({})",
                self.chunking.chunk_overlap, self.chunking.chunk_size
            )));
        }

        if self.retrieval.top_k == 0 {
            return Err(AppError::Config("topK must be at least 1".to_string()));
        }

        match self.retrieval.metric.to_lowercase().as_str() {
            "cosine" | "l2" => {}
            other => {
                return Err(AppError::Config(format!(
                    "Unknown similarity metric: {}. Supported: cosine, l2",
                    other
                )))
            }
        }

        Ok(())
    }
}

/// Check model identifier, temperature and token budget against the
/// accepted ranges.
pub fn validate_generation(model: &str, temperature: f32, max_tokens: u32) -> AppResult<()> {
    if !SUPPORTED_MODELS.contains(&model) {
        return Err(AppError::Config(format!(
            "Unsupported model: {}. Supported: {}",
            model,
            SUPPORTED_MODELS.join(", ")
        )));
    }

    if !(0.0..=1.0).contains(&temperature) {
        return Err(AppError::Config(format!(
            "Temperature must be within [0, 1], got {}",
            temperature
        )));
    }

    if !(MIN_MAX_TOKENS..=MAX_MAX_TOKENS).contains(&max_tokens) {
        return Err(AppError::Config(format!(
            "Max tokens must be within [{}, {}], got {}",
            MIN_MAX_TOKENS, MAX_MAX_TOKENS, max_tokens
        )));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.llm.model, "llama3-70b-8192");
        assert_eq!(config.llm.temperature, 0.5);
        assert_eq!(config.llm.max_tokens, 3072);
        assert_eq!(config.chunking.chunk_size, 1500);
        assert_eq!(config.chunking.chunk_overlap, 200);
        assert_eq!(config.retrieval.top_k, 4);
        assert!(!config.verbose);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_scholar_dir() {
        let config = AppConfig::default();
        assert!(config.scholar_dir().ends_with(".scholar"));
    }

    #[test]
    fn test_with_overrides() {
        let config = AppConfig::default().with_overrides(
            Some("gemma-7b-it".to_string()),
            Some(0.2),
            Some(1024),
            None,
            Some(100),
            None,
            true,
            false,
        );

        assert_eq!(config.llm.model, "gemma-7b-it");
        assert_eq!(config.llm.temperature, 0.2);
        assert_eq!(config.llm.max_tokens, 1024);
        assert_eq!(config.chunking.chunk_size, 1500);
        assert_eq!(config.chunking.chunk_overlap, 100);
        assert!(config.verbose);
        assert_eq!(config.log_level, Some("debug".to_string()));
    }

    #[test]
    fn test_yaml_sections_merge() {
        let temp = TempDir::new().unwrap();
        let dir = temp.path().join(".scholar");
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(
            dir.join("config.yaml"),
            r#"
llm:
  model: llama3-8b-8192
  temperature: 0.1
embedding:
  provider: trigram
chunking:
  chunkSize: 800
  chunkOverlap: 80
logging:
  color: false
"#,
        )
        .unwrap();

        let config = AppConfig::load_from(Some(temp.path().to_path_buf()), None).unwrap();
        assert_eq!(config.llm.temperature, 0.1);
        // Unspecified keys in a section keep their defaults
        assert_eq!(config.llm.max_tokens, 3072);
        assert_eq!(config.embedding.provider, "trigram");
        assert_eq!(config.embedding.dimensions, 384);
        assert_eq!(config.chunking.chunk_size, 800);
        assert_eq!(config.retrieval.top_k, 4);
        assert!(config.no_color);
    }

    #[test]
    fn test_missing_explicit_config_file() {
        let temp = TempDir::new().unwrap();
        let result = AppConfig::load_from(
            Some(temp.path().to_path_buf()),
            Some(temp.path().join("nope.yaml")),
        );
        assert!(matches!(result, Err(AppError::Config(_))));
    }

    #[test]
    fn test_validate_rejects_unknown_model() {
        let mut config = AppConfig::default();
        config.llm.model = "gpt-4".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_ranges() {
        assert!(validate_generation("gemma-7b-it", 0.0, 512).is_ok());
        assert!(validate_generation("gemma-7b-it", 1.0, 8192).is_ok());
        assert!(validate_generation("gemma-7b-it", 1.01, 1024).is_err());
        assert!(validate_generation("gemma-7b-it", -0.1, 1024).is_err());
        assert!(validate_generation("gemma-7b-it", 0.5, 511).is_err());
        assert!(validate_generation("gemma-7b-it", 0.5, 8193).is_err());
    }

    #[test]
    fn test_validate_chunk_overlap() {
        let mut config = AppConfig::default();
        config.chunking.chunk_overlap = config.chunking.chunk_size;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_missing_credential() {
        let temp = TempDir::new().unwrap();
        let config = AppConfig {
            workspace: temp.path().to_path_buf(),
            llm: LlmSettings {
                api_key_env: "SCHOLAR_TEST_UNSET_KEY_7F3A".to_string(),
                ..Default::default()
            },
            ..Default::default()
        };

        match config.resolve_api_key() {
            Err(AppError::MissingCredential(var)) => assert_eq!(var, "SCHOLAR_TEST_UNSET_KEY_7F3A"),
            other => panic!("Expected MissingCredential, got {:?}", other),
        }
    }

    #[test]
    fn test_credential_from_workspace_env_file() {
        let temp = TempDir::new().unwrap();
        std::fs::write(temp.path().join(".env"), "SCHOLAR_TEST_DOTENV_KEY_91C2=sk-test\n").unwrap();
        let config = AppConfig {
            workspace: temp.path().to_path_buf(),
            llm: LlmSettings {
                api_key_env: "SCHOLAR_TEST_DOTENV_KEY_91C2".to_string(),
                ..Default::default()
            },
            ..Default::default()
        };

        assert_eq!(config.resolve_api_key().unwrap(), "sk-test");
    }
}
