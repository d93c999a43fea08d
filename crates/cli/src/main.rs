//! Scholar CLI
//!
//! Main entry point for the scholar command-line tool.
//! Answers questions about uploaded documents and generates study aids.

mod commands;

use clap::{Parser, Subcommand};
use commands::{AskCommand, StudyCommand};
use scholar_core::{config::AppConfig, logging, AppResult};
use std::path::PathBuf;
use tracing::Instrument;

/// Scholar - question answering and study aids over your documents
#[derive(Parser, Debug)]
#[command(name = "scholar")]
#[command(about = "Question answering and study aids over your documents", long_about = None)]
#[command(version)]
struct Cli {
    /// Path to workspace directory (default: current directory)
    #[arg(short, long, global = true, env = "SCHOLAR_WORKSPACE")]
    workspace: Option<PathBuf>,

    /// Path to config file
    #[arg(short, long, global = true, env = "SCHOLAR_CONFIG")]
    config: Option<PathBuf>,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long, global = true, env = "RUST_LOG")]
    log_level: Option<String>,

    /// Enable verbose output (sets log level to debug)
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Disable colored output
    #[arg(long, global = true, env = "NO_COLOR")]
    no_color: bool,

    /// Model identifier (llama3-70b-8192, llama3-8b-8192, gemma-7b-it, mixtral-8x22b)
    #[arg(short, long, global = true, env = "SCHOLAR_MODEL")]
    model: Option<String>,

    /// Sampling temperature (0.0-1.0)
    #[arg(long, global = true)]
    temperature: Option<f32>,

    /// Maximum tokens in the response (512-8192)
    #[arg(long, global = true)]
    max_tokens: Option<u32>,

    /// Chunk size in characters
    #[arg(long, global = true)]
    chunk_size: Option<usize>,

    /// Characters shared by consecutive chunks
    #[arg(long, global = true)]
    chunk_overlap: Option<usize>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Ask a question about one or more documents
    Ask(AskCommand),

    /// Generate a summary, practice questions or an explanation
    Study(StudyCommand),
}

#[tokio::main]
async fn main() -> AppResult<()> {
    // Parse command-line arguments first (needed for logging config)
    let cli = Cli::parse();

    // Defaults, config file and environment
    let config = AppConfig::load_from(cli.workspace, cli.config)?;

    // Apply CLI overrides
    let config = config.with_overrides(
        cli.model,
        cli.temperature,
        cli.max_tokens,
        cli.chunk_size,
        cli.chunk_overlap,
        cli.log_level,
        cli.verbose,
        cli.no_color,
    );

    // Initialize logging with final configuration
    logging::init_logging(config.log_level.as_deref(), config.no_color)?;

    tracing::info!("Scholar CLI starting");
    tracing::debug!("Workspace: {:?}", config.workspace);
    tracing::debug!("Model: {}", config.llm.model);

    let command_name = match &cli.command {
        Commands::Ask(_) => "ask",
        Commands::Study(_) => "study",
    };
    let span = tracing::info_span!("command", name = command_name);
    let result = run(cli.command, &config).instrument(span).await;

    match &result {
        Ok(_) => tracing::info!("Command completed successfully"),
        Err(e) => tracing::error!("Command failed: {}", e),
    }

    result
}

/// Validate the final configuration and route to the command handler.
async fn run(command: Commands, config: &AppConfig) -> AppResult<()> {
    config.validate()?;

    match command {
        Commands::Ask(cmd) => cmd.execute(config).await,
        Commands::Study(cmd) => cmd.execute(config).await,
    }
}
