//! Ask command handler.
//!
//! Builds a session over the given files and answers one question from it.

use super::{export, open_session};
use clap::Args;
use scholar_core::{config::AppConfig, AppError, AppResult};
use scholar_knowledge::UtilityKind;
use std::path::PathBuf;

/// Ask a question about one or more documents
#[derive(Args, Debug)]
pub struct AskCommand {
    /// The question to ask
    pub question: String,

    /// Document to read (pdf, docx, txt); repeat for several
    #[arg(short, long = "file", required = true)]
    pub files: Vec<PathBuf>,

    /// Override the number of context chunks
    #[arg(short = 'k', long)]
    pub top_k: Option<usize>,

    /// Also generate a summary of the first chunk
    #[arg(long)]
    pub summary: bool,

    /// Also generate practice questions
    #[arg(long)]
    pub mcqs: bool,

    /// Also generate a topic-wise explanation
    #[arg(long)]
    pub explain: bool,

    /// Directory to write generated study aids to
    #[arg(long)]
    pub export_dir: Option<PathBuf>,
}

impl AskCommand {
    /// Execute the ask command.
    pub async fn execute(&self, config: &AppConfig) -> AppResult<()> {
        tracing::info!("Executing ask command");
        tracing::debug!("Ask command options: {:?}", self);

        let question = self.question.trim();
        if question.is_empty() {
            return Err(AppError::Config("No question provided".to_string()));
        }

        let mut config = config.clone();
        if let Some(top_k) = self.top_k {
            config.retrieval.top_k = top_k;
            config.validate()?;
        }

        let session = open_session(&config, &self.files).await?;
        let answer = session.ask(question).await?;

        let json = serde_json::to_string_pretty(&answer.to_record(question))
            .map_err(|e| AppError::Serialization(e.to_string()))?;
        println!("{}", json);
        eprintln!("Answer generated in {} seconds", answer.elapsed_display());

        for kind in self.requested_utilities() {
            let body = session.generate(kind).await?;
            println!("\n{}\n\n{}", kind.title(), body);

            if let Some(ref dir) = self.export_dir {
                export(dir, kind, &body)?;
            }
        }

        Ok(())
    }

    fn requested_utilities(&self) -> Vec<UtilityKind> {
        [
            (self.summary, UtilityKind::Summary),
            (self.mcqs, UtilityKind::Mcqs),
            (self.explain, UtilityKind::Explanation),
        ]
        .into_iter()
        .filter_map(|(wanted, kind)| wanted.then_some(kind))
        .collect()
    }
}
