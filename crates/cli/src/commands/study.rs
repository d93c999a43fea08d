//! Study command handler.

use super::{export, open_session};
use clap::Args;
use scholar_core::{config::AppConfig, AppResult};
use scholar_knowledge::UtilityKind;
use std::path::PathBuf;

/// Generate study aids from the first chunk of the given documents
#[derive(Args, Debug)]
pub struct StudyCommand {
    /// Document to read (pdf, docx, txt); repeat for several
    #[arg(short, long = "file", required = true)]
    pub files: Vec<PathBuf>,

    /// Aid to generate: summary, mcqs or explanation (default: all three)
    #[arg(short, long = "kind", value_parser = parse_kind)]
    pub kinds: Vec<UtilityKind>,

    /// Directory to write the generated text files to
    #[arg(long)]
    pub export_dir: Option<PathBuf>,
}

fn parse_kind(s: &str) -> Result<UtilityKind, String> {
    UtilityKind::parse(s).map_err(|e| e.to_string())
}

impl StudyCommand {
    /// Execute the study command.
    pub async fn execute(&self, config: &AppConfig) -> AppResult<()> {
        tracing::info!("Executing study command");

        let kinds = if self.kinds.is_empty() {
            UtilityKind::ALL.to_vec()
        } else {
            self.kinds.clone()
        };

        let session = open_session(config, &self.files).await?;

        for (i, kind) in kinds.into_iter().enumerate() {
            let body = session.generate(kind).await?;
            if i > 0 {
                println!();
            }
            println!("{}\n\n{}", kind.title(), body);

            if let Some(ref dir) = self.export_dir {
                export(dir, kind, &body)?;
            }
        }

        Ok(())
    }
}
