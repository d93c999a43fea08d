//! Prompt loader for YAML prompt definitions.
//!
//! Built-in definitions are compiled in from `prompts/`. A workspace may
//! override any of them with `.scholar/prompts/<id>.yml`.

use crate::types::PromptDefinition;
use scholar_core::{AppError, AppResult};
use std::path::{Path, PathBuf};

/// Prompt used by the answer synthesizer.
pub const RAG_ANSWER: &str = "rag.answer";

/// Prompt used by the summary generator.
pub const UTILITY_SUMMARY: &str = "utility.summary";

/// Prompt used by the MCQ generator.
pub const UTILITY_MCQS: &str = "utility.mcqs";

/// Prompt used by the explanation generator.
pub const UTILITY_EXPLANATION: &str = "utility.explanation";

const BUILTIN_PROMPTS: [(&str, &str); 4] = [
    (RAG_ANSWER, include_str!("../prompts/rag.answer.yml")),
    (UTILITY_SUMMARY, include_str!("../prompts/utility.summary.yml")),
    (UTILITY_MCQS, include_str!("../prompts/utility.mcqs.yml")),
    (
        UTILITY_EXPLANATION,
        include_str!("../prompts/utility.explanation.yml"),
    ),
];

/// Load a prompt definition by ID.
///
/// Looks for `<workspace>/.scholar/prompts/<id>.yml` first and falls back to
/// the built-in definition.
///
/// # Example
/// ```no_run
/// use scholar_prompt::{load_prompt, RAG_ANSWER};
/// use std::path::Path;
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let prompt = load_prompt(Some(Path::new(".")), RAG_ANSWER)?;
/// println!("Loaded prompt: {}", prompt.title);
/// # Ok(())
/// # }
/// ```
pub fn load_prompt(workspace_path: Option<&Path>, prompt_id: &str) -> AppResult<PromptDefinition> {
    if let Some(workspace) = workspace_path {
        let prompt_file = prompt_file(workspace, prompt_id);
        if prompt_file.exists() {
            tracing::debug!("Loading prompt override from: {:?}", prompt_file);

            let contents = std::fs::read_to_string(&prompt_file).map_err(|e| {
                AppError::Prompt(format!(
                    "Failed to read prompt file {:?}: {}",
                    prompt_file, e
                ))
            })?;

            let definition = parse_prompt(&contents, &format!("{:?}", prompt_file))?;
            if definition.id != prompt_id {
                return Err(AppError::Prompt(format!(
                    "Prompt file {:?} declares id '{}', expected '{}'",
                    prompt_file, definition.id, prompt_id
                )));
            }

            tracing::info!("Loaded prompt override: {} ({})", definition.id, definition.title);
            return Ok(definition);
        }
    }

    load_builtin(prompt_id)
}

/// Load a built-in prompt definition.
pub fn load_builtin(prompt_id: &str) -> AppResult<PromptDefinition> {
    let (_, yaml) = BUILTIN_PROMPTS
        .iter()
        .find(|(id, _)| *id == prompt_id)
        .ok_or_else(|| AppError::Prompt(format!("Unknown prompt: {}", prompt_id)))?;

    parse_prompt(yaml, prompt_id)
}

fn prompt_file(workspace: &Path, prompt_id: &str) -> PathBuf {
    workspace
        .join(".scholar/prompts")
        .join(format!("{}.yml", prompt_id))
}

fn parse_prompt(contents: &str, origin: &str) -> AppResult<PromptDefinition> {
    let definition: PromptDefinition = serde_yaml::from_str(contents)
        .map_err(|e| AppError::Prompt(format!("Failed to parse prompt YAML {}: {}", origin, e)))?;

    validate_prompt(&definition)?;
    Ok(definition)
}

/// Validate a prompt definition.
fn validate_prompt(def: &PromptDefinition) -> AppResult<()> {
    if def.id.is_empty() {
        return Err(AppError::Prompt("Prompt ID cannot be empty".to_string()));
    }

    if def.title.is_empty() {
        return Err(AppError::Prompt("Prompt title cannot be empty".to_string()));
    }

    if def.template.is_empty() {
        return Err(AppError::Prompt(
            "Prompt template cannot be empty".to_string(),
        ));
    }

    if !def.api_version.contains('.') {
        return Err(AppError::Prompt(format!(
            "Invalid apiVersion format: {}. Expected format: 'x.y'",
            def.api_version
        )));
    }

    for variable in &def.variables {
        if !def.template.contains(&format!("{{{{{}}}}}", variable)) {
            return Err(AppError::Prompt(format!(
                "Prompt {} declares variable '{}' but its template never uses it",
                def.id, variable
            )));
        }
    }

    Ok(())
}
