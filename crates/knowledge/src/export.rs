//! Plain-text export of generated study aids.

use crate::rag::UtilityKind;
use scholar_core::{AppError, AppResult};
use std::path::{Path, PathBuf};

/// `title`, a blank line, then `body` unchanged.
pub fn render_text(title: &str, body: &str) -> String {
    format!("{}\n\n{}", title, body)
}

/// Write `<dir>/<stem>.txt` for `kind`, creating `dir` if needed.
///
/// Returns the path written.
pub fn write_artifact(dir: &Path, kind: UtilityKind, body: &str) -> AppResult<PathBuf> {
    std::fs::create_dir_all(dir).map_err(|e| {
        AppError::Export(format!("Failed to create export directory {:?}: {}", dir, e))
    })?;

    let path = dir.join(format!("{}.txt", kind.file_stem()));
    std::fs::write(&path, render_text(kind.title(), body))
        .map_err(|e| AppError::Export(format!("Failed to write {:?}: {}", path, e)))?;

    tracing::info!("Exported {} to {:?}", kind, path);
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_render_keeps_newlines() {
        assert_eq!(
            render_text("Practice Questions", "Q1?\na) yes\nb) no"),
            "Practice Questions\n\nQ1?\na) yes\nb) no"
        );
    }

    #[test]
    fn test_write_artifact_creates_file() {
        let dir = TempDir::new().unwrap();
        let out = dir.path().join("exports");

        let path = write_artifact(&out, UtilityKind::Summary, "Short.\nSweet.").unwrap();

        assert_eq!(path, out.join("summary.txt"));
        assert_eq!(
            std::fs::read_to_string(&path).unwrap(),
            "Document Summary\n\nShort.\nSweet."
        );
    }

    #[test]
    fn test_write_artifact_into_a_file_fails() {
        let dir = TempDir::new().unwrap();
        let blocker = dir.path().join("not-a-dir");
        std::fs::write(&blocker, "x").unwrap();

        let result = write_artifact(&blocker, UtilityKind::Mcqs, "body");
        assert!(matches!(result, Err(AppError::Export(_))));
    }
}
