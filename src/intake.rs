use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{IntakeError, StudyError};
use crate::models::SourceDocument;

pub const MAX_DOCUMENT_BYTES: u64 = 10 * 1024 * 1024;
pub const SUPPORTED_MEDIA_TYPE: &str = "application/pdf";

/// Reference text sent in place of the document body. Real extraction is not
/// implemented; every document yields this text.
pub const PLACEHOLDER_DOCUMENT_TEXT: &str = "The uploaded PDF discusses key historical events in the French Revolution, including the storming of the Bastille, the Reign of Terror, and the rise of Napoleon. It also details prominent figures like Robespierre and Danton.";

/// Builds a `SourceDocument` if the file satisfies the intake limits.
pub fn validate_document(
    name: &str,
    size_bytes: u64,
    media_type: &str,
) -> Result<SourceDocument, IntakeError> {
    if name.trim().is_empty() {
        return Err(IntakeError::Unnamed);
    }
    if size_bytes > MAX_DOCUMENT_BYTES {
        return Err(IntakeError::TooLarge { size_bytes });
    }
    if media_type != SUPPORTED_MEDIA_TYPE {
        return Err(IntakeError::UnsupportedMediaType(media_type.to_string()));
    }
    Ok(SourceDocument::new(
        name.to_string(),
        size_bytes,
        media_type.to_string(),
    ))
}

pub fn media_type_for(path: &Path) -> &'static str {
    match path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_ascii_lowercase())
        .as_deref()
    {
        Some("pdf") => SUPPORTED_MEDIA_TYPE,
        Some("txt") => "text/plain",
        Some("md") => "text/markdown",
        Some("docx") => "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
        _ => "application/octet-stream",
    }
}

/// Reads file metadata and validates it.
pub fn accept_path(path: &Path) -> Result<SourceDocument, IntakeError> {
    let metadata = fs::metadata(path)?;
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .ok_or(IntakeError::Unnamed)?;

    match validate_document(&name, metadata.len(), media_type_for(path)) {
        Ok(document) => {
            log::info!("accepted document {} ({} bytes)", name, metadata.len());
            Ok(document)
        }
        Err(e) => {
            log::warn!("rejected {}: {}", path.display(), e);
            Err(e)
        }
    }
}

/// Files in `dir` offered by the picker, sorted by path.
pub fn list_documents(dir: &Path) -> Vec<PathBuf> {
    let mut files = Vec::new();

    if dir.is_dir()
        && let Ok(entries) = fs::read_dir(dir)
    {
        for entry in entries.flatten() {
            let path = entry.path();
            if path.is_file() {
                files.push(path);
            }
        }
    }

    files.sort();
    files
}

/// Supplies the textual content sent along with a generation prompt.
pub trait TextExtractor: Send + Sync {
    fn extract(&self, document: &SourceDocument) -> Result<String, StudyError>;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct PlaceholderExtractor;

impl TextExtractor for PlaceholderExtractor {
    fn extract(&self, document: &SourceDocument) -> Result<String, StudyError> {
        log::debug!(
            "using placeholder text for {} ({})",
            document.name(),
            document.media_type()
        );
        Ok(PLACEHOLDER_DOCUMENT_TEXT.to_string())
    }
}
