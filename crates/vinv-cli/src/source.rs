//! Input text sources: plain text files and the PDF text bridge.
//!
//! The parser itself performs no file access; this is the collaborator that
//! feeds it already-extracted text.

use std::fs;
use std::path::Path;

use tracing::debug;

/// Read invoice text from a `.txt` or `.pdf` input file.
pub fn read_text(path: &Path) -> anyhow::Result<String> {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase();

    let text = match extension.as_str() {
        "pdf" => {
            let data = fs::read(path)?;
            pdf_extract::extract_text_from_mem(&data).map_err(|e| {
                anyhow::anyhow!("failed to extract text from {}: {}", path.display(), e)
            })?
        }
        "txt" | "text" | "" => fs::read_to_string(path)?,
        other => anyhow::bail!("unsupported file format: {}", other),
    };

    if text.trim().is_empty() {
        anyhow::bail!("no text extracted from {}", path.display());
    }

    debug!(chars = text.len(), "input text loaded");
    Ok(text)
}
