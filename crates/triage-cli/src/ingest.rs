//! Input loaders: plain text, JSON records, and PDF text extraction.

use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{debug, info};

use triage_core::SourceKind;

/// Markers that suggest email-shaped text; two or more hits route the input
/// to the email classifier.
const EMAIL_INDICATORS: &[&str] = &["from:", "to:", "subject:", "dear", "@", "sent:", "date:"];

#[derive(Debug, Error)]
pub enum IngestError {
    #[error("file not found: {0}")]
    NotFound(PathBuf),

    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("invalid JSON in {path}: {source}")]
    Json {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("PDF text extraction failed for {path}: {message}")]
    Pdf { path: PathBuf, message: String },
}

/// Decide how to treat an input file from its extension.
pub fn detect_kind(path: &Path) -> SourceKind {
    match path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .as_deref()
    {
        Some("pdf") => SourceKind::Pdf,
        Some("json") => SourceKind::Json,
        _ => SourceKind::Text,
    }
}

pub fn load_text(path: &Path) -> Result<String, IngestError> {
    if !path.exists() {
        return Err(IngestError::NotFound(path.to_path_buf()));
    }
    fs::read_to_string(path).map_err(|source| IngestError::Io {
        path: path.to_path_buf(),
        source,
    })
}

pub fn load_json(path: &Path) -> Result<serde_json::Value, IngestError> {
    let contents = load_text(path)?;
    serde_json::from_str(&contents).map_err(|source| IngestError::Json {
        path: path.to_path_buf(),
        source,
    })
}

pub fn load_pdf_text(path: &Path) -> Result<String, IngestError> {
    if !path.exists() {
        return Err(IngestError::NotFound(path.to_path_buf()));
    }
    let text = pdf_extract::extract_text(path).map_err(|e| IngestError::Pdf {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;
    info!(chars = text.len(), path = %path.display(), "extracted PDF text");
    Ok(text)
}

/// Heuristic: does this text look like an email rather than a document body?
pub fn looks_like_email(text: &str) -> bool {
    let lower = text.to_lowercase();
    let hits = EMAIL_INDICATORS
        .iter()
        .filter(|marker| lower.contains(**marker))
        .count();
    debug!(hits, "email indicator check");
    hits >= 2
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_from_extension() {
        assert_eq!(detect_kind(Path::new("a/invoice.PDF")), SourceKind::Pdf);
        assert_eq!(detect_kind(Path::new("record.json")), SourceKind::Json);
        assert_eq!(detect_kind(Path::new("mail.txt")), SourceKind::Text);
        assert_eq!(detect_kind(Path::new("README")), SourceKind::Text);
    }

    #[test]
    fn email_heuristic_needs_two_indicators() {
        assert!(looks_like_email(
            "From: a@example.com\nSubject: quote\n\nDear team,"
        ));
        assert!(!looks_like_email("just a note mentioning an invoice"));
        // A lone "@" is not enough.
        assert!(!looks_like_email("contact me at me@example.com"));
    }

    #[test]
    fn load_text_missing_file() {
        let err = load_text(Path::new("/nonexistent/file.txt")).unwrap_err();
        assert!(matches!(err, IngestError::NotFound(_)));
    }

    #[test]
    fn load_json_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("record.json");
        fs::write(&path, r#"{"id": "INV-1", "amount": 10.5}"#).unwrap();

        let value = load_json(&path).unwrap();
        assert_eq!(value["id"], "INV-1");
    }

    #[test]
    fn load_json_invalid_contents() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.json");
        fs::write(&path, "{'single': quotes,}").unwrap();

        let err = load_json(&path).unwrap_err();
        assert!(matches!(err, IngestError::Json { .. }));
    }
}
