//! Stored records: a classification outcome plus its provenance.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::result::{ClassificationResult, EmailClassification, RecordReport};

/// Where a processed input came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceKind {
    Pdf,
    Text,
    Json,
}

impl SourceKind {
    /// Prefix used when deriving conversation ids ("pdf_20240614_101500").
    pub fn as_str(&self) -> &'static str {
        match self {
            SourceKind::Pdf => "pdf",
            SourceKind::Text => "text",
            SourceKind::Json => "json",
        }
    }
}

/// The per-domain outcome carried by a stored record.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "domain", rename_all = "snake_case")]
pub enum Outcome {
    Document(ClassificationResult),
    Email(EmailClassification),
    Record(RecordReport),
}

/// One append-only store entry. Never mutated or deleted once written.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredRecord {
    pub conversation_id: String,
    /// Source identifier, typically the input file path.
    pub source: String,
    pub kind: SourceKind,
    #[serde(flatten)]
    pub outcome: Outcome,
    pub stored_at: DateTime<Utc>,
}

impl StoredRecord {
    pub fn new(
        conversation_id: impl Into<String>,
        source: impl Into<String>,
        kind: SourceKind,
        outcome: Outcome,
    ) -> Self {
        Self {
            conversation_id: conversation_id.into(),
            source: source.into(),
            kind,
            outcome,
            stored_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::taxonomy::DocumentType;
    use crate::result::Method;
    use std::collections::BTreeMap;

    #[test]
    fn stored_record_json_roundtrip() {
        let result = ClassificationResult::classified(
            DocumentType::Receipt,
            0.75,
            Method::Model,
            "payment confirmation language",
            BTreeMap::new(),
        );
        let record = StoredRecord::new(
            "pdf_20240614_101500",
            "samples/receipt.pdf",
            SourceKind::Pdf,
            Outcome::Document(result),
        );

        let json = serde_json::to_string(&record).unwrap();
        let back: StoredRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(back.conversation_id, "pdf_20240614_101500");
        assert_eq!(back.kind, SourceKind::Pdf);
        match back.outcome {
            Outcome::Document(r) => assert_eq!(r.document_type, Some(DocumentType::Receipt)),
            _ => panic!("expected document outcome"),
        }
    }

    #[test]
    fn outcome_tag_distinguishes_domains() {
        let email = EmailClassification::failed("empty email content");
        let record = StoredRecord::new("text_1", "mail.txt", SourceKind::Text, Outcome::Email(email));
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["domain"], "email");
        assert_eq!(json["kind"], "text");
    }
}
