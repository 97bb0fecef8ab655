//! Classification outcome types.
//!
//! A [`ClassificationResult`] is produced exactly once per request and is
//! immutable after construction. The `method` provenance tag is `Some` if and
//! only if `success` is true; construction goes through [`classified`] and
//! [`failed`] so that invariant cannot be violated from outside.
//!
//! [`classified`]: ClassificationResult::classified
//! [`failed`]: ClassificationResult::failed

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::taxonomy::{DocumentType, EmailIntent, Urgency};

/// Provenance tag: which classification path produced the answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Method {
    Model,
    Rule,
}

impl Method {
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Model => "model",
            Method::Rule => "rule",
        }
    }
}

/// The single normalized result of one document classification request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassificationResult {
    pub success: bool,
    pub document_type: Option<DocumentType>,
    /// Always in [0, 1]. Rule-based results are capped below 1.0 by the scorer.
    pub confidence: f64,
    pub method: Option<Method>,
    pub reasoning: String,
    /// Type-specific extracted fields; a key with `None` means the pattern
    /// found no match.
    pub extracted: BTreeMap<String, Option<String>>,
    pub error: Option<String>,
    pub timestamp: DateTime<Utc>,
}

impl ClassificationResult {
    /// A successful classification. Confidence is clamped to [0, 1].
    pub fn classified(
        document_type: DocumentType,
        confidence: f64,
        method: Method,
        reasoning: impl Into<String>,
        extracted: BTreeMap<String, Option<String>>,
    ) -> Self {
        Self {
            success: true,
            document_type: Some(document_type),
            confidence: confidence.clamp(0.0, 1.0),
            method: Some(method),
            reasoning: reasoning.into(),
            extracted,
            error: None,
            timestamp: Utc::now(),
        }
    }

    /// A terminal failure (empty input). No type, no method, no extraction.
    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            success: false,
            document_type: None,
            confidence: 0.0,
            method: None,
            reasoning: String::new(),
            extracted: BTreeMap::new(),
            error: Some(error.into()),
            timestamp: Utc::now(),
        }
    }
}

/// Result of one email classification request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmailClassification {
    pub success: bool,
    pub intent: Option<EmailIntent>,
    pub urgency: Option<Urgency>,
    pub method: Option<Method>,
    pub error: Option<String>,
    pub timestamp: DateTime<Utc>,
}

impl EmailClassification {
    pub fn classified(intent: EmailIntent, urgency: Urgency, method: Method) -> Self {
        Self {
            success: true,
            intent: Some(intent),
            urgency: Some(urgency),
            method: Some(method),
            error: None,
            timestamp: Utc::now(),
        }
    }

    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            success: false,
            intent: None,
            urgency: None,
            method: None,
            error: Some(error.into()),
            timestamp: Utc::now(),
        }
    }
}

/// Validation report for a structured JSON record.
///
/// `data` holds the record reformatted to the target schema (every schema key
/// present, `null` where the input had no value). Findings are advisory:
/// a report with findings is still a successful validation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecordReport {
    pub data: serde_json::Map<String, serde_json::Value>,
    pub missing: Vec<String>,
    pub findings: Vec<String>,
}
