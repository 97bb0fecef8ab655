//! Model-path classification: prompt construction and strict answer validation.
//!
//! Every failure mode is a [`ModelRejection`] value returned to the
//! coordinator, which branches to the rule fallback. Rejections are never
//! propagated to the caller as errors.

use std::sync::Arc;

use serde_json::Value;
use thiserror::Error;
use tracing::debug;

use triage_core::DocumentType;
use triage_model::Generator;

use crate::normalize::{PROMPT_BUDGET, clip};

/// Why a model answer was not accepted. Any variant sends the coordinator
/// down the rule path.
#[derive(Debug, Error)]
pub enum ModelRejection {
    #[error("model service unavailable: {0}")]
    ServiceUnavailable(String),
    #[error("model response is not valid JSON: {0}")]
    MalformedResponse(String),
    #[error("model response has invalid shape: {0}")]
    InvalidShape(String),
    #[error("model returned a category outside the taxonomy: {0:?}")]
    UnknownCategory(String),
}

/// A validated model answer.
#[derive(Debug, Clone)]
pub struct ModelVerdict {
    pub document_type: DocumentType,
    pub confidence: f64,
    pub reasoning: String,
}

/// Classifies documents through the external generative model.
pub struct ModelClassifier {
    generator: Arc<dyn Generator>,
}

impl ModelClassifier {
    pub fn new(generator: Arc<dyn Generator>) -> Self {
        Self { generator }
    }

    /// Connectivity probe; when false the coordinator skips the model
    /// attempt entirely.
    pub async fn available(&self) -> bool {
        self.generator.healthy().await
    }

    /// One classification attempt. No retries.
    pub async fn classify(&self, text: &str) -> Result<ModelVerdict, ModelRejection> {
        let prompt = build_prompt(text);
        let raw = self
            .generator
            .generate(&prompt)
            .await
            .map_err(|e| ModelRejection::ServiceUnavailable(e.to_string()))?;
        debug!(chars = raw.len(), "validating model answer");
        parse_verdict(&raw)
    }
}

fn build_prompt(text: &str) -> String {
    let categories = DocumentType::ALL
        .iter()
        .map(|t| format!("'{}'", t.as_str()))
        .collect::<Vec<_>>()
        .join(", ");

    format!(
        "You are a document classifier. Analyze the following text and determine \
         its primary intent.\n\
         Choose one of the following categories: {categories}.\n\
         Return your answer as a strict JSON object with keys 'document_type', \
         'confidence' (0.0 to 1.0), and 'reasoning'.\n\n\
         Example valid response:\n\
         {{\"document_type\": \"Invoice\", \"confidence\": 0.95, \"reasoning\": \"mentions an invoice number and a total\"}}\n\n\
         Document text:\n---\n{}\n---\n\n\
         Only return the JSON, no other text.",
        clip(text, PROMPT_BUDGET)
    )
}

/// Validate a raw model answer against the response contract.
fn parse_verdict(raw: &str) -> Result<ModelVerdict, ModelRejection> {
    let value: Value = serde_json::from_str(raw.trim())
        .map_err(|e| ModelRejection::MalformedResponse(e.to_string()))?;

    let obj = value
        .as_object()
        .ok_or_else(|| ModelRejection::InvalidShape("response is not a JSON object".into()))?;

    let label = obj
        .get("document_type")
        .and_then(Value::as_str)
        .ok_or_else(|| {
            ModelRejection::InvalidShape("missing or non-string 'document_type'".into())
        })?;

    let confidence = obj.get("confidence").and_then(Value::as_f64).ok_or_else(|| {
        ModelRejection::InvalidShape("missing or non-numeric 'confidence'".into())
    })?;

    // No silent coercion: an out-of-taxonomy label is a rejection.
    let document_type = DocumentType::parse(label)
        .ok_or_else(|| ModelRejection::UnknownCategory(label.to_string()))?;

    let reasoning = obj
        .get("reasoning")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string();

    Ok(ModelVerdict {
        document_type,
        confidence: confidence.clamp(0.0, 1.0),
        reasoning,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prompt_names_every_category_and_clips_text() {
        let prompt = build_prompt(&"x".repeat(10_000));
        for t in DocumentType::ALL {
            assert!(prompt.contains(t.as_str()));
        }
        assert!(prompt.len() < 10_000);
    }

    #[test]
    fn valid_answer_is_accepted() {
        let verdict = parse_verdict(
            r#"{"document_type": "Purchase Order", "confidence": 0.92, "reasoning": "PO number present"}"#,
        )
        .unwrap();
        assert_eq!(verdict.document_type, DocumentType::PurchaseOrder);
        assert_eq!(verdict.confidence, 0.92);
        assert_eq!(verdict.reasoning, "PO number present");
    }

    #[test]
    fn answer_with_missing_reasoning_is_accepted() {
        let verdict =
            parse_verdict(r#"{"document_type": "Invoice", "confidence": 0.5}"#).unwrap();
        assert!(verdict.reasoning.is_empty());
    }

    #[test]
    fn non_json_is_malformed() {
        let err = parse_verdict("The document is an invoice.").unwrap_err();
        assert!(matches!(err, ModelRejection::MalformedResponse(_)));
    }

    #[test]
    fn missing_confidence_is_invalid_shape() {
        let err = parse_verdict(r#"{"document_type": "Invoice"}"#).unwrap_err();
        assert!(matches!(err, ModelRejection::InvalidShape(_)));
    }

    #[test]
    fn wrong_value_type_is_invalid_shape() {
        let err =
            parse_verdict(r#"{"document_type": 7, "confidence": 0.9}"#).unwrap_err();
        assert!(matches!(err, ModelRejection::InvalidShape(_)));

        let err = parse_verdict(r#"{"document_type": "Invoice", "confidence": "high"}"#)
            .unwrap_err();
        assert!(matches!(err, ModelRejection::InvalidShape(_)));
    }

    #[test]
    fn out_of_taxonomy_category_is_rejected_not_coerced() {
        let err = parse_verdict(r#"{"document_type": "Memo", "confidence": 0.9}"#).unwrap_err();
        assert!(matches!(err, ModelRejection::UnknownCategory(_)));
    }

    #[test]
    fn confidence_is_clamped() {
        let verdict =
            parse_verdict(r#"{"document_type": "Receipt", "confidence": 3.0}"#).unwrap();
        assert_eq!(verdict.confidence, 1.0);
    }
}
