//! The model-then-rules classification pipeline.
//!
//! One request runs start to finish: empty-input check, optional model
//! attempt, rule fallback, field extraction. The model path is best-effort;
//! any rejection is logged and absorbed, and only empty input surfaces as a
//! failed result.

use std::sync::Arc;

use tracing::{debug, info, warn};

use triage_core::{ClassificationResult, DocumentType, Method};
use triage_model::Generator;

use crate::extract::extract;
use crate::model::ModelClassifier;
use crate::rules::{RuleScorer, RuleScores};

/// Coordinates the hybrid classification of one document.
pub struct DocumentClassifier {
    rules: RuleScorer,
    model: Option<ModelClassifier>,
}

impl DocumentClassifier {
    /// A classifier with no model integration; every request takes the rule path.
    pub fn rule_only() -> Self {
        Self {
            rules: RuleScorer::new(),
            model: None,
        }
    }

    /// A classifier that tries `generator` first and falls back to rules.
    pub fn with_generator(generator: Arc<dyn Generator>) -> Self {
        Self {
            rules: RuleScorer::new(),
            model: Some(ModelClassifier::new(generator)),
        }
    }

    /// Classify `text` into the document taxonomy and extract type-specific
    /// fields.
    ///
    /// Succeeds for every non-empty input: the rule path is total, and model
    /// failures only ever change which path produced the answer.
    pub async fn classify(&self, text: &str) -> ClassificationResult {
        if text.trim().is_empty() {
            warn!("classification requested for empty input");
            return ClassificationResult::failed("empty input");
        }

        if let Some(model) = &self.model {
            if model.available().await {
                match model.classify(text).await {
                    Ok(verdict) => {
                        info!(
                            document_type = %verdict.document_type,
                            confidence = verdict.confidence,
                            "model classification accepted"
                        );
                        let extracted = extract(text, verdict.document_type);
                        return ClassificationResult::classified(
                            verdict.document_type,
                            verdict.confidence,
                            Method::Model,
                            verdict.reasoning,
                            extracted,
                        );
                    }
                    // The rejection reason stays out of the result; provenance
                    // alone tells the caller which path answered.
                    Err(rejection) => {
                        warn!(reason = %rejection, "model classification rejected, falling back to rules");
                    }
                }
            } else {
                debug!("model service unreachable, skipping model attempt");
            }
        }

        let (document_type, confidence, scores) = self.rules.classify(text);
        info!(document_type = %document_type, confidence, "rule classification");
        let extracted = extract(text, document_type);
        ClassificationResult::classified(
            document_type,
            confidence,
            Method::Rule,
            rule_reasoning(document_type, &scores),
            extracted,
        )
    }
}

fn rule_reasoning(winner: DocumentType, scores: &RuleScores) -> String {
    let total: u32 = scores.iter().map(|(_, s)| s).sum();
    if total == 0 {
        return "no keyword or pattern matched; defaulted to catch-all category".to_string();
    }
    let winning = scores
        .iter()
        .find(|(t, _)| *t == winner)
        .map(|(_, s)| *s)
        .unwrap_or(0);
    format!("keyword/pattern score {winning} of {total} across all categories")
}
