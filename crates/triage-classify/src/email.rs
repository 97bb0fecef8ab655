//! Email intent and urgency classification.
//!
//! Same hybrid shape as the document path: try the model with a strict JSON
//! contract, fall back to keyword rules. The rule chains are ordered, and
//! the first group with any matching keyword wins.

use std::sync::Arc;

use serde_json::Value;
use tracing::{debug, info, warn};

use triage_core::{EmailClassification, EmailIntent, Method, Urgency};
use triage_model::Generator;

use crate::model::ModelRejection;
use crate::normalize::{PROMPT_BUDGET, clip};

/// Ordered intent rules: first group with a keyword hit wins.
const INTENT_RULES: &[(EmailIntent, &[&str])] = &[
    (EmailIntent::QuoteRequest, &["quote", "quotation", "estimate", "pricing"]),
    (EmailIntent::Order, &["order", "purchase", "procure", "buy"]),
    (EmailIntent::Support, &["support", "help", "issue", "problem", "bug", "trouble"]),
    (EmailIntent::Feedback, &["feedback", "suggestion", "review", "complaint"]),
];

const CRITICAL_KEYWORDS: &[&str] = &["blocker", "outage"];
const HIGH_KEYWORDS: &[&str] = &["urgent", "asap", "immediately", "critical", "down", "halted"];

/// Hybrid classifier for the email domain.
pub struct EmailClassifier {
    generator: Option<Arc<dyn Generator>>,
}

impl EmailClassifier {
    pub fn rule_only() -> Self {
        Self { generator: None }
    }

    pub fn with_generator(generator: Arc<dyn Generator>) -> Self {
        Self {
            generator: Some(generator),
        }
    }

    /// Classify an email body. Fails only on empty input.
    pub async fn classify(&self, text: &str) -> EmailClassification {
        if text.trim().is_empty() {
            warn!("email classification requested for empty input");
            return EmailClassification::failed("empty email content");
        }

        if let Some(generator) = &self.generator {
            if generator.healthy().await {
                match self.model_classify(generator.as_ref(), text).await {
                    Ok((intent, urgency)) => {
                        info!(intent = %intent, urgency = %urgency, "model email classification accepted");
                        return EmailClassification::classified(intent, urgency, Method::Model);
                    }
                    Err(rejection) => {
                        warn!(reason = %rejection, "model email classification rejected, falling back to rules");
                    }
                }
            } else {
                debug!("model service unreachable, skipping model attempt");
            }
        }

        let (intent, urgency) = self.rule_classify(text);
        info!(intent = %intent, urgency = %urgency, "rule email classification");
        EmailClassification::classified(intent, urgency, Method::Rule)
    }

    /// Deterministic keyword chains; always produces an answer.
    pub fn rule_classify(&self, text: &str) -> (EmailIntent, Urgency) {
        let lower = text.to_lowercase();

        let intent = INTENT_RULES
            .iter()
            .find(|(_, keywords)| keywords.iter().any(|k| lower.contains(k)))
            .map(|(intent, _)| *intent)
            .unwrap_or(EmailIntent::GeneralInquiry);

        let urgency = if CRITICAL_KEYWORDS.iter().any(|k| lower.contains(k)) {
            Urgency::Critical
        } else if HIGH_KEYWORDS.iter().any(|k| lower.contains(k)) {
            Urgency::High
        } else {
            Urgency::Normal
        };

        (intent, urgency)
    }

    async fn model_classify(
        &self,
        generator: &dyn Generator,
        text: &str,
    ) -> Result<(EmailIntent, Urgency), ModelRejection> {
        let prompt = build_prompt(text);
        let raw = generator
            .generate(&prompt)
            .await
            .map_err(|e| ModelRejection::ServiceUnavailable(e.to_string()))?;
        parse_answer(&raw)
    }
}

fn build_prompt(text: &str) -> String {
    let intents = EmailIntent::ALL
        .iter()
        .map(|i| format!("'{}'", i.as_str()))
        .collect::<Vec<_>>()
        .join(", ");

    format!(
        "Classify the intent and urgency of the following email.\n\
         Possible intents: {intents}.\n\
         Possible urgencies: 'Low', 'Normal', 'High', 'Critical'.\n\n\
         Provide your response as a strict JSON object with 'intent' and 'urgency' keys.\n\
         Example valid response:\n\
         {{\"intent\": \"Quote Request\", \"urgency\": \"High\"}}\n\n\
         Email:\n---\n{}\n---\n\n\
         Only return the JSON, no other text.",
        clip(text, PROMPT_BUDGET)
    )
}

fn parse_answer(raw: &str) -> Result<(EmailIntent, Urgency), ModelRejection> {
    let value: Value = serde_json::from_str(raw.trim())
        .map_err(|e| ModelRejection::MalformedResponse(e.to_string()))?;

    let obj = value
        .as_object()
        .ok_or_else(|| ModelRejection::InvalidShape("response is not a JSON object".into()))?;

    let intent_label = obj
        .get("intent")
        .and_then(Value::as_str)
        .ok_or_else(|| ModelRejection::InvalidShape("missing or non-string 'intent'".into()))?;
    let urgency_label = obj
        .get("urgency")
        .and_then(Value::as_str)
        .ok_or_else(|| ModelRejection::InvalidShape("missing or non-string 'urgency'".into()))?;

    let intent = EmailIntent::parse(intent_label)
        .ok_or_else(|| ModelRejection::UnknownCategory(intent_label.to_string()))?;
    let urgency = Urgency::parse(urgency_label)
        .ok_or_else(|| ModelRejection::UnknownCategory(urgency_label.to_string()))?;

    Ok((intent, urgency))
}
