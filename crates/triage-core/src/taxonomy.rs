//! Fixed intent taxonomies for the document and email domains.
//!
//! Each taxonomy is one enumerated set shared by the rule scorer and the
//! model-response validator, so the two can never drift apart. Declaration
//! order is significant: rule scoring breaks ties in favour of the
//! first-declared member.

use serde::{Deserialize, Serialize};

/// Business-document intent categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DocumentType {
    Invoice,
    #[serde(rename = "Quote Request")]
    QuoteRequest,
    Contract,
    #[serde(rename = "Purchase Order")]
    PurchaseOrder,
    Receipt,
    #[serde(rename = "General Inquiry")]
    GeneralInquiry,
}

impl DocumentType {
    /// All members in declaration order (the tie-break order for rule scoring).
    pub const ALL: &'static [DocumentType] = &[
        DocumentType::Invoice,
        DocumentType::QuoteRequest,
        DocumentType::Contract,
        DocumentType::PurchaseOrder,
        DocumentType::Receipt,
        DocumentType::GeneralInquiry,
    ];

    /// Catch-all category returned when no rule matches.
    pub const DEFAULT: DocumentType = DocumentType::GeneralInquiry;

    pub fn as_str(&self) -> &'static str {
        match self {
            DocumentType::Invoice => "Invoice",
            DocumentType::QuoteRequest => "Quote Request",
            DocumentType::Contract => "Contract",
            DocumentType::PurchaseOrder => "Purchase Order",
            DocumentType::Receipt => "Receipt",
            DocumentType::GeneralInquiry => "General Inquiry",
        }
    }

    /// Parse a category label, tolerating case and separator variations
    /// ("Purchase Order", "purchase_order", "PurchaseOrder").
    ///
    /// Returns `None` for anything outside the taxonomy; callers must treat
    /// that as a rejection, never coerce.
    pub fn parse(s: &str) -> Option<DocumentType> {
        match fold(s).as_str() {
            "invoice" => Some(DocumentType::Invoice),
            "quoterequest" => Some(DocumentType::QuoteRequest),
            "contract" => Some(DocumentType::Contract),
            "purchaseorder" => Some(DocumentType::PurchaseOrder),
            "receipt" => Some(DocumentType::Receipt),
            "generalinquiry" => Some(DocumentType::GeneralInquiry),
            _ => None,
        }
    }
}

impl std::fmt::Display for DocumentType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Email intent categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EmailIntent {
    #[serde(rename = "Quote Request")]
    QuoteRequest,
    Order,
    Support,
    Feedback,
    #[serde(rename = "General Inquiry")]
    GeneralInquiry,
    Other,
}

impl EmailIntent {
    pub const ALL: &'static [EmailIntent] = &[
        EmailIntent::QuoteRequest,
        EmailIntent::Order,
        EmailIntent::Support,
        EmailIntent::Feedback,
        EmailIntent::GeneralInquiry,
        EmailIntent::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            EmailIntent::QuoteRequest => "Quote Request",
            EmailIntent::Order => "Order",
            EmailIntent::Support => "Support",
            EmailIntent::Feedback => "Feedback",
            EmailIntent::GeneralInquiry => "General Inquiry",
            EmailIntent::Other => "Other",
        }
    }

    pub fn parse(s: &str) -> Option<EmailIntent> {
        match fold(s).as_str() {
            "quoterequest" => Some(EmailIntent::QuoteRequest),
            "order" => Some(EmailIntent::Order),
            "support" => Some(EmailIntent::Support),
            "feedback" => Some(EmailIntent::Feedback),
            "generalinquiry" => Some(EmailIntent::GeneralInquiry),
            "other" => Some(EmailIntent::Other),
            _ => None,
        }
    }
}

impl std::fmt::Display for EmailIntent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Email urgency levels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Urgency {
    Low,
    Normal,
    High,
    Critical,
}

impl Urgency {
    pub fn as_str(&self) -> &'static str {
        match self {
            Urgency::Low => "Low",
            Urgency::Normal => "Normal",
            Urgency::High => "High",
            Urgency::Critical => "Critical",
        }
    }

    pub fn parse(s: &str) -> Option<Urgency> {
        match fold(s).as_str() {
            "low" => Some(Urgency::Low),
            "normal" => Some(Urgency::Normal),
            "high" => Some(Urgency::High),
            "critical" => Some(Urgency::Critical),
            _ => None,
        }
    }
}

impl std::fmt::Display for Urgency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Collapse a label to lowercase alphanumerics for tolerant matching.
fn fold(s: &str) -> String {
    s.chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .map(|c| c.to_ascii_lowercase())
        .collect()
}
