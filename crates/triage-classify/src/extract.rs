//! Type-specific field extraction.
//!
//! Runs after classification has settled on a document type. Every field is
//! optional: a pattern that finds nothing leaves its key mapped to `None`
//! and never aborts extraction of the remaining fields.

use std::collections::BTreeMap;

use lazy_static::lazy_static;
use regex::Regex;
use tracing::debug;

use triage_core::DocumentType;

lazy_static! {
    // Patterns run over lowercased text.
    static ref INVOICE_NUMBER: Regex =
        Regex::new(r"(?:invoice|bill)\s*(?:#|no\.?|number)?\s*:?\s*([a-z0-9][a-z0-9/-]*)").unwrap();
    static ref AMOUNT: Regex = Regex::new(
        r"(?:total|subtotal|amount|balance\s+due)[\s:]*(?:amount[\s:]*)?[$€£]?\s*([0-9][0-9,]*(?:\.[0-9]{1,2})?)"
    )
    .unwrap();
    static ref DUE_DATE: Regex = Regex::new(
        r"(?:due\s+date|payment\s+due|due)[\s:]*([0-9]{1,4}[/-][0-9]{1,2}[/-][0-9]{1,4})"
    )
    .unwrap();
    static ref PO_NUMBER: Regex = Regex::new(
        r"(?:purchase\s+order|p\.?o\.?)\s*(?:#|no\.?|number)?\s*:?\s*([a-z0-9][a-z0-9/-]*)"
    )
    .unwrap();
    static ref VENDOR: Regex =
        Regex::new(r"(?:vendor|supplier|sold\s+to|ship\s+to)\s*:?\s*([^\n]+)").unwrap();
}

/// Extract type-specific fields from `text` for a known document type.
///
/// Only invoices and purchase orders have extraction rules; every other type
/// yields an empty mapping.
pub fn extract(text: &str, document_type: DocumentType) -> BTreeMap<String, Option<String>> {
    let lower = text.to_lowercase();
    let mut fields = BTreeMap::new();

    match document_type {
        DocumentType::Invoice => {
            fields.insert("invoice_number".to_string(), first_capture(&INVOICE_NUMBER, &lower));
            fields.insert("amount".to_string(), extract_amount(&lower));
            fields.insert("due_date".to_string(), first_capture(&DUE_DATE, &lower));
        }
        DocumentType::PurchaseOrder => {
            fields.insert("po_number".to_string(), first_capture(&PO_NUMBER, &lower));
            fields.insert("vendor".to_string(), extract_vendor(&lower));
        }
        _ => {}
    }

    fields
}

fn first_capture(pattern: &Regex, text: &str) -> Option<String> {
    pattern
        .captures(text)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}

/// Amounts keep their string form; commas are stripped and the remainder
/// must survive numeric conversion or the field stays empty.
fn extract_amount(text: &str) -> Option<String> {
    let raw = first_capture(&AMOUNT, text)?;
    let cleaned = raw.replace(',', "");
    if cleaned.parse::<f64>().is_err() {
        debug!(raw = %raw, "amount match is not a valid number, leaving field empty");
        return None;
    }
    Some(cleaned)
}

fn extract_vendor(text: &str) -> Option<String> {
    first_capture(&VENDOR, text)
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
