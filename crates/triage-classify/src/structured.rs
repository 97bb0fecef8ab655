//! Structured-record validation against the invoice record schema.
//!
//! Reformats an incoming JSON object to the target schema and collects
//! advisory findings. Once the input parses as JSON, validation never fails:
//! missing fields and type mismatches are reported, not fatal.

use serde_json::{Map, Value};
use tracing::warn;

use triage_core::RecordReport;

/// Top-level fields a structured record is expected to carry.
pub const TARGET_SCHEMA: &[&str] = &["id", "date", "amount", "customer", "items", "currency"];

/// Validate and reformat a structured record.
///
/// The returned report's `data` has every schema key, `null` where the input
/// had no value. `amount` is coerced to a number where possible; `customer`
/// must be an object carrying `name` and `email`; `id` must be a string or
/// number.
pub fn validate_record(value: &Value) -> RecordReport {
    let empty = Map::new();
    let input = value.as_object().unwrap_or(&empty);

    let missing: Vec<String> = TARGET_SCHEMA
        .iter()
        .filter(|field| !input.contains_key(**field))
        .map(|field| field.to_string())
        .collect();
    if !missing.is_empty() {
        warn!(missing = ?missing, "record is missing schema fields");
    }

    let mut data = Map::new();
    for field in TARGET_SCHEMA {
        data.insert(
            field.to_string(),
            input.get(*field).cloned().unwrap_or(Value::Null),
        );
    }

    let mut findings = Vec::new();

    match &data["customer"] {
        Value::Null => {}
        Value::Object(customer) => {
            if !customer.contains_key("name") || !customer.contains_key("email") {
                findings.push("'customer' object is missing 'name' or 'email'".to_string());
            }
        }
        other => findings.push(format!(
            "'customer' field is not an object (got {})",
            type_name(other)
        )),
    }

    let coerced_amount = match &data["amount"] {
        Value::Null | Value::Number(_) => None,
        Value::String(s) => match s.parse::<f64>() {
            Ok(n) => Some(serde_json::json!(n)),
            Err(_) => {
                findings.push(format!("'amount' field {s:?} is not a valid number"));
                None
            }
        },
        other => {
            findings.push(format!(
                "'amount' field is not a number (got {})",
                type_name(other)
            ));
            None
        }
    };
    if let Some(amount) = coerced_amount {
        data["amount"] = amount;
    }

    match &data["id"] {
        Value::Null | Value::String(_) | Value::Number(_) => {}
        other => findings.push(format!(
            "'id' field is not a string or number (got {})",
            type_name(other)
        )),
    }

    for finding in &findings {
        warn!(finding = %finding, "record validation finding");
    }

    RecordReport {
        data,
        missing,
        findings,
    }
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn complete_record_has_no_findings() {
        let record = json!({
            "id": "INV-001-2024",
            "date": "2024-06-14",
            "amount": 1500.75,
            "currency": "USD",
            "customer": {"name": "Acme Corp", "email": "info@acmecorp.com"},
            "items": [{"product": "Laptop", "qty": 1}]
        });
        let report = validate_record(&record);
        assert!(report.missing.is_empty());
        assert!(report.findings.is_empty());
        assert_eq!(report.data["id"], "INV-001-2024");
    }

    #[test]
    fn missing_fields_are_reported_and_nulled() {
        let record = json!({"id": "INV-002", "date": "2024-06-14"});
        let report = validate_record(&record);
        assert_eq!(
            report.missing,
            vec!["amount", "customer", "items", "currency"]
        );
        assert_eq!(report.data["amount"], Value::Null);
        assert_eq!(report.data.len(), TARGET_SCHEMA.len());
    }

    #[test]
    fn string_amount_is_coerced() {
        let report = validate_record(&json!({"amount": "250.50"}));
        assert_eq!(report.data["amount"], json!(250.50));
        assert!(report.findings.is_empty());
    }

    #[test]
    fn bad_amount_is_a_finding_not_an_error() {
        let report = validate_record(&json!({"amount": "a lot"}));
        assert_eq!(report.findings.len(), 1);
        assert!(report.findings[0].contains("amount"));
    }

    #[test]
    fn customer_shape_is_checked() {
        let report = validate_record(&json!({"customer": "Acme"}));
        assert!(report.findings[0].contains("not an object"));

        let report = validate_record(&json!({"customer": {"name": "Charlie"}}));
        assert!(report.findings[0].contains("missing 'name' or 'email'"));
    }

    #[test]
    fn non_object_input_reports_everything_missing() {
        let report = validate_record(&json!([1, 2, 3]));
        assert_eq!(report.missing.len(), TARGET_SCHEMA.len());
    }

    #[test]
    fn invalid_id_type_is_a_finding() {
        let report = validate_record(&json!({"id": [1]}));
        assert!(report.findings[0].contains("'id'"));
    }
}
