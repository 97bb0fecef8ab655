//! Human-readable cards for classification outcomes and store history.

use triage_core::{ClassificationResult, EmailClassification, Outcome, RecordReport, StoredRecord};

/// Print one document classification as a vertical card.
pub fn print_document(result: &ClassificationResult) {
    if !result.success {
        println!(
            "classification failed: {}",
            result.error.as_deref().unwrap_or("unknown error")
        );
        return;
    }

    println!("=== Document Classification ===");
    print_row(
        "type",
        result
            .document_type
            .map(|t| t.as_str())
            .unwrap_or("-"),
    );
    print_row("confidence", &format!("{:.2}", result.confidence));
    print_row(
        "method",
        result.method.map(|m| m.as_str()).unwrap_or("-"),
    );
    if !result.reasoning.is_empty() {
        print_row("reasoning", &result.reasoning);
    }
    if !result.extracted.is_empty() {
        println!("extracted fields");
        for (field, value) in &result.extracted {
            print_row(field, value.as_deref().unwrap_or("-"));
        }
    }
}

/// Print one email classification as a vertical card.
pub fn print_email(result: &EmailClassification) {
    if !result.success {
        println!(
            "classification failed: {}",
            result.error.as_deref().unwrap_or("unknown error")
        );
        return;
    }

    println!("=== Email Classification ===");
    print_row("intent", result.intent.map(|i| i.as_str()).unwrap_or("-"));
    print_row("urgency", result.urgency.map(|u| u.as_str()).unwrap_or("-"));
    print_row("method", result.method.map(|m| m.as_str()).unwrap_or("-"));
}

/// Print a structured-record validation report.
pub fn print_record_report(report: &RecordReport) {
    println!("=== Record Validation ===");
    for (field, value) in &report.data {
        print_row(field, &value.to_string());
    }
    if !report.missing.is_empty() {
        print_row("missing fields", &report.missing.join(", "));
    }
    for finding in &report.findings {
        print_row("finding", finding);
    }
}

/// Print stored records, one summary line each.
pub fn print_history(records: &[&StoredRecord]) {
    if records.is_empty() {
        println!("no stored records");
        return;
    }

    for record in records {
        let summary = match &record.outcome {
            Outcome::Document(r) => format!(
                "{} ({:.2}, {})",
                r.document_type.map(|t| t.as_str()).unwrap_or("failed"),
                r.confidence,
                r.method.map(|m| m.as_str()).unwrap_or("-"),
            ),
            Outcome::Email(r) => format!(
                "email: {} / {}",
                r.intent.map(|i| i.as_str()).unwrap_or("failed"),
                r.urgency.map(|u| u.as_str()).unwrap_or("-"),
            ),
            Outcome::Record(r) => format!(
                "record: {} missing, {} findings",
                r.missing.len(),
                r.findings.len()
            ),
        };
        println!(
            "{:<24} {:<10} {:<40} {}",
            record.conversation_id,
            record.kind.as_str(),
            record.source,
            summary
        );
    }
    println!("\n{} record(s)", records.len());
}

fn print_row(key: &str, value: &str) {
    println!("  {:<16} {}", key, value);
}
