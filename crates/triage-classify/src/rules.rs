//! Deterministic keyword/pattern scoring over the document taxonomy.
//!
//! The scorer is the fallback path of the hybrid engine: it is pure, total,
//! and deterministic. For any non-empty input it returns a taxonomy member,
//! so classification as a whole can only fail on empty input.

use lazy_static::lazy_static;
use regex::Regex;
use tracing::debug;

use triage_core::DocumentType;

/// Score weight for each keyword occurrence (case-insensitive substring).
const KEYWORD_WEIGHT: u32 = 2;
/// Score weight for each pattern match.
const PATTERN_WEIGHT: u32 = 3;

/// Ceiling on rule-based confidence. Kept below 1.0 so a rule result is
/// always distinguishable from a fully-confident model answer.
pub const RULE_CONFIDENCE_CAP: f64 = 0.9;
/// Confidence assigned to the catch-all category when nothing scores.
const DEFAULT_CONFIDENCE: f64 = 0.3;

/// Transient per-type scores in taxonomy declaration order.
pub type RuleScores = Vec<(DocumentType, u32)>;

struct TaxonomyEntry {
    doc_type: DocumentType,
    keywords: &'static [&'static str],
    patterns: Vec<Regex>,
}

impl TaxonomyEntry {
    fn new(doc_type: DocumentType, keywords: &'static [&'static str], patterns: &[&str]) -> Self {
        Self {
            doc_type,
            keywords,
            patterns: patterns
                .iter()
                .map(|p| Regex::new(p).expect("static taxonomy pattern must compile"))
                .collect(),
        }
    }
}

lazy_static! {
    /// One entry per taxonomy member, in declaration order. Keywords and
    /// patterns are written lowercase; scoring lowercases the input.
    static ref TAXONOMY: Vec<TaxonomyEntry> = vec![
        TaxonomyEntry::new(
            DocumentType::Invoice,
            &["invoice", "bill", "amount due", "balance due", "remittance"],
            &[r"invoice\s*(?:#|no\.?|number)", r"total\s+(?:amount|due)"],
        ),
        TaxonomyEntry::new(
            DocumentType::QuoteRequest,
            &["quote", "quotation", "estimate", "pricing", "rfq"],
            &[r"request\s+for\s+(?:a\s+)?(?:quote|quotation|proposal)"],
        ),
        TaxonomyEntry::new(
            DocumentType::Contract,
            &["contract", "agreement", "terms and conditions", "hereby"],
            &[r"party\s+of\s+the\s+(?:first|second)\s+part", r"in\s+witness\s+whereof"],
        ),
        TaxonomyEntry::new(
            DocumentType::PurchaseOrder,
            &["purchase order", "vendor", "ship to", "delivery"],
            &[r"(?:purchase\s+order|p\.?o\.?)\s*(?:#|no\.?|number)"],
        ),
        TaxonomyEntry::new(
            DocumentType::Receipt,
            &["receipt", "payment received", "paid", "transaction"],
            &[r"receipt\s*(?:#|no\.?|number)", r"amount\s+(?:paid|tendered)"],
        ),
        TaxonomyEntry::new(
            DocumentType::GeneralInquiry,
            &["inquiry", "enquiry", "question", "information"],
            &[],
        ),
    ];
}

/// Keyword/pattern scorer over the fixed document taxonomy.
pub struct RuleScorer {
    entries: &'static [TaxonomyEntry],
}

impl RuleScorer {
    pub fn new() -> Self {
        Self { entries: &TAXONOMY }
    }

    /// Score every taxonomy member against `text`.
    ///
    /// Scores are `2 × keyword occurrences + 3 × pattern matches` over the
    /// lowercased text, returned in declaration order.
    pub fn score(&self, text: &str) -> RuleScores {
        let lower = text.to_lowercase();
        self.entries
            .iter()
            .map(|entry| {
                let keyword_hits: u32 = entry
                    .keywords
                    .iter()
                    .map(|k| lower.matches(k).count() as u32)
                    .sum();
                let pattern_hits: u32 = entry
                    .patterns
                    .iter()
                    .map(|p| p.find_iter(&lower).count() as u32)
                    .sum();
                (
                    entry.doc_type,
                    KEYWORD_WEIGHT * keyword_hits + PATTERN_WEIGHT * pattern_hits,
                )
            })
            .collect()
    }

    /// Classify `text`, never failing.
    ///
    /// All-zero scores yield the catch-all category with a fixed low
    /// confidence. Otherwise the highest score wins (ties go to the
    /// first-declared member) with confidence `min(cap, winning / total)`.
    pub fn classify(&self, text: &str) -> (DocumentType, f64, RuleScores) {
        let scores = self.score(text);
        let total: u32 = scores.iter().map(|(_, s)| s).sum();

        if total == 0 {
            debug!("no rule matched, defaulting to catch-all category");
            return (DocumentType::DEFAULT, DEFAULT_CONFIDENCE, scores);
        }

        // Strictly-greater comparison keeps the first-declared winner on ties.
        let (winner, winning) = scores
            .iter()
            .fold((DocumentType::DEFAULT, 0u32), |best, &(t, s)| {
                if s > best.1 { (t, s) } else { best }
            });

        let confidence = (f64::from(winning) / f64::from(total)).min(RULE_CONFIDENCE_CAP);
        debug!(document_type = %winner, winning, total, "rule classification");
        (winner, confidence, scores)
    }
}

impl Default for RuleScorer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invoice_text_scores_invoice() {
        let scorer = RuleScorer::new();
        let (doc_type, confidence, _) =
            scorer.classify("Invoice #INV-001\nTotal Amount: $99.00\nBalance due on receipt");
        assert_eq!(doc_type, DocumentType::Invoice);
        assert!(confidence > 0.3);
    }

    #[test]
    fn purchase_order_text_scores_purchase_order() {
        let scorer = RuleScorer::new();
        let (doc_type, confidence, scores) =
            scorer.classify("Purchase Order No. PO-45678 from Vendor Solutions for 100 keyboards.");
        assert_eq!(doc_type, DocumentType::PurchaseOrder);
        assert!(confidence <= RULE_CONFIDENCE_CAP);
        let po_score = scores
            .iter()
            .find(|(t, _)| *t == DocumentType::PurchaseOrder)
            .unwrap()
            .1;
        assert!(po_score > 0);
    }

    #[test]
    fn unmatched_text_defaults_to_general_inquiry() {
        let scorer = RuleScorer::new();
        let (doc_type, confidence, scores) = scorer.classify("the quick brown fox");
        assert_eq!(doc_type, DocumentType::GeneralInquiry);
        assert_eq!(confidence, 0.3);
        assert!(scores.iter().all(|(_, s)| *s == 0));
    }

    #[test]
    fn confidence_is_capped_below_one() {
        let scorer = RuleScorer::new();
        // Only one category scores, so the uncapped share would be 1.0.
        let (_, confidence, _) = scorer.classify("receipt receipt receipt");
        assert_eq!(confidence, RULE_CONFIDENCE_CAP);
    }

    #[test]
    fn confidence_always_in_range() {
        let scorer = RuleScorer::new();
        for text in [
            "invoice",
            "please send a quote",
            "contract agreement hereby",
            "x",
            "payment received, thank you",
        ] {
            let (doc_type, confidence, _) = scorer.classify(text);
            assert!(DocumentType::ALL.contains(&doc_type));
            assert!((0.0..=RULE_CONFIDENCE_CAP).contains(&confidence), "{text}");
        }
    }

    #[test]
    fn classify_is_deterministic() {
        let scorer = RuleScorer::new();
        let text = "Quotation for estimate, pricing attached";
        let first = scorer.classify(text);
        let second = scorer.classify(text);
        assert_eq!(first.0, second.0);
        assert_eq!(first.1, second.1);
        assert_eq!(first.2, second.2);
    }

    #[test]
    fn ties_go_to_first_declared() {
        let scorer = RuleScorer::new();
        // "bill" (Invoice) and "receipt" (Receipt) each score one keyword.
        let (doc_type, _, scores) = scorer.classify("bill receipt");
        let invoice = scores.iter().find(|(t, _)| *t == DocumentType::Invoice).unwrap().1;
        let receipt = scores.iter().find(|(t, _)| *t == DocumentType::Receipt).unwrap().1;
        assert_eq!(invoice, receipt);
        assert_eq!(doc_type, DocumentType::Invoice);
    }

    #[test]
    fn keyword_occurrences_accumulate() {
        let scorer = RuleScorer::new();
        let one = scorer.score("quote")[1].1;
        let three = scorer.score("quote quote quote")[1].1;
        assert_eq!(three, 3 * one);
    }
}
