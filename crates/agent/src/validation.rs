//! Content checks run on upload, before a document is worth ranking.

use serde::{Deserialize, Serialize};

const MIN_CHARS: usize = 100;
const MAX_CHARS: usize = 50_000;
const MIN_WORDS: usize = 20;
/// More characters than this per word on average suggests mangled formatting.
const MAX_CHARS_PER_WORD: usize = 10;

/// Outcome of [`validate_document_content`]. Issues and suggestions pair up
/// by index.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationReport {
    pub is_valid: bool,
    pub issues: Vec<String>,
    pub suggestions: Vec<String>,
}

impl ValidationReport {
    fn flag(&mut self, issue: impl Into<String>, suggestion: &str) {
        self.issues.push(issue.into());
        self.suggestions.push(suggestion.to_string());
    }
}

/// Check extracted document text for signs of a bad upload: too short, too
/// long, OCR replacement characters, collapsed whitespace, too few words.
pub fn validate_document_content(content: &str) -> ValidationReport {
    let mut report = ValidationReport {
        is_valid: true,
        issues: Vec::new(),
        suggestions: Vec::new(),
    };

    let chars = content.chars().count();
    let words = content.split_whitespace().count();

    if chars < MIN_CHARS {
        report.flag(
            format!("Document content is very short (less than {MIN_CHARS} characters)"),
            "Ensure the complete document content has been uploaded",
        );
    }

    if chars > MAX_CHARS {
        report.flag(
            "Document content is very long (over 50,000 characters)",
            "Consider breaking large documents into smaller sections for better analysis",
        );
    }

    if content.contains('\u{FFFD}') {
        report.flag(
            "Document contains invalid characters, possibly from OCR errors",
            "Review the document for scanning or encoding issues",
        );
    }

    if words * MAX_CHARS_PER_WORD < chars {
        report.flag(
            "Document appears to have formatting issues or excessive whitespace",
            "Clean up document formatting for better analysis results",
        );
    }

    if words < MIN_WORDS {
        report.flag(
            format!("Document has very few words ({words})"),
            "Ensure complete document content is provided for meaningful analysis",
        );
    }

    report.is_valid = report.issues.is_empty();
    report
}

#[cfg(test)]
mod tests {
    use super::*;

    const CLAUSE: &str = "The tenant shall pay rent on the first day of each calendar month. ";

    #[test]
    fn well_formed_content_passes() {
        let report = validate_document_content(&CLAUSE.repeat(3));
        assert!(report.is_valid, "{:?}", report.issues);
        assert!(report.issues.is_empty());
        assert!(report.suggestions.is_empty());
    }

    #[test]
    fn short_content_flags_length_and_word_count() {
        let report = validate_document_content("Too short.");
        assert!(!report.is_valid);
        assert_eq!(report.issues.len(), 2);
        assert!(report.issues[0].contains("very short"));
        assert_eq!(report.issues[1], "Document has very few words (2)");
        assert_eq!(report.suggestions.len(), report.issues.len());
    }

    #[test]
    fn empty_content_is_invalid() {
        let report = validate_document_content("");
        assert!(!report.is_valid);
        assert!(report.issues.iter().any(|i| i.contains("(0)")));
    }

    #[test]
    fn very_long_content_is_flagged() {
        let report = validate_document_content(&"word ".repeat(10_001));
        assert_eq!(
            report.issues,
            vec!["Document content is very long (over 50,000 characters)"]
        );
    }

    #[test]
    fn replacement_characters_are_flagged() {
        let content = format!("{}Signed by the Vendor \u{FFFD}\u{FFFD}", CLAUSE.repeat(3));
        let report = validate_document_content(&content);
        assert_eq!(report.issues.len(), 1);
        assert!(report.issues[0].contains("OCR"));
    }

    #[test]
    fn collapsed_whitespace_is_flagged() {
        let content = vec!["x".repeat(30); 25].join(" ");
        let report = validate_document_content(&content);
        assert_eq!(
            report.issues,
            vec!["Document appears to have formatting issues or excessive whitespace"]
        );
    }

    #[test]
    fn serializes_with_camel_case_keys() {
        let json = serde_json::to_value(validate_document_content("")).unwrap();
        assert_eq!(json["isValid"], false);
    }
}
