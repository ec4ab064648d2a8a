//! `lexdesk ask`: Answer a question from the case documents.

use std::path::Path;

use lexdesk_agent::{RagAnswer, RagAssistant, RagOutcome};
use lexdesk_config::{AppConfig, ScoringPreset};

pub async fn run(
    question: &str,
    preset: Option<ScoringPreset>,
    documents: Option<&Path>,
) -> Result<(), Box<dyn std::error::Error>> {
    let config = super::load_config(preset)?;

    // Check for an API key early so the error is clear
    if !config.has_api_key() {
        eprintln!();
        eprintln!("  ERROR: No API key configured!");
        eprintln!();
        eprintln!("  Set one of these environment variables:");
        eprintln!("    LEXDESK_API_KEY=...   (preferred)");
        eprintln!("    GEMINI_API_KEY=...");
        eprintln!();
        eprintln!("  Or add it to your config file:");
        eprintln!("    {}", AppConfig::config_dir().join("config.toml").display());
        eprintln!();
        return Err("No API key found. See above for setup instructions.".into());
    }

    let provider = lexdesk_providers::build_from_config(&config)?;
    let store = super::open_store(&config, documents)?;
    let assistant = RagAssistant::from_config(provider, &config)?;

    println!("🔎 Searching {} documents ({} preset)...", store.count().await?, config.retrieval.preset);
    let answer = assistant.ask_store(question, &*store).await?;

    println!();
    println!("{}", render_answer(&answer));
    Ok(())
}

/// The answer, the source note and the source list, as printed.
pub fn render_answer(answer: &RagAnswer) -> String {
    let mut out = answer.answer.clone();

    if matches!(answer.outcome, RagOutcome::NoDocuments) {
        return out;
    }

    out.push_str("\n\n");
    out.push_str(&answer.source_note());

    if !answer.sources.is_empty() {
        out.push('\n');
        for (i, doc) in answer.sources.iter().enumerate() {
            out.push_str(&format!(
                "\n   {}. {} ({}, {})",
                i + 1,
                doc.name,
                doc.category,
                doc.case_id
            ));
        }
    }

    if let RagOutcome::GenerationFailed { reason } = &answer.outcome {
        out.push_str(&format!("\n\n   ⚠️  {reason}"));
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use lexdesk_core::document::{Document, DocumentCategory};

    fn answer(outcome: RagOutcome, sources: Vec<Document>) -> RagAnswer {
        RagAnswer {
            answer: "The Seller is Global Supplies Inc.".into(),
            sources,
            outcome,
            context_metadata: None,
            usage: None,
        }
    }

    #[test]
    fn lists_sources_under_answer() {
        let doc = Document::new("Supply_Agreement_v2.pdf", "case-1", DocumentCategory::Contract, "x");
        let out = render_answer(&answer(RagOutcome::Answered, vec![doc]));
        assert!(out.starts_with("The Seller is Global Supplies Inc."));
        assert!(out.contains("based on 1 document"));
        assert!(out.contains("1. Supply_Agreement_v2.pdf (Contract, case-1)"));
    }

    #[test]
    fn no_documents_prints_answer_only() {
        let out = render_answer(&answer(RagOutcome::NoDocuments, vec![]));
        assert_eq!(out, "The Seller is Global Supplies Inc.");
    }

    #[test]
    fn failure_reason_is_shown() {
        let outcome = RagOutcome::GenerationFailed {
            reason: "Request timed out: 60s".into(),
        };
        let out = render_answer(&answer(outcome, vec![]));
        assert!(out.contains("Tip:"));
        assert!(out.contains("Request timed out"));
    }
}
