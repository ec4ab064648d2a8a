//! `lexdesk context`: Print the context block built for a query.

use std::path::Path;

use lexdesk_agent::{
    AssemblyMetadata, ContextAssembler, ContextConfig, LexicalRanker, RankingProfile,
};
use lexdesk_config::ScoringPreset;

pub async fn run(
    query: &str,
    preset: Option<ScoringPreset>,
    excerpt_limit: Option<usize>,
    documents: Option<&Path>,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut config = super::load_config(preset)?;
    if excerpt_limit.is_some() {
        config.retrieval.excerpt_limit = excerpt_limit;
    }

    let ranker = LexicalRanker::new(RankingProfile::from_config(&config.retrieval)?)?;
    let assembler = ContextAssembler::new(ContextConfig::from_config(&config.retrieval))?;
    let store = super::open_store(&config, documents)?;
    let docs = store.list().await?;

    let ranked = ranker.rank(query, &docs);
    if ranked.is_empty() {
        println!("📭 No relevant documents; nothing would be sent.");
        return Ok(());
    }

    let assembled = assembler.assemble(ranked);
    println!("{}", assembled.text);
    println!();
    for line in render_metadata(&assembled.metadata) {
        println!("{line}");
    }

    Ok(())
}

pub fn render_metadata(metadata: &AssemblyMetadata) -> Vec<String> {
    let mut lines = vec![
        format!(
            "📄 {} of {} documents included, {} truncated",
            metadata.documents_included, metadata.documents_total, metadata.documents_truncated
        ),
        format!(
            "   {} characters, ~{} tokens",
            metadata.total_chars, metadata.estimated_tokens
        ),
    ];
    for drop in &metadata.drops {
        lines.push(format!("   ⚠️  Dropped {}: {}", drop.document_name, drop.reason));
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use lexdesk_agent::DropInfo;

    #[test]
    fn metadata_lines_include_drops() {
        let metadata = AssemblyMetadata {
            documents_total: 3,
            documents_included: 2,
            documents_truncated: 1,
            total_chars: 4100,
            estimated_tokens: 1025,
            included_ids: vec!["doc-1".into(), "doc-3".into()],
            drops: vec![DropInfo {
                document_id: "doc-2".into(),
                document_name: "Plaint_CIV-001-2023.pdf".into(),
                tokens: 900,
                reason: "Would exceed token budget".into(),
            }],
        };
        let lines = render_metadata(&metadata);
        assert_eq!(lines[0], "📄 2 of 3 documents included, 1 truncated");
        assert_eq!(lines[1], "   4100 characters, ~1025 tokens");
        assert!(lines[2].contains("Plaint_CIV-001-2023.pdf"));
    }
}
