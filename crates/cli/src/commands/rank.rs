//! `lexdesk rank`: Show how documents score against a query.

use std::path::Path;

use lexdesk_agent::{LexicalRanker, RankingProfile, ScoredDocument};
use lexdesk_config::ScoringPreset;

pub async fn run(
    query: &str,
    preset: Option<ScoringPreset>,
    documents: Option<&Path>,
) -> Result<(), Box<dyn std::error::Error>> {
    let config = super::load_config(preset)?;
    let ranker = LexicalRanker::new(RankingProfile::from_config(&config.retrieval)?)?;
    let store = super::open_store(&config, documents)?;
    let docs = store.list().await?;

    let profile = ranker.profile();
    println!(
        "📊 Ranking {} documents ({} preset, top {}, score > {})",
        docs.len(),
        profile.preset,
        profile.top_n,
        profile.min_score_threshold
    );
    println!("   Tokens: {:?}", ranker.tokenize(query));
    println!();

    let scored = ranker.score_all(query, &docs);
    if scored.is_empty() {
        println!("   No relevant documents.");
    } else {
        for line in render_scores(&scored) {
            println!("{line}");
        }
    }

    Ok(())
}

/// One line per ranked document.
pub fn render_scores(scored: &[ScoredDocument<'_>]) -> Vec<String> {
    scored
        .iter()
        .enumerate()
        .map(|(i, s)| {
            format!(
                "   {:>2}. {:>7.2}  {}  ({}, {}, {})",
                i + 1,
                s.score,
                s.document.name,
                s.document.category,
                s.document.case_id,
                s.document.id
            )
        })
        .collect()
}
