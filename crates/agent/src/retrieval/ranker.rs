//! The lexical relevance ranker.
//!
//! Pure and synchronous: no I/O, no shared state, no allocation beyond the
//! lowercased copies of each document and the result vector. Safe to call
//! from any number of tasks at once.

use lexdesk_core::document::Document;
use lexdesk_core::error::Result;
use tracing::debug;

use super::profile::RankingProfile;

/// A document paired with its relevance score.
#[derive(Debug, Clone, Copy)]
pub struct ScoredDocument<'a> {
    pub document: &'a Document,
    pub score: f64,
}

/// Scores and ranks documents against a free-text query.
#[derive(Debug, Clone, Default)]
pub struct LexicalRanker {
    profile: RankingProfile,
}

impl LexicalRanker {
    /// Create a ranker, rejecting profiles with non-finite or negative values.
    pub fn new(profile: RankingProfile) -> Result<Self> {
        profile.validate()?;
        Ok(Self { profile })
    }

    pub fn profile(&self) -> &RankingProfile {
        &self.profile
    }

    /// Lowercase, split on whitespace, drop tokens shorter than
    /// `min_token_len`. Repeated tokens are kept and scored again.
    pub fn tokenize(&self, query: &str) -> Vec<String> {
        query
            .to_lowercase()
            .split_whitespace()
            .filter(|t| t.chars().count() >= self.profile.min_token_len)
            .map(str::to_string)
            .collect()
    }

    /// Score one document against already-tokenized query terms.
    pub fn score(&self, tokens: &[String], document: &Document) -> f64 {
        let p = &self.profile;
        let content = document.content.to_lowercase();
        let name = document.name.to_lowercase();
        let category = document.category.label().to_lowercase();
        let words: Vec<&str> = if p.partial_match_weight > 0.0 {
            content.split_whitespace().collect()
        } else {
            Vec::new()
        };

        let mut score = 0.0;
        for token in tokens {
            let token = token.as_str();

            if content.contains(token) {
                score += p.content_match_weight;
                if p.repeat_bonus > 0.0 {
                    let extra = content
                        .matches(token)
                        .count()
                        .saturating_sub(1)
                        .min(p.max_repeat_occurrences);
                    score += extra as f64 * p.repeat_bonus;
                }
            }

            if name.contains(token) {
                score += p.name_match_weight;
            }

            if p.category_match_weight > 0.0 && category.contains(token) {
                score += p.category_match_weight;
            }

            if p.partial_match_weight > 0.0 {
                let partial = words
                    .iter()
                    .filter(|w| w.contains(token) || token.contains(**w))
                    .count();
                score += partial as f64 * p.partial_match_weight;
            }
        }

        if p.length_bonus_cap > 0.0 {
            let chars = document.content.chars().count() as f64;
            score += (chars / p.length_bonus_unit).min(p.length_bonus_cap);
        }

        score
    }

    /// Score, filter by threshold, sort descending (stable on ties) and
    /// truncate to `top_n`.
    ///
    /// A query with no usable tokens ranks nothing, bonuses included.
    pub fn score_all<'a>(&self, query: &str, documents: &'a [Document]) -> Vec<ScoredDocument<'a>> {
        let tokens = self.tokenize(query);
        if tokens.is_empty() || documents.is_empty() {
            debug!(
                tokens = tokens.len(),
                documents = documents.len(),
                "Nothing to rank"
            );
            return Vec::new();
        }

        let mut scored: Vec<ScoredDocument<'a>> = documents
            .iter()
            .map(|document| ScoredDocument {
                document,
                score: self.score(&tokens, document),
            })
            .filter(|s| s.score > self.profile.min_score_threshold)
            .collect();

        let candidates = scored.len();
        scored.sort_by(|a, b| b.score.total_cmp(&a.score));
        scored.truncate(self.profile.top_n);

        debug!(
            preset = %self.profile.preset,
            tokens = tokens.len(),
            documents = documents.len(),
            candidates,
            kept = scored.len(),
            "Ranked documents"
        );

        scored
    }

    /// The ranked documents, highest score first, scores dropped.
    pub fn rank<'a>(&self, query: &str, documents: &'a [Document]) -> Vec<&'a Document> {
        self.score_all(query, documents)
            .into_iter()
            .map(|s| s.document)
            .collect()
    }
}
