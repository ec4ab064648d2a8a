//! Scoring constants for the lexical ranker.

use lexdesk_config::{RetrievalConfig, ScoringPreset};
use lexdesk_core::error::{Error, Result};
use serde::{Deserialize, Serialize};

/// Every constant the ranker uses. Build one from a preset and override
/// individual fields as needed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankingProfile {
    /// The preset these values started from.
    pub preset: ScoringPreset,
    /// Maximum number of documents returned.
    pub top_n: usize,
    /// A document must score strictly above this to be returned.
    pub min_score_threshold: f64,
    /// Query tokens shorter than this (in chars) are discarded.
    pub min_token_len: usize,
    /// Added once per token found anywhere in the content.
    pub content_match_weight: f64,
    /// Added per extra occurrence of a token in the content.
    pub repeat_bonus: f64,
    /// Cap on extra occurrences that earn `repeat_bonus`.
    pub max_repeat_occurrences: usize,
    /// Added per token found in the document name.
    pub name_match_weight: f64,
    /// Added per token found in the category label.
    pub category_match_weight: f64,
    /// Added per content word that contains, or is contained in, a token.
    pub partial_match_weight: f64,
    /// Content chars that earn one point of length bonus.
    pub length_bonus_unit: f64,
    /// Cap on the length bonus. Zero disables it.
    pub length_bonus_cap: f64,
}

impl RankingProfile {
    /// Plain substring counting: +1 content, +2 name, score > 0, top 3.
    pub fn basic() -> Self {
        Self {
            preset: ScoringPreset::Basic,
            top_n: 3,
            min_score_threshold: 0.0,
            min_token_len: 1,
            content_match_weight: 1.0,
            repeat_bonus: 0.0,
            max_repeat_occurrences: 0,
            name_match_weight: 2.0,
            category_match_weight: 0.0,
            partial_match_weight: 0.0,
            length_bonus_unit: 1000.0,
            length_bonus_cap: 0.0,
        }
    }

    /// Repetition, category, partial-word and length bonuses; score > 0.5, top 5.
    pub fn enhanced() -> Self {
        Self {
            preset: ScoringPreset::Enhanced,
            top_n: 5,
            min_score_threshold: 0.5,
            min_token_len: 3,
            content_match_weight: 1.0,
            repeat_bonus: 0.5,
            max_repeat_occurrences: 3,
            name_match_weight: 3.0,
            category_match_weight: 2.0,
            partial_match_weight: 0.3,
            length_bonus_unit: 1000.0,
            length_bonus_cap: 2.0,
        }
    }

    pub fn for_preset(preset: ScoringPreset) -> Self {
        match preset {
            ScoringPreset::Basic => Self::basic(),
            ScoringPreset::Enhanced => Self::enhanced(),
        }
    }

    /// Start from the configured preset and apply any explicit overrides.
    pub fn from_config(config: &RetrievalConfig) -> Result<Self> {
        let mut profile = Self::for_preset(config.preset);
        if let Some(top_n) = config.top_n {
            profile.top_n = top_n;
        }
        if let Some(threshold) = config.min_score_threshold {
            profile.min_score_threshold = threshold;
        }
        if let Some(min_len) = config.min_token_len {
            profile.min_token_len = min_len;
        }
        profile.validate()?;
        Ok(profile)
    }

    /// Reject an empty result cap and values that would make scores
    /// non-comparable.
    pub fn validate(&self) -> Result<()> {
        if self.top_n == 0 {
            return Err(Error::invalid_argument("top_n must be at least 1"));
        }

        let weights = [
            ("content_match_weight", self.content_match_weight),
            ("repeat_bonus", self.repeat_bonus),
            ("name_match_weight", self.name_match_weight),
            ("category_match_weight", self.category_match_weight),
            ("partial_match_weight", self.partial_match_weight),
            ("length_bonus_cap", self.length_bonus_cap),
        ];
        for (field, value) in weights {
            if !value.is_finite() || value < 0.0 {
                return Err(Error::invalid_argument(format!(
                    "{field} must be a finite, non-negative number (got {value})"
                )));
            }
        }

        if !self.min_score_threshold.is_finite() {
            return Err(Error::invalid_argument(
                "min_score_threshold must be a finite number",
            ));
        }

        if !self.length_bonus_unit.is_finite() || self.length_bonus_unit <= 0.0 {
            return Err(Error::invalid_argument(
                "length_bonus_unit must be a finite, positive number",
            ));
        }

        Ok(())
    }
}

impl Default for RankingProfile {
    fn default() -> Self {
        Self::for_preset(ScoringPreset::default())
    }
}
