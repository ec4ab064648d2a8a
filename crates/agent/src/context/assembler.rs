//! The context assembler.
//!
//! # Determinism
//!
//! Identical inputs always produce identical output. Nothing here reads the
//! clock or any shared state.

use crate::context::token;
use lexdesk_config::{RetrievalConfig, ScoringPreset};
use lexdesk_core::document::Document;
use lexdesk_core::error::{Error, Result};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Appended to an excerpt that was cut short.
pub const TRUNCATION_MARKER: &str = "... [truncated]";

const BLOCK_SEPARATOR: &str = "\n\n";

// ── Types ─────────────────────────────────────────────────────────────────

/// Assembly limits.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContextConfig {
    /// Maximum characters of content per document.
    pub excerpt_limit: usize,
    /// Optional cap on the estimated tokens of the whole block.
    pub token_budget: Option<usize>,
}

impl ContextConfig {
    /// 2000 characters per document for `basic`, 3000 for `enhanced`.
    pub fn for_preset(preset: ScoringPreset) -> Self {
        let excerpt_limit = match preset {
            ScoringPreset::Basic => 2000,
            ScoringPreset::Enhanced => 3000,
        };
        Self {
            excerpt_limit,
            token_budget: None,
        }
    }

    pub fn from_config(config: &RetrievalConfig) -> Self {
        let mut ctx = Self::for_preset(config.preset);
        if let Some(limit) = config.excerpt_limit {
            ctx.excerpt_limit = limit;
        }
        ctx.token_budget = config.context_token_budget;
        ctx
    }
}

impl Default for ContextConfig {
    fn default() -> Self {
        Self::for_preset(ScoringPreset::default())
    }
}

/// The assembled context, ready to drop into a prompt.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AssembledContext {
    /// The document blocks. Empty when no documents were given.
    pub text: String,
    pub metadata: AssemblyMetadata,
}

impl AssembledContext {
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }
}

/// What went into the block and what was left out.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AssemblyMetadata {
    /// Documents handed to the assembler.
    pub documents_total: usize,
    /// Documents that made it into the block.
    pub documents_included: usize,
    /// Included documents whose content was cut at the excerpt limit.
    pub documents_truncated: usize,
    /// Characters in the assembled text.
    pub total_chars: usize,
    /// Estimated tokens of the assembled text.
    pub estimated_tokens: usize,
    /// Ids of the included documents, in block order.
    pub included_ids: Vec<String>,
    /// Documents left out by the token budget.
    pub drops: Vec<DropInfo>,
}

/// A document left out of the block.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DropInfo {
    pub document_id: String,
    pub document_name: String,
    /// Estimated tokens the block would have cost.
    pub tokens: usize,
    pub reason: String,
}

// ── Assembler ─────────────────────────────────────────────────────────────

/// Stateless. Create one and reuse it.
#[derive(Debug, Clone, Default)]
pub struct ContextAssembler {
    config: ContextConfig,
}

impl ContextAssembler {
    /// Fails with `InvalidArgument` when the excerpt limit is zero.
    pub fn new(config: ContextConfig) -> Result<Self> {
        if config.excerpt_limit == 0 {
            return Err(Error::invalid_argument("excerpt_limit must be at least 1"));
        }
        Ok(Self { config })
    }

    pub fn config(&self) -> &ContextConfig {
        &self.config
    }

    /// Build the context block from documents in ranked order.
    ///
    /// Without a token budget every document is included. With one, a
    /// document whose block, separator included, would push the joined text
    /// over the budget is dropped and the next one is tried; the first
    /// document is always kept.
    pub fn assemble<'a, I>(&self, documents: I) -> AssembledContext
    where
        I: IntoIterator<Item = &'a Document>,
    {
        let mut blocks: Vec<String> = Vec::new();
        let mut metadata = AssemblyMetadata::default();
        // Characters of the joined text so far, separators included.
        let mut used_chars = 0usize;
        let separator_chars = BLOCK_SEPARATOR.chars().count();

        for document in documents {
            metadata.documents_total += 1;

            let (body, truncated) = excerpt(&document.content, self.config.excerpt_limit);
            let block = render_block(blocks.len() + 1, document, body, truncated);
            let block_chars = block.chars().count();
            let candidate_chars = if blocks.is_empty() {
                block_chars
            } else {
                used_chars + separator_chars + block_chars
            };

            if let Some(budget) = self.config.token_budget {
                let candidate_tokens = token::estimate_tokens_for_chars(candidate_chars);
                if !blocks.is_empty() && candidate_tokens > budget {
                    let block_tokens = token::estimate_tokens_for_chars(block_chars);
                    metadata.drops.push(DropInfo {
                        document_id: document.id.clone(),
                        document_name: document.name.clone(),
                        tokens: block_tokens,
                        reason: format!(
                            "Would exceed token budget ({candidate_tokens} > {budget})"
                        ),
                    });
                    continue;
                }
            }

            used_chars = candidate_chars;
            if truncated {
                metadata.documents_truncated += 1;
            }
            metadata.included_ids.push(document.id.clone());
            blocks.push(block);
        }

        let text = blocks.join(BLOCK_SEPARATOR);
        metadata.documents_included = blocks.len();
        metadata.total_chars = text.chars().count();
        metadata.estimated_tokens = token::estimate_tokens(&text);

        debug!(
            total = metadata.documents_total,
            included = metadata.documents_included,
            truncated = metadata.documents_truncated,
            dropped = metadata.drops.len(),
            tokens = metadata.estimated_tokens,
            "Assembled context"
        );

        AssembledContext { text, metadata }
    }
}

/// Cut `content` to at most `limit` characters. Returns the excerpt and
/// whether anything was cut. Never splits a character.
pub fn excerpt(content: &str, limit: usize) -> (&str, bool) {
    match content.char_indices().nth(limit) {
        Some((end, _)) => (&content[..end], true),
        None => (content, false),
    }
}

fn render_block(index: usize, document: &Document, body: &str, truncated: bool) -> String {
    let marker = if truncated { TRUNCATION_MARKER } else { "" };
    format!(
        "--- BEGIN DOCUMENT {index}: \"{}\" (Type: {}) ---\n{body}{marker}\n--- END DOCUMENT {index} ---",
        document.name,
        document.category.label(),
    )
}
