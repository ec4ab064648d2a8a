//! Retrieval-augmented question answering over case documents.
//!
//! The pipeline has three stages:
//!
//! 1. **Rank**: [`LexicalRanker`] scores every document against the query
//!    by substring overlap and keeps the top N above a threshold
//! 2. **Assemble**: [`ContextAssembler`] turns the ranked documents into one
//!    bounded text block, truncating each to an excerpt
//! 3. **Generate**: [`RagAssistant`] hands the question and the context to a
//!    [`Provider`](lexdesk_core::Provider) and attaches the ranked documents
//!    as sources
//!
//! Stages 1 and 2 are pure and synchronous; only stage 3 awaits.

pub mod context;
pub mod patterns;
pub mod retrieval;
pub mod validation;

pub use context::{
    AssembledContext, AssemblyMetadata, ContextAssembler, ContextConfig, DropInfo,
    TRUNCATION_MARKER,
};
pub use patterns::{RagAnswer, RagAssistant, RagOutcome};
pub use retrieval::{LexicalRanker, RankingProfile, ScoredDocument};
pub use validation::{ValidationReport, validate_document_content};
