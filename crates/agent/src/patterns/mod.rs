//! Callers that put retrieval, assembly and generation together.

pub mod rag;

pub use rag::{RagAnswer, RagAssistant, RagOutcome};

#[cfg(test)]
pub(crate) mod test_helpers;
