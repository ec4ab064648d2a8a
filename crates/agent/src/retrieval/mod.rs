//! Lexical document retrieval.
//!
//! Documents are scored by how many query tokens appear in their content,
//! name and category, with optional bonuses selected by a
//! [`RankingProfile`]. No embeddings, no I/O.
//!
//! | Term | `basic` | `enhanced` |
//! |------|---------|------------|
//! | Token length kept | all | > 2 chars |
//! | Content hit | +1 | +1, +0.5 per extra occurrence (max 3) |
//! | Name hit | +2 | +3 |
//! | Category hit | none | +2 |
//! | Partial word match | none | +0.3 per content word |
//! | Length bonus | none | min(chars / 1000, 2) |
//! | Threshold (score >) | 0 | 0.5 |
//! | Top N | 3 | 5 |

pub mod profile;
pub mod ranker;

pub use profile::RankingProfile;
pub use ranker::{LexicalRanker, ScoredDocument};
