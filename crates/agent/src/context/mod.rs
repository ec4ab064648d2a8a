//! Context assembly: ranked documents in, one bounded text block out.
//!
//! Each document becomes a numbered block with its name and category in
//! the header and an excerpt of its content in the body:
//!
//! ```text
//! --- BEGIN DOCUMENT 1: "Supply_Agreement_v2.pdf" (Type: Contract) ---
//! This Supply Agreement is made on ...
//! --- END DOCUMENT 1 ---
//! ```
//!
//! Blocks are joined by a blank line in ranked order. Excerpts longer than
//! the limit end with [`TRUNCATION_MARKER`].

pub mod assembler;
pub mod token;

pub use assembler::{
    AssembledContext, AssemblyMetadata, ContextAssembler, ContextConfig, DropInfo,
    TRUNCATION_MARKER, excerpt,
};
