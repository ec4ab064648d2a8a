//! # lexdesk Core
//!
//! Domain types, traits, and error definitions for the lexdesk document
//! assistant. This crate has **zero framework dependencies**: it defines the
//! domain model that all other crates implement against.
//!
//! ## Design Philosophy
//!
//! Every external collaborator is defined as a trait here. Implementations
//! live in their respective crates:
//! - [`Provider`]: the generative-answer service (`lexdesk-providers`)
//! - [`DocumentStore`]: the document repository (`lexdesk-store`)
//!
//! Retrieval and context assembly only ever see plain [`Document`] slices,
//! so they stay free of I/O and state.

pub mod document;
pub mod error;
pub mod message;
pub mod provider;
pub mod store;

// Re-export key types at crate root for ergonomics
pub use document::{Document, DocumentCategory, DocumentPatch};
pub use error::{Error, ProviderError, Result, StoreError};
pub use message::{Message, Role};
pub use provider::{Provider, ProviderRequest, ProviderResponse, Usage};
pub use store::DocumentStore;
